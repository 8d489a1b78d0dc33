pub mod serial;

use crate::error::{Error, Result};

/// Size of an encoded segment header.
pub const OVERHEAD: usize = 24;

const CMD_PUSH: u8 = 81;
const CMD_ACK: u8 = 82;
const CMD_WASK: u8 = 83;
const CMD_WINS: u8 = 84;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Carries payload data.
    Push,
    /// Acknowledges a single segment.
    Ack,
    /// Asks the remote for its receive window.
    WindowAsk,
    /// Reports the local receive window.
    WindowTell,
}

impl Command {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Push => CMD_PUSH,
            Self::Ack => CMD_ACK,
            Self::WindowAsk => CMD_WASK,
            Self::WindowTell => CMD_WINS,
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            CMD_PUSH => Ok(Self::Push),
            CMD_ACK => Ok(Self::Ack),
            CMD_WASK => Ok(Self::WindowAsk),
            CMD_WINS => Ok(Self::WindowTell),
            _ => Err(Error::BadCommand(value)),
        }
    }
}

/// The fixed part of a segment as it appears on the wire.
///
/// ```text
/// 0      4   5   6    8      12     16     20     24
/// +------+---+---+----+------+------+------+------+
/// | conv |cmd|frg|wnd |  ts  |  sn  | una  | len  |  payload ...
/// +------+---+---+----+------+------+------+------+
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SegmentHeader {
    pub conv: u32,
    pub cmd: Command,
    pub frg: u8,
    pub wnd: u16,
    pub ts: u32,
    pub sn: u32,
    pub una: u32,
    pub len: u32,
}

/// Reads the conversation id of a raw frame, e.g. to route it to the right connection.
pub fn peek_conv(frame_bytes: &[u8]) -> Option<u32> {
    let conv_bytes = frame_bytes.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(conv_bytes))
}
