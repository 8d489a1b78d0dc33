use crate::error::{Error, Result};
use crate::frame;
use crate::log::LogMask;

pub const RTO_NDL: u32 = 30;
pub const RTO_MIN: u32 = 100;
pub const RTO_DEF: u32 = 200;
pub const RTO_MAX: u32 = 60_000;

pub const WND_SND: u32 = 32;
pub const WND_RCV: u32 = 32;

pub const MTU_DEF: usize = 1400;
pub const MTU_MIN: usize = 50;

pub const INTERVAL_DEF: u32 = 100;
pub const INTERVAL_MIN: u32 = 10;
pub const INTERVAL_MAX: u32 = 5000;

pub const DEADLINK: u32 = 20;

/// Configuration for a [`Kcp`](crate::Kcp) connection.
///
/// Every field can also be changed on a live connection through the corresponding setter.
#[derive(Clone, Debug)]
pub struct Config {
    /// Low-delay mode: lowers the minimum RTO to 30ms and backs off timed-out segments by
    /// half an RTO instead of a full one.
    ///
    /// Default value: false
    pub nodelay: bool,

    /// Internal flush interval, in milliseconds. Values outside the allowed range are clamped.
    ///
    /// Range: 10 - 5,000 \
    /// Default value: 100
    pub interval_ms: u32,

    /// Number of later acknowledgements that trigger a fast retransmit. 0 disables fast
    /// retransmission.
    ///
    /// Default value: 0
    pub fast_resend: u32,

    /// Whether the congestion window limits the amount of data in flight.
    ///
    /// Default value: true
    pub congestion_control: bool,

    /// Send window, in segments.
    ///
    /// Minimum value: 1 \
    /// Default value: 32
    pub snd_wnd: u32,

    /// Receive window, in segments. Messages with more fragments than this can't be received.
    ///
    /// Range: 1 - 65,535 \
    /// Default value: 32
    pub rcv_wnd: u32,

    /// Largest frame handed to the output sink, in bytes.
    ///
    /// Minimum value: 50 \
    /// Default value: 1,400
    pub mtu: usize,

    /// Bytes left free at the start of every frame for a transport header.
    ///
    /// Default value: 0
    pub reserved: usize,

    /// Stream mode merges sends into full segments and does not preserve message boundaries.
    ///
    /// Default value: false
    pub stream: bool,

    /// Transmissions of a single segment after which the connection is considered dead.
    ///
    /// Minimum value: 1 \
    /// Default value: 20
    pub dead_link: u32,

    /// Enabled diagnostic categories.
    pub log_mask: LogMask,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodelay: false,
            interval_ms: INTERVAL_DEF,
            fast_resend: 0,
            congestion_control: true,
            snd_wnd: WND_SND,
            rcv_wnd: WND_RCV,
            mtu: MTU_DEF,
            reserved: 0,
            stream: false,
            dead_link: DEADLINK,
            log_mask: LogMask::empty(),
        }
    }
}

impl Config {
    /// The fastest preset: low-delay mode, 10ms interval, fast resend after 2 acks and no
    /// congestion window.
    pub fn fast() -> Self {
        Self {
            nodelay: true,
            interval_ms: INTERVAL_MIN,
            fast_resend: 2,
            congestion_control: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_windows(self.snd_wnd, self.rcv_wnd)?;
        validate_frame(self.mtu, self.reserved)?;

        if self.dead_link == 0 {
            return Err(Error::InvalidConfig("dead_link must be at least 1"));
        }

        Ok(())
    }
}

pub fn clamp_interval(interval_ms: u32) -> u32 {
    interval_ms.clamp(INTERVAL_MIN, INTERVAL_MAX)
}

pub fn min_rto(nodelay: bool) -> u32 {
    if nodelay {
        RTO_NDL
    } else {
        RTO_MIN
    }
}

pub fn validate_windows(snd_wnd: u32, rcv_wnd: u32) -> Result<()> {
    if snd_wnd == 0 {
        return Err(Error::InvalidConfig("snd_wnd must be at least 1"));
    }

    if rcv_wnd == 0 || rcv_wnd > u16::MAX.into() {
        return Err(Error::InvalidConfig("rcv_wnd must be within 1 - 65535"));
    }

    Ok(())
}

pub fn validate_frame(mtu: usize, reserved: usize) -> Result<()> {
    if mtu < MTU_MIN || mtu < frame::OVERHEAD {
        return Err(Error::InvalidConfig("mtu must be at least 50"));
    }

    if reserved >= mtu - frame::OVERHEAD {
        return Err(Error::InvalidConfig(
            "reserved prefix leaves no room for a segment",
        ));
    }

    Ok(())
}
