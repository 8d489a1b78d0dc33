use thiserror::Error;

/// Errors reported by the ARQ engine and its supporting buffers.
///
/// None of these are fatal to a connection. Rejected sends and receives leave the connection
/// untouched, and a malformed frame only stops parsing at the faulty record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// `send` was called with no data.
    #[error("cannot send an empty message")]
    EmptyInput,

    /// The message would need more fragments than the wire format can count.
    #[error("message needs {fragments} fragments, at most 255 are allowed")]
    MessageTooLarge { fragments: usize },

    /// No complete message is waiting in the receive queue.
    #[error("no complete message available")]
    NothingToRead,

    /// The destination cannot hold the next message. Nothing was consumed.
    #[error("message of {needed} bytes does not fit in a {available} byte buffer")]
    BufferTooSmall { needed: usize, available: usize },

    /// A segment in the frame belongs to another conversation.
    #[error("conversation mismatch: expected {expected}, got {actual}")]
    ConvMismatch { expected: u32, actual: u32 },

    /// The frame ended partway through a segment header.
    #[error("truncated segment header: {remaining} bytes left")]
    TruncatedHeader { remaining: usize },

    /// The frame ended before the payload announced by a segment header.
    #[error("truncated payload: {needed} bytes announced, {remaining} left")]
    TruncatedPayload { needed: usize, remaining: usize },

    /// A segment header carried an unknown command byte.
    #[error("unknown command {0}")]
    BadCommand(u8),

    /// A read or cursor move ran past the readable region of a buffer.
    #[error("buffer underrun: requested {requested}, {readable} readable")]
    BufferUnderrun { requested: usize, readable: usize },

    /// A configuration value was out of range. The previous configuration is kept.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
