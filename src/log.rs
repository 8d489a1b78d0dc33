use bitflags::bitflags;

bitflags! {
    /// Diagnostic categories. A log site only reaches `tracing` when its category is enabled.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct LogMask: u32 {
        /// Frames handed to the output sink
        const OUTPUT = 1;
        /// Frames passed to `input`
        const INPUT = 2;
        const SEND = 4;
        const RECV = 8;
        const IN_DATA = 16;
        const IN_ACK = 32;
        const IN_PROBE = 64;
        const IN_WINS = 128;
        const OUT_DATA = 256;
        const OUT_ACK = 512;
        const OUT_PROBE = 1024;
        const OUT_WINS = 2048;
    }
}

/// Emits a `tracing` event at trace level when `$category` is enabled in `$mask`.
macro_rules! arq_log {
    ($mask:expr, $category:ident, $($arg:tt)+) => {
        if $mask.contains($crate::log::LogMask::$category) {
            tracing::trace!(target: "swiftarq", $($arg)+);
        }
    };
}

pub(crate) use arq_log;
