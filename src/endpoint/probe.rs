use bitflags::bitflags;

use crate::epoch::time_diff;

pub const PROBE_INIT_MS: u32 = 7_000;
pub const PROBE_LIMIT_MS: u32 = 120_000;

bitflags! {
    /// Window probe commands to emit on the next flush.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Probe: u8 {
        /// Ask the remote for its window
        const ASK_SEND = 1;
        /// Tell the remote our window
        const ASK_TELL = 2;
    }
}

/// Backoff timer for asking a peer that advertised a zero window whether it has reopened.
#[derive(Debug, Default)]
pub struct ProbeTimer {
    wait_ms: u32,
    probe_time_ms: u32,
}

impl ProbeTimer {
    /// Returns true when a window probe is due.
    pub fn poll(&mut self, rmt_wnd: u32, now_ms: u32) -> bool {
        if rmt_wnd != 0 {
            self.wait_ms = 0;
            self.probe_time_ms = 0;
            return false;
        }

        if self.wait_ms == 0 {
            self.wait_ms = PROBE_INIT_MS;
            self.probe_time_ms = now_ms.wrapping_add(self.wait_ms);
            return false;
        }

        if time_diff(now_ms, self.probe_time_ms) >= 0 {
            self.wait_ms = self.wait_ms.max(PROBE_INIT_MS);
            self.wait_ms += self.wait_ms / 2;
            self.wait_ms = self.wait_ms.min(PROBE_LIMIT_MS);
            self.probe_time_ms = now_ms.wrapping_add(self.wait_ms);
            return true;
        }

        false
    }

    #[cfg(test)]
    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }
}
