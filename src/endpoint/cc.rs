// Window-based congestion control in the spirit of TCP Reno:
//
// Slow start and congestion avoidance follow RFC 5681 [3.1]. Retransmissions triggered by
// duplicate acknowledgement (fast and early retransmit) use rate halving as in RFC 6937, and a
// retransmission timeout collapses the window to a single segment.
//
// cwnd is counted in segments. incr tracks the window in bytes so that congestion avoidance can
// grow cwnd by roughly one segment per round trip.

pub const THRESH_INIT: u32 = 2;
pub const THRESH_MIN: u32 = 2;

pub struct CongestionWindow {
    mss: u64,
    cwnd: u32,
    ssthresh: u32,
    incr: u64,
}

impl CongestionWindow {
    pub fn new(mss: usize) -> Self {
        Self {
            mss: mss as u64,
            cwnd: 1,
            ssthresh: THRESH_INIT,
            incr: mss as u64,
        }
    }

    pub fn set_mss(&mut self, mss: usize) {
        self.mss = mss as u64;
        self.incr = u64::from(self.cwnd) * self.mss;
    }

    pub fn cwnd(&self) -> u32 {
        self.cwnd
    }

    pub fn ssthresh(&self) -> u32 {
        self.ssthresh
    }

    /// The oldest unacknowledged segment advanced. Growth is capped by the remote window.
    pub fn handle_ack(&mut self, rmt_wnd: u32) {
        if self.cwnd >= rmt_wnd {
            return;
        }

        let mss = self.mss;

        if self.cwnd < self.ssthresh {
            // Slow start: one segment per ack
            self.cwnd += 1;
            self.incr += mss;
        } else {
            // Congestion avoidance: about one segment per window of acks
            if self.incr < mss {
                self.incr = mss;
            }
            self.incr += (mss * mss) / self.incr + mss / 16;

            if (u64::from(self.cwnd) + 1) * mss <= self.incr {
                let cwnd = (self.incr + mss - 1) / mss;
                self.cwnd = u32::try_from(cwnd).unwrap_or(u32::MAX);
            }
        }

        if self.cwnd > rmt_wnd {
            self.cwnd = rmt_wnd;
            self.incr = u64::from(rmt_wnd) * mss;
        }
    }

    /// Segments were resent because later ones were acknowledged first.
    ///
    /// A disabled fast resend is passed as `u32::MAX`, which wraps the sum to `ssthresh - 1`.
    pub fn handle_fast_retransmit(&mut self, in_flight: u32, resend_threshold: u32) {
        self.ssthresh = (in_flight / 2).max(THRESH_MIN);
        self.cwnd = self.ssthresh.wrapping_add(resend_threshold).max(1);
        self.incr = u64::from(self.cwnd) * self.mss;
    }

    /// A retransmission timer expired.
    pub fn handle_timeout(&mut self) {
        self.ssthresh = (self.cwnd / 2).max(THRESH_MIN);
        self.cwnd = 1;
        self.incr = self.mss;
    }
}
