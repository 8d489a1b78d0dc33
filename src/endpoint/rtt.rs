// RTT estimation follows RFC 6298, with integer arithmetic and one deviation: samples below the
// expected range (srtt - rttvar) pull the variance down 8x slower than usual, so a burst of
// unusually fast acks does not collapse the RTO.

use crate::config::{RTO_DEF, RTO_MAX, RTO_MIN};

#[derive(Clone, Debug)]
pub struct RttEstimator {
    srtt: i32,
    rttvar: i32,
    rto: u32,
    min_rto: u32,
    initialized: bool,
}

impl RttEstimator {
    pub fn new() -> Self {
        Self {
            srtt: 0,
            rttvar: 0,
            rto: RTO_DEF,
            min_rto: RTO_MIN,
            initialized: false,
        }
    }

    pub fn update(&mut self, rtt: i32, interval: u32) {
        debug_assert!(rtt >= 0);

        if !self.initialized {
            self.srtt = rtt;
            self.rttvar = rtt >> 1;
            self.initialized = true;
        } else {
            let delta = rtt - self.srtt;
            self.srtt += delta >> 3;

            let delta = delta.abs();

            if rtt < self.srtt - self.rttvar {
                self.rttvar += (delta - self.rttvar) >> 5;
            } else {
                self.rttvar += (delta - self.rttvar) >> 2;
            }
        }

        let rto = i64::from(self.srtt) + i64::from(interval).max(i64::from(self.rttvar) << 2);
        self.rto = rto.clamp(i64::from(self.min_rto), i64::from(RTO_MAX)) as u32;
    }

    pub fn rto(&self) -> u32 {
        self.rto
    }

    pub fn srtt(&self) -> i32 {
        self.srtt
    }

    #[cfg(test)]
    pub fn rttvar(&self) -> i32 {
        self.rttvar
    }

    pub fn min_rto(&self) -> u32 {
        self.min_rto
    }

    pub fn set_min_rto(&mut self, min_rto: u32) {
        self.min_rto = min_rto;
    }
}
