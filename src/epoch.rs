use std::time::Instant;

/// Monotonic millisecond clock for driving connections in real time.
///
/// Connection timestamps are 32-bit and compared with wrapping arithmetic, so the clock may
/// run for any length of time.
#[derive(Clone, Copy, Debug)]
pub struct Epoch {
    time_base: Instant,
}

impl Epoch {
    pub fn new() -> Self {
        Self {
            time_base: Instant::now(),
        }
    }

    pub fn time_now_ms(&self) -> u32 {
        self.time_base.elapsed().as_millis() as u32
    }
}

impl Default for Epoch {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed distance from `earlier` to `later`, tolerant of wraparound.
pub fn time_diff(later: u32, earlier: u32) -> i32 {
    later.wrapping_sub(earlier) as i32
}
