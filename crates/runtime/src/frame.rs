/// Animation frame metadata handed to per-frame work.
///
/// Frames are numbered from 0 and advance by one per paint. The host decides
/// the wall-clock cadence; the runtime only sees the index and elapsed time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the first frame.
    pub elapsed_s: f64,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            elapsed_s: 0.0,
        }
    }

    pub fn new(index: u64, elapsed_s: f64) -> Self {
        Self { index, elapsed_s }
    }

    /// Advances to the following paint, `dt_s` seconds later.
    pub fn next(self, dt_s: f64) -> Self {
        Self::new(self.index + 1, self.elapsed_s + dt_s.max(0.0))
    }
}
