use std::time::{Duration, Instant};

/// Monotonic time source with sub-millisecond resolution
pub trait PlatformClock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// `Instant` backed clock; never goes backwards
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformClock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
