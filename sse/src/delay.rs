use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Source of the randomized wait before each `time` event.
///
/// Every session owns one of these, so no generator state is shared between
/// connections.
#[derive(Debug)]
pub struct PayloadDelay {
    rng: StdRng,
    bound_millis: u64,
}

impl PayloadDelay {
    /// Seeds the generator from the operating system.
    pub fn from_entropy(bound: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), bound)
    }

    /// Deterministic sequence, for tests and reproducible runs.
    pub fn seeded(seed: u64, bound: Duration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), bound)
    }

    fn with_rng(rng: StdRng, bound: Duration) -> Self {
        let bound_millis = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
        Self { rng, bound_millis }
    }

    /// Draws a delay uniformly from `[0, bound)` at millisecond resolution.
    pub fn next_delay(&mut self) -> Duration {
        if self.bound_millis == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.rng.gen_range(0..self.bound_millis))
    }
}
