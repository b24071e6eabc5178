//! Adaptive, open-loop send throttle for file and folder transfers.
//!
//! The sender paces outbound chunks by total transfer size rather than by
//! measuring throughput: bigger transfers get longer, less frequent pauses
//! so the receiver has time to drain its socket buffer.

use std::time::Duration;

#[cfg(any(test, feature = "test-support"))]
mod test_support;

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{recorded_sleep_session, RecordedSleepSession};

#[cfg(any(test, feature = "test-support"))]
use test_support::append_recorded_sleep;

const HUNDRED_MIB: u64 = 100 * 1024 * 1024;
const TEN_MIB: u64 = 10 * 1024 * 1024;

/// One of the three size buckets the pacing schedule is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Large,
    Medium,
    Small,
}

impl SizeTier {
    #[must_use]
    pub const fn for_size(total_bytes: u64) -> Self {
        if total_bytes > HUNDRED_MIB {
            Self::Large
        } else if total_bytes >= TEN_MIB {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Chunks between pacing pauses.
    #[must_use]
    pub const fn interval_chunks(self) -> u32 {
        match self {
            Self::Large => 4,
            Self::Medium => 8,
            Self::Small => 16,
        }
    }

    /// Pause duration at each interval boundary.
    #[must_use]
    pub const fn interval_sleep(self) -> Duration {
        match self {
            Self::Large => Duration::from_millis(30),
            Self::Medium => Duration::from_millis(20),
            Self::Small => Duration::from_millis(5),
        }
    }

    /// Wait observed after the final chunk and before the terminating
    /// message, giving the receiver time to drain.
    #[must_use]
    pub const fn final_wait(self) -> Duration {
        match self {
            Self::Large => Duration::from_millis(500),
            Self::Medium => Duration::from_millis(200),
            Self::Small => Duration::from_millis(100),
        }
    }
}

/// Tracks chunk count for one transfer and decides when to pace.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    tier: SizeTier,
    chunks_sent: u32,
}

impl Throttle {
    #[must_use]
    pub const fn new(total_bytes: u64) -> Self {
        Self { tier: SizeTier::for_size(total_bytes), chunks_sent: 0 }
    }

    #[must_use]
    pub const fn tier(&self) -> SizeTier {
        self.tier
    }

    /// Records that one chunk was written and sleeps if this chunk
    /// completes a pacing interval. Returns the duration actually slept
    /// (zero if this chunk didn't land on a boundary).
    pub fn on_chunk_sent(&mut self) -> Duration {
        self.chunks_sent += 1;
        if self.chunks_sent % self.tier.interval_chunks() == 0 {
            let sleep = self.tier.interval_sleep();
            sleep_for(sleep);
            sleep
        } else {
            Duration::ZERO
        }
    }

    /// Waits after the final chunk, before the terminating message is sent.
    pub fn wait_for_drain(&self) {
        sleep_for(self.tier.final_wait());
    }
}

fn sleep_for(duration: Duration) {
    #[cfg(any(test, feature = "test-support"))]
    {
        append_recorded_sleep(duration);
        #[cfg(not(test))]
        std::thread::sleep(duration);
    }

    #[cfg(all(not(test), not(feature = "test-support")))]
    std::thread::sleep(duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_match_documented_thresholds() {
        assert_eq!(SizeTier::for_size(200 * 1024 * 1024), SizeTier::Large);
        assert_eq!(SizeTier::for_size(50 * 1024 * 1024), SizeTier::Medium);
        assert_eq!(SizeTier::for_size(10 * 1024 * 1024), SizeTier::Medium);
        assert_eq!(SizeTier::for_size(1024), SizeTier::Small);
    }

    #[test]
    fn small_file_pauses_every_sixteen_chunks() {
        let mut session = recorded_sleep_session();
        session.clear();
        let mut throttle = Throttle::new(1024);
        for _ in 0..15 {
            assert_eq!(throttle.on_chunk_sent(), Duration::ZERO);
        }
        assert_eq!(throttle.on_chunk_sent(), Duration::from_millis(5));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn large_file_uses_thirty_millisecond_pacing_and_five_hundred_final_wait() {
        let mut session = recorded_sleep_session();
        session.clear();
        let mut throttle = Throttle::new(200 * 1024 * 1024);
        for _ in 0..4 {
            throttle.on_chunk_sent();
        }
        throttle.wait_for_drain();
        let recorded = session.take();
        assert_eq!(recorded, vec![Duration::from_millis(30), Duration::from_millis(500)]);
    }
}
