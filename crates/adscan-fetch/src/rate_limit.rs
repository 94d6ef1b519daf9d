//! Request pacing for externally rate-limited providers.
//!
//! The orchestrator awaits [`Pacer::pace`] before every fetch. Swapping the
//! policy (fixed interval, none, or something smarter) does not touch the
//! pipeline itself.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

pub trait Pacer {
    /// Wait until the next request is allowed, then record it as sent.
    fn pace(&mut self) -> impl Future<Output = ()> + Send;
}

/// Enforces a minimum interval between consecutive request starts.
///
/// The first call never waits.
#[derive(Debug, Clone)]
pub struct MinInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl MinInterval {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Pacer for MinInterval {
    async fn pace(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let wait = self.interval - elapsed;
                tracing::debug!(wait = ?wait, "pacing before next request");
                tokio::time::sleep(wait).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

/// No pacing at all; used for offline runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    async fn pace(&mut self) {}
}
