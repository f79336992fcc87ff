//! Clock seam used by provider records.
//!
//! Records carry a clock handle so that callers scheduling remediation or
//! reconnect work against a provider share one time source; the store codec
//! itself never reads it.

use std::fmt::Debug;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync + Debug {
    /// Milliseconds of monotonic time since this clock was created.
    fn elapsed_millis(&self) -> u64;

    /// Milliseconds since the Unix epoch.
    fn wall_clock_millis(&self) -> i64;
}

/// System-backed clock.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn wall_clock_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}
