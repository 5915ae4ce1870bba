//! Monotonic clock for timing assessment samples.
//!
//! Raw instants are expressed as seconds of system uptime, the same unit the
//! host uses to stamp touch events. A [`Clock`] pins the first instant of a
//! recording session and reports every later instant relative to it.

use std::sync::OnceLock;
use std::time::Instant;

/// Reference point for [`system_uptime`].
static PROCESS_EPOCH: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed on the monotonic clock since the first call in this process.
///
/// Hosts that have no platform uptime of their own can stamp events with this.
pub fn system_uptime() -> f64 {
    PROCESS_EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// A session clock anchored at the instant the recording started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    start_system_uptime: f64,
}

impl Clock {
    /// Create a clock anchored at the given raw uptime instant.
    pub fn new(start_system_uptime: f64) -> Self {
        Self {
            start_system_uptime,
        }
    }

    /// Create a clock anchored at the current [`system_uptime`].
    pub fn start_now() -> Self {
        Self::new(system_uptime())
    }

    /// The raw uptime the clock was anchored at.
    pub fn start_system_uptime(&self) -> f64 {
        self.start_system_uptime
    }

    /// Uptime of `instant` relative to the start of the session.
    pub fn relative_uptime(&self, instant: f64) -> f64 {
        instant - self.start_system_uptime
    }
}
