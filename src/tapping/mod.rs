//! Finger tapping assessment.
//!
//! This module turns raw touch events into scored, timestamped samples and
//! adapts the recorder to the host's step lifecycle.

pub mod recorder;
pub mod step;
pub mod types;

// Re-export commonly used types
pub use recorder::{RecorderError, RecorderState, TapSampleRecorder, TouchOutcome};
pub use step::{TappingStep, DEFAULT_TAPPING_DURATION, DEFAULT_TIMER_INTERVAL};
pub use types::{ButtonIdentifier, Point, Rect, Size, TapRegions, TapSample, TappingResult};
