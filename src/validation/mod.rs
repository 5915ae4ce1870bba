//! Post-capture validation of recorded motion streams.

pub mod motion;
pub mod task;
pub mod validator;
pub mod worker;

// Re-export commonly used types
pub use motion::{
    decode_records, FsStreamSource, MemoryStreamSource, MotionRecord, StreamError, StreamSource,
};
pub use task::{inspect, TaskIdentifier};
pub use validator::{
    Diagnostic, MissingPart, MotionBounds, SegmentMeasurement, SessionValidator,
    ValidationReport, MOTION_STREAM_KEY,
};
pub use worker::{spawn_batch, spawn_validation};
