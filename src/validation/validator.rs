//! Post-capture checks on recorded motion streams.
//!
//! The validator walks a finished task result, finds the motion stream of
//! every expected segment and checks that the recording spans the expected
//! duration. Every segment is evaluated; findings are collected rather than
//! stopping at the first one.

use crate::result::{StepResult, TaskResult};
use crate::validation::motion::{
    decode_records, FsStreamSource, StreamError, StreamSource,
};
use serde::{Deserialize, Serialize};

/// Identifier of the recorded motion stream within a segment.
pub const MOTION_STREAM_KEY: &str = "motion";

/// Accepted span of a motion recording, in seconds (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionBounds {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for MotionBounds {
    fn default() -> Self {
        Self {
            min_secs: 29.0,
            max_secs: 35.0,
        }
    }
}

impl MotionBounds {
    pub fn contains(&self, delta: f64) -> bool {
        delta >= self.min_secs && delta <= self.max_secs
    }
}

/// The part of a segment that could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
    /// No section result for the segment
    Segment,
    /// No motion stream in the section
    Stream,
    /// The motion stream has no file reference
    FileReference,
    /// A two-hand task carries no recorded hand order
    HandOrder,
}

impl std::fmt::Display for MissingPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingPart::Segment => write!(f, "section result"),
            MissingPart::Stream => write!(f, "motion result"),
            MissingPart::FileReference => write!(f, "motion file url"),
            MissingPart::HandOrder => write!(f, "hand order"),
        }
    }
}

/// A finding about a task result, for developer inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The task identifier is not one of the known assessments
    UnrecognizedTask { identifier: String },
    /// An expected part of a segment is absent
    Missing { segment: String, what: MissingPart },
    /// The motion stream has no records
    Empty { segment: String },
    /// The recording span is outside the accepted bounds
    OutOfBounds {
        segment: String,
        delta: f64,
        start: f64,
        end: f64,
    },
    /// The motion stream could not be read or decoded
    DecodeFailure { segment: String, cause: StreamError },
}

impl Diagnostic {
    /// The segment the finding concerns, if any.
    pub fn segment(&self) -> Option<&str> {
        match self {
            Diagnostic::UnrecognizedTask { .. } => None,
            Diagnostic::Missing { segment, .. }
            | Diagnostic::Empty { segment }
            | Diagnostic::OutOfBounds { segment, .. }
            | Diagnostic::DecodeFailure { segment, .. } => Some(segment),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnrecognizedTask { identifier } => {
                write!(f, "Task identifier not recognized: {identifier}")
            }
            Diagnostic::Missing { segment, what } => write!(f, "Missing {what} for {segment}"),
            Diagnostic::Empty { segment } => write!(f, "The motion result for {segment} was empty"),
            Diagnostic::OutOfBounds {
                segment,
                delta,
                start,
                end,
            } => write!(
                f,
                "The recording for {segment} was not within expected bounds: delta={delta}, start={start}, end={end}"
            ),
            Diagnostic::DecodeFailure { segment, cause } => {
                write!(f, "Failed to decode the motion record for {segment}: {cause}")
            }
        }
    }
}

/// Measured span of a segment that decoded successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMeasurement {
    pub segment: String,
    pub delta: f64,
}

/// Outcome of validating one task result.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub task_identifier: String,
    pub segments: Vec<String>,
    pub measurements: Vec<SegmentMeasurement>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Validates recorded motion streams against duration bounds.
pub struct SessionValidator<S: StreamSource = FsStreamSource> {
    bounds: MotionBounds,
    source: S,
}

impl SessionValidator<FsStreamSource> {
    /// A validator reading streams from disk with the default bounds.
    pub fn new() -> Self {
        Self::with_source(FsStreamSource)
    }
}

impl Default for SessionValidator<FsStreamSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StreamSource> SessionValidator<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            bounds: MotionBounds::default(),
            source,
        }
    }

    pub fn with_bounds(mut self, bounds: MotionBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn bounds(&self) -> MotionBounds {
        self.bounds
    }

    /// Check every expected segment and collect the findings.
    pub fn validate(&self, task_result: &TaskResult, segments: &[String]) -> Vec<Diagnostic> {
        self.validate_report(task_result, segments).diagnostics
    }

    /// Like [`SessionValidator::validate`], also returning measured spans.
    pub fn validate_report(&self, task_result: &TaskResult, segments: &[String]) -> ValidationReport {
        let mut report = ValidationReport {
            task_identifier: task_result.identifier.clone(),
            segments: segments.to_vec(),
            measurements: Vec::new(),
            diagnostics: Vec::new(),
        };

        for segment in segments {
            match self.measure_segment(task_result, segment) {
                Ok((start, end)) => {
                    let delta = end - start;
                    if self.bounds.contains(delta) {
                        tracing::info!("{}_motion={}", segment, delta);
                    } else {
                        report.diagnostics.push(Diagnostic::OutOfBounds {
                            segment: segment.clone(),
                            delta,
                            start,
                            end,
                        });
                    }
                    report.measurements.push(SegmentMeasurement {
                        segment: segment.clone(),
                        delta,
                    });
                }
                Err(diagnostic) => report.diagnostics.push(diagnostic),
            }
        }

        for diagnostic in &report.diagnostics {
            tracing::warn!("{}", diagnostic);
        }
        report
    }

    /// Decode a segment's stream and return its first and last timestamps.
    fn measure_segment(
        &self,
        task_result: &TaskResult,
        segment: &str,
    ) -> Result<(f64, f64), Diagnostic> {
        let missing = |what| Diagnostic::Missing {
            segment: segment.to_string(),
            what,
        };

        let section = task_result
            .find_result(segment)
            .and_then(StepResult::as_task)
            .ok_or_else(|| missing(MissingPart::Segment))?;
        let motion = section
            .find_async_result(MOTION_STREAM_KEY)
            .and_then(StepResult::as_file)
            .ok_or_else(|| missing(MissingPart::Stream))?;
        let url = motion
            .url
            .as_deref()
            .ok_or_else(|| missing(MissingPart::FileReference))?;

        let decode_failure = |cause| Diagnostic::DecodeFailure {
            segment: segment.to_string(),
            cause,
        };
        let bytes = self.source.read(url).map_err(decode_failure)?;
        let records = decode_records(&bytes).map_err(decode_failure)?;

        match (records.first(), records.last()) {
            (Some(first), Some(last)) => Ok((first.timestamp, last.timestamp)),
            _ => Err(Diagnostic::Empty {
                segment: segment.to_string(),
            }),
        }
    }
}
