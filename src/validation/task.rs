//! The assessment catalogue and the segments each task is expected to record.

use crate::hand::{hand_order, Hand, HandOrder, SELECTION_KEY};
use crate::result::{AncestorChain, TaskResult};
use crate::validation::motion::StreamSource;
use crate::validation::validator::{Diagnostic, MissingPart, SessionValidator, ValidationReport};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The assessments this crate knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskIdentifier {
    WalkAndBalance,
    Tremor,
    #[serde(rename = "Kinetic Tremor")]
    KineticTremor,
    RestingKineticTremor,
    Tapping,
    Walk30Seconds,
}

impl TaskIdentifier {
    pub const ALL: [TaskIdentifier; 6] = [
        TaskIdentifier::WalkAndBalance,
        TaskIdentifier::Tremor,
        TaskIdentifier::KineticTremor,
        TaskIdentifier::RestingKineticTremor,
        TaskIdentifier::Tapping,
        TaskIdentifier::Walk30Seconds,
    ];

    /// The identifier used for the task's root result.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskIdentifier::WalkAndBalance => "WalkAndBalance",
            TaskIdentifier::Tremor => "Tremor",
            TaskIdentifier::KineticTremor => "Kinetic Tremor",
            TaskIdentifier::RestingKineticTremor => "RestingKineticTremor",
            TaskIdentifier::Tapping => "Tapping",
            TaskIdentifier::Walk30Seconds => "Walk30Seconds",
        }
    }

    /// Whether the task is performed once per hand.
    pub fn is_two_hand(self) -> bool {
        !matches!(
            self,
            TaskIdentifier::WalkAndBalance | TaskIdentifier::Walk30Seconds
        )
    }

    /// Segment identifiers for a given hand order.
    ///
    /// Walk tasks ignore the order.
    pub fn segments_for(self, order: &HandOrder) -> Vec<String> {
        match self {
            TaskIdentifier::WalkAndBalance => vec!["walk".to_string(), "balance".to_string()],
            TaskIdentifier::Walk30Seconds => vec!["walk".to_string()],
            TaskIdentifier::Tapping | TaskIdentifier::Tremor | TaskIdentifier::KineticTremor => {
                order.identifiers()
            }
            TaskIdentifier::RestingKineticTremor => order
                .hands()
                .iter()
                .flat_map(|hand| {
                    [
                        format!("resting{}", hand.capitalized()),
                        format!("kinetic{}", hand.capitalized()),
                    ]
                })
                .collect(),
        }
    }

    /// Segment identifiers expected in `task_result`.
    ///
    /// Two-hand tasks read the hand order recorded in the result.
    pub fn expected_segments(self, task_result: &TaskResult) -> Result<Vec<String>, Diagnostic> {
        if !self.is_two_hand() {
            return Ok(self.segments_for(&HandOrder::single(Hand::Left)));
        }

        let chain = AncestorChain::new(self.as_str()).within(task_result);
        hand_order(&chain)
            .map(|order| self.segments_for(&order))
            .ok_or_else(|| Diagnostic::Missing {
                segment: SELECTION_KEY.to_string(),
                what: MissingPart::HandOrder,
            })
    }
}

impl std::fmt::Display for TaskIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskIdentifier {
    type Err = Diagnostic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskIdentifier::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| Diagnostic::UnrecognizedTask {
                identifier: s.to_string(),
            })
    }
}

/// Validate a finished task result against its task's expected segments.
///
/// The task is taken from the result's identifier unless `task` is given.
pub fn inspect<S: StreamSource>(
    validator: &SessionValidator<S>,
    task_result: &TaskResult,
    task: Option<TaskIdentifier>,
) -> ValidationReport {
    let task = match task {
        Some(task) => Ok(task),
        None => task_result.identifier.parse::<TaskIdentifier>(),
    };

    match task.and_then(|task| task.expected_segments(task_result)) {
        Ok(segments) => validator.validate_report(task_result, &segments),
        Err(diagnostic) => {
            tracing::warn!("{}", diagnostic);
            ValidationReport {
                task_identifier: task_result.identifier.clone(),
                segments: Vec::new(),
                measurements: Vec::new(),
                diagnostics: vec![diagnostic],
            }
        }
    }
}
