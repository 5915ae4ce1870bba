//! Merging recorder output into the task result tree.

use crate::result::tree::{ResultKind, StepResult, TaskResult};
use crate::tapping::types::TappingResult;

/// Places a finished [`TappingResult`] into the step history.
///
/// A step that already has a tapping result keeps its original start date.
/// A step whose current result is a collection gets the tapping result added
/// as one of its inputs, so form answers recorded by the same step survive.
pub struct ResultAssembler;

impl ResultAssembler {
    /// Merge `tapping` into `task_result` under the tapping result's identifier.
    pub fn merge(task_result: &mut TaskResult, mut tapping: TappingResult) {
        let previous = task_result.find_result(&tapping.identifier).cloned();

        let merged = match previous {
            Some(StepResult {
                kind: ResultKind::Tapping(existing),
                ..
            }) => {
                tapping.start_date = existing.start_date;
                StepResult::tapping(tapping)
            }
            Some(StepResult {
                identifier,
                start_date,
                kind: ResultKind::Collection(mut collection),
                ..
            }) => {
                let end_date = tapping.end_date;
                collection.append_input_result(StepResult::tapping(tapping));
                StepResult {
                    identifier,
                    start_date,
                    end_date,
                    kind: ResultKind::Collection(collection),
                }
            }
            Some(other) => {
                tapping.start_date = other.start_date;
                StepResult::tapping(tapping)
            }
            None => StepResult::tapping(tapping),
        };

        tracing::debug!(
            "Merged tapping result into {} under {}",
            task_result.identifier,
            merged.identifier
        );
        task_result.append_step_history(merged);
    }
}
