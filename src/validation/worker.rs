//! Off-thread validation.
//!
//! Validation reads whole stream files, so hosts run it on a background
//! thread and pick the report up from a channel once the task has finished.

use crate::result::TaskResult;
use crate::validation::motion::StreamSource;
use crate::validation::task::{inspect, TaskIdentifier};
use crate::validation::validator::{SessionValidator, ValidationReport};
use crossbeam_channel::{bounded, unbounded, Receiver};
use std::sync::Arc;
use std::thread;

/// Validate `task_result` on a background thread.
///
/// The receiver yields exactly one report. If the worker dies before
/// reporting, the receiver disconnects without a value.
pub fn spawn_validation<S: StreamSource + 'static>(
    task_result: TaskResult,
    validator: Arc<SessionValidator<S>>,
    task: Option<TaskIdentifier>,
) -> Receiver<ValidationReport> {
    let (sender, receiver) = bounded(1);

    thread::spawn(move || {
        let report = inspect(&validator, &task_result, task);
        if sender.send(report).is_err() {
            tracing::debug!(
                "Validation report for {} dropped, receiver gone",
                task_result.identifier
            );
        }
    });

    receiver
}

/// Validate several task results on one background thread.
///
/// Reports arrive in input order; the channel closes after the last one.
pub fn spawn_batch<S: StreamSource + 'static>(
    task_results: Vec<TaskResult>,
    validator: Arc<SessionValidator<S>>,
) -> Receiver<ValidationReport> {
    let (sender, receiver) = unbounded();

    thread::spawn(move || {
        for task_result in &task_results {
            if sender.send(inspect(&validator, task_result, None)).is_err() {
                break;
            }
        }
    });

    receiver
}
