//! Task result tree shared between the host and the assessment steps.
//!
//! Results are a closed set of variants so that lookups match exhaustively
//! instead of guessing at concrete types. Steps only ever read the tree
//! through an [`AncestorChain`] snapshot; writes go through the task result
//! owned by the host.

use crate::tapping::types::TappingResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A single entry in a task's step history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub identifier: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub kind: ResultKind,
}

impl StepResult {
    /// Create a result stamped with the current time.
    pub fn new(identifier: impl Into<String>, kind: ResultKind) -> Self {
        let now = Utc::now();
        Self {
            identifier: identifier.into(),
            start_date: now,
            end_date: now,
            kind,
        }
    }

    /// A result with no payload.
    pub fn generic(identifier: impl Into<String>) -> Self {
        Self::new(identifier, ResultKind::Generic)
    }

    /// Wrap a finished tapping result.
    pub fn tapping(result: TappingResult) -> Self {
        Self {
            identifier: result.identifier.clone(),
            start_date: result.start_date,
            end_date: result.end_date,
            kind: ResultKind::Tapping(result),
        }
    }

    /// A single answer value.
    pub fn answer(identifier: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(identifier, ResultKind::Answer(AnswerResult { value }))
    }

    /// A reference to a recorded file.
    pub fn file(identifier: impl Into<String>, url: Option<PathBuf>) -> Self {
        Self::new(
            identifier,
            ResultKind::FileBacked(FileResult {
                url,
                content_type: Some("application/json".to_string()),
            }),
        )
    }

    /// A nested section result.
    pub fn task(result: TaskResult) -> Self {
        Self {
            identifier: result.identifier.clone(),
            start_date: result.start_date,
            end_date: result.end_date,
            kind: ResultKind::Task(result),
        }
    }

    pub fn as_tapping(&self) -> Option<&TappingResult> {
        match &self.kind {
            ResultKind::Tapping(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionResult> {
        match &self.kind {
            ResultKind::Collection(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileResult> {
        match &self.kind {
            ResultKind::FileBacked(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_answer(&self) -> Option<&AnswerResult> {
        match &self.kind {
            ResultKind::Answer(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&TaskResult> {
        match &self.kind {
            ResultKind::Task(r) => Some(r),
            _ => None,
        }
    }
}

/// The payload of a [`StepResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultKind {
    Tapping(TappingResult),
    Collection(CollectionResult),
    FileBacked(FileResult),
    Answer(AnswerResult),
    Task(TaskResult),
    Generic,
}

/// A group of input results recorded by one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectionResult {
    pub input_results: Vec<StepResult>,
}

impl CollectionResult {
    /// Append an input result, replacing any previous one with the same identifier.
    pub fn append_input_result(&mut self, result: StepResult) {
        replace_or_push(&mut self.input_results, result);
    }

    pub fn find_result(&self, identifier: &str) -> Option<&StepResult> {
        self.input_results
            .iter()
            .rev()
            .find(|r| r.identifier == identifier)
    }

    /// Look up an answer value by identifier.
    pub fn find_answer(&self, identifier: &str) -> Option<&serde_json::Value> {
        self.find_result(identifier)
            .and_then(StepResult::as_answer)
            .map(|a| &a.value)
    }
}

/// A reference to data written to disk during the step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub value: serde_json::Value,
}

/// The result of a task or of a section within a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub identifier: String,
    pub task_run_uuid: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub step_history: Vec<StepResult>,
    #[serde(default)]
    pub async_results: Vec<StepResult>,
}

impl TaskResult {
    /// Create an empty task result with a fresh run identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            identifier: identifier.into(),
            task_run_uuid: Uuid::new_v4(),
            start_date: now,
            end_date: now,
            step_history: Vec::new(),
            async_results: Vec::new(),
        }
    }

    /// Find a result in the step history by identifier.
    pub fn find_result(&self, identifier: &str) -> Option<&StepResult> {
        self.step_history
            .iter()
            .rev()
            .find(|r| r.identifier == identifier)
    }

    /// Find an async result (e.g. a recorded sensor stream) by identifier.
    pub fn find_async_result(&self, identifier: &str) -> Option<&StepResult> {
        self.async_results.iter().find(|r| r.identifier == identifier)
    }

    /// Append to the step history, replacing any entry with the same identifier.
    pub fn append_step_history(&mut self, result: StepResult) {
        self.end_date = Utc::now();
        replace_or_push(&mut self.step_history, result);
    }

    /// Append an async result, replacing any entry with the same identifier.
    pub fn append_async_result(&mut self, result: StepResult) {
        replace_or_push(&mut self.async_results, result);
    }
}

fn replace_or_push(results: &mut Vec<StepResult>, result: StepResult) {
    if let Some(existing) = results.iter_mut().find(|r| r.identifier == result.identifier) {
        *existing = result;
    } else {
        results.push(result);
    }
}

/// One enclosing task in an [`AncestorChain`].
#[derive(Debug, Clone, Copy)]
pub struct PathLevel<'a> {
    pub identifier: &'a str,
    pub result: &'a TaskResult,
}

/// Read-only view of the task results enclosing a step, innermost first.
///
/// Built fresh for each query so concurrent hand lookups never observe a
/// tree that is being mutated.
#[derive(Debug, Clone)]
pub struct AncestorChain<'a> {
    step_identifier: &'a str,
    levels: Vec<PathLevel<'a>>,
}

impl<'a> AncestorChain<'a> {
    /// Create a chain for `step_identifier` with no enclosing tasks yet.
    pub fn new(step_identifier: &'a str) -> Self {
        Self {
            step_identifier,
            levels: Vec::new(),
        }
    }

    /// Add the next enclosing task, moving outward.
    pub fn within(mut self, result: &'a TaskResult) -> Self {
        self.levels.push(PathLevel {
            identifier: &result.identifier,
            result,
        });
        self
    }

    /// Build the chain by descending from `root` through nested section results.
    ///
    /// `section_path` lists the section identifiers from the root inward.
    /// Descent stops at the first identifier that is not a nested task result.
    pub fn from_root(step_identifier: &'a str, root: &'a TaskResult, section_path: &[&str]) -> Self {
        let mut outward = vec![root];
        let mut current = root;
        for id in section_path {
            match current.find_result(id).and_then(StepResult::as_task) {
                Some(section) => {
                    outward.push(section);
                    current = section;
                }
                None => break,
            }
        }

        outward
            .into_iter()
            .rev()
            .fold(Self::new(step_identifier), |chain, level| chain.within(level))
    }

    pub fn step_identifier(&self) -> &'a str {
        self.step_identifier
    }

    /// Identifier of the task immediately enclosing the step.
    pub fn parent_identifier(&self) -> Option<&'a str> {
        self.levels.first().map(|l| l.identifier)
    }

    /// Enclosing tasks, innermost first.
    pub fn levels(&self) -> &[PathLevel<'a>] {
        &self.levels
    }

    /// Identifier of the outermost task.
    pub fn root_identifier(&self) -> Option<&'a str> {
        self.levels.last().map(|l| l.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_replaces_same_identifier() {
        let mut task = TaskResult::new("Tapping");
        task.append_step_history(StepResult::generic("intro"));
        task.append_step_history(StepResult::answer("choice", serde_json::json!("a")));
        task.append_step_history(StepResult::answer("choice", serde_json::json!("b")));

        assert_eq!(task.step_history.len(), 2);
        let answer = task.find_result("choice").and_then(StepResult::as_answer).unwrap();
        assert_eq!(answer.value, serde_json::json!("b"));
    }

    #[test]
    fn test_collection_find_answer() {
        let mut collection = CollectionResult::default();
        collection.append_input_result(StepResult::answer("handOrder", serde_json::json!(["left"])));
        assert_eq!(
            collection.find_answer("handOrder"),
            Some(&serde_json::json!(["left"]))
        );
        assert_eq!(collection.find_answer("missing"), None);
    }

    #[test]
    fn test_chain_from_root() {
        let mut left = TaskResult::new("left");
        left.append_step_history(StepResult::generic("instruction"));
        let mut root = TaskResult::new("Tapping");
        root.append_step_history(StepResult::task(left));

        let chain = AncestorChain::from_root("tapping", &root, &["left"]);
        assert_eq!(chain.parent_identifier(), Some("left"));
        assert_eq!(chain.root_identifier(), Some("Tapping"));
        assert_eq!(chain.levels().len(), 2);
    }

    #[test]
    fn test_chain_stops_at_missing_section() {
        let root = TaskResult::new("Tapping");
        let chain = AncestorChain::from_root("instruction", &root, &["right"]);
        assert_eq!(chain.parent_identifier(), Some("Tapping"));
        assert_eq!(chain.levels().len(), 1);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let mut section = TaskResult::new("walk");
        section.append_async_result(StepResult::file("motion", Some(PathBuf::from("/tmp/motion.json"))));
        let mut root = TaskResult::new("Walk30Seconds");
        root.append_step_history(StepResult::task(section));

        let json = serde_json::to_string(&root).unwrap();
        assert!(json.contains("\"type\":\"file_backed\""));

        let decoded: TaskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, root);
    }
}
