//! Result tree types and the glue that writes assessment output into it.

pub mod assembler;
pub mod tree;

pub use assembler::ResultAssembler;
pub use tree::{
    AncestorChain, AnswerResult, CollectionResult, FileResult, PathLevel, ResultKind, StepResult,
    TaskResult,
};
