pub mod actions;
pub mod context;
pub mod evaluations;
pub mod machine;
pub mod patterns;
pub mod types;

pub use context::Context;
pub use machine::ParserStateMachine;
pub use types::{BlockKind, BlockState, InlineStyleState, ParsedSegment, StyleGroup, StyleTag};
