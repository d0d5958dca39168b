pub mod buffer;
pub mod error;
pub mod parsing;
pub mod session;

mod subscription;

// Re-export key types for easier usage
pub use buffer::SegmentBuffer;
pub use error::{Result, StreamError};
pub use parsing::{
    BlockKind, BlockState, Context, InlineStyleState, ParsedSegment, ParserStateMachine,
    StyleGroup, StyleTag,
};
pub use session::StreamSession;
pub use subscription::SubscriptionId;
