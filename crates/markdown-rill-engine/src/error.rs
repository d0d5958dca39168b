use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors surfaced by the streaming boundary.
///
/// Malformed markdown is never an error: the state machine always has a
/// paragraph fallback and a reset-on-newline path, so bad input degrades to
/// literal text instead of failing. What remains is lifecycle misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// `feed` was called before `start` (or after `stop`).
    #[error("stream session is not started")]
    NotStarted,
}
