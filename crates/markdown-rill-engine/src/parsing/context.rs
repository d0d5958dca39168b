use std::collections::VecDeque;

use super::types::{BlockKind, StyleTag};

/// Mutable parse state owned by one [`super::ParserStateMachine`].
///
/// Nothing mutates a `Context` in place: every transition consumes the
/// current value and returns the next one (see [`super::actions::apply`]),
/// so each step stays a pure, separately testable function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// True while the cursor sits at the start of a fresh line. Headers are
    /// only recognized while this holds.
    pub is_processing_new_line: bool,
    /// Set when the current segment is a block marker (header hashes,
    /// opening fence) that must be consumed without being rendered.
    pub is_processing_styling_marker_segment: bool,
    /// Accumulated text of the block being parsed.
    pub block_content_buffer: String,
    pub block_type: Option<BlockKind>,
    /// Styled content extracted by the last `ApplyInlineTextStyle`.
    pub parsed_segment: String,
    /// Unstyled text captured before the opening style marker.
    pub prefixed_content: String,
    /// Unstyled text captured after the closing style marker.
    pub postfixed_content: String,
    /// Style tags attached to emitted segments; non-empty only while a
    /// style group is open.
    pub styles: Vec<StyleTag>,
    /// Whether the next emitted segment opens a new block.
    pub is_block_defining: bool,
    pub header_level: u8,
    pub code_block_language: String,
    /// Lookahead queue for closing-fence detection. Holds at most two
    /// segments; drained back to one (or zero) on every dispatch.
    pub code_block_segments: VecDeque<String>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            is_processing_new_line: true,
            is_processing_styling_marker_segment: false,
            block_content_buffer: String::new(),
            block_type: None,
            parsed_segment: String::new(),
            prefixed_content: String::new(),
            postfixed_content: String::new(),
            styles: Vec::new(),
            is_block_defining: true,
            header_level: 0,
            code_block_language: String::new(),
            code_block_segments: VecDeque::new(),
        }
    }
}
