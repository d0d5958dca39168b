//! Pure predicates over the parse context and the current segment.
//!
//! Like [`super::actions`], the name-keyed check table becomes one
//! exhaustive enum dispatched in [`evaluate`].

use super::context::Context;
use super::patterns::library;
use super::types::StyleGroup;

/// One pure check against the context or the segment under inspection.
#[derive(Debug, Clone, Copy)]
pub enum Evaluation<'a> {
    IsProcessingNewLine,
    IsProcessingStylingMarkerSegment,
    IsBlockTypeSet,
    IsHeaderMarker { segment: &'a str },
    IsInlineStyleFull { group: StyleGroup, segment: &'a str },
    IsInlineStylePartialStart { group: StyleGroup, segment: &'a str },
    IsInlineStylePartialEnd { group: StyleGroup, segment: &'a str },
    IsInlineStylePartialOrFull { group: StyleGroup, segment: &'a str },
    IsCodeBlockStartMarker { segment: &'a str },
    IsCodeBlockEndMarker { segment: &'a str },
    HasNewLine { segment: &'a str },
    HasPrefixedContent,
    HasPostfixedContent,
    EndsWithNewLine { segment: &'a str },
    EndsWithMultipleNewLines { segment: &'a str },
}

/// Runs one evaluation.
pub fn evaluate(context: &Context, evaluation: Evaluation<'_>) -> bool {
    let patterns = library();
    match evaluation {
        Evaluation::IsProcessingNewLine => context.is_processing_new_line,
        Evaluation::IsProcessingStylingMarkerSegment => {
            context.is_processing_styling_marker_segment
        }
        Evaluation::IsBlockTypeSet => context.block_type.is_some(),
        Evaluation::IsHeaderMarker { segment } => patterns.header_marker.is_match(segment),
        Evaluation::IsInlineStyleFull { group, segment } => {
            patterns.style(group).full.is_match(segment)
        }
        Evaluation::IsInlineStylePartialStart { group, segment } => {
            patterns.style(group).partial_start.is_match(segment)
        }
        Evaluation::IsInlineStylePartialEnd { group, segment } => {
            patterns.style(group).partial_end.is_match(segment)
        }
        Evaluation::IsInlineStylePartialOrFull { group, segment } => {
            patterns.style(group).partial_or_full.is_match(segment)
        }
        Evaluation::IsCodeBlockStartMarker { segment } => {
            patterns.code_block_start.is_match(segment)
        }
        Evaluation::IsCodeBlockEndMarker { segment } => patterns.is_code_block_end(segment),
        Evaluation::HasNewLine { segment } => patterns.has_newline.is_match(segment),
        Evaluation::HasPrefixedContent => !context.prefixed_content.is_empty(),
        Evaluation::HasPostfixedContent => !context.postfixed_content.is_empty(),
        Evaluation::EndsWithNewLine { segment } => patterns.ends_with_newline.is_match(segment),
        Evaluation::EndsWithMultipleNewLines { segment } => {
            patterns.ends_with_multiple_newlines.is_match(segment)
        }
    }
}
