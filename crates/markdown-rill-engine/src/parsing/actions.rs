//! Pure state transitions dispatched by the parser state machine.
//!
//! Each [`Action`] consumes the current [`Context`] and returns the next
//! one. The enum replaces a name-keyed operation table: a transition that
//! does not exist cannot be named, so there is no unknown-operation failure
//! path left to handle at runtime.

use tracing::trace;

use super::context::Context;
use super::patterns::{library, truncate_trailing_newlines};
use super::types::{BlockKind, ParsedSegment, StyleGroup};

/// Which pattern variant [`Action::ApplyInlineTextStyle`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVariant {
    /// Opening and closing markers both inside the segment.
    Full,
    /// Opening marker only; the style stays active afterwards.
    PartialStart,
    /// Closing marker for a style opened in an earlier segment.
    PartialEnd,
}

/// One pure transition over the parse context.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// Classify the segment as a header and derive its level.
    SetHeader { segment: &'a str },
    /// Fall back to (or stay in) paragraph.
    SetParagraph,
    /// Classify the segment as an opening fence and extract the language.
    SetCodeBlock { segment: &'a str },
    SetProcessingNewLine(bool),
    SetStylingMarkerSegment(bool),
    /// Run one style pattern variant and stash its capture groups.
    ApplyInlineTextStyle {
        group: StyleGroup,
        variant: StyleVariant,
        segment: &'a str,
    },
    BufferBlockContent { segment: &'a str },
    BufferCodeBlockSegment { segment: &'a str },
    ResetBlockContentBuffer,
    ResetCodeBlockSegments,
    ResetInlineTextStyle,
    ResetPrefixedContent,
    ResetPostfixedContent,
}

/// Applies one action, consuming the current context and returning the next.
pub fn apply(action: Action<'_>, mut context: Context) -> Context {
    match action {
        Action::SetHeader { segment } => {
            if let Some(caps) = library().header_marker.captures(segment) {
                // Level counts the captured hashes minus one. The marker
                // match accepts 7+ hashes but captures at most six, so the
                // reported level tops out at 5 and surplus hashes fold into
                // the title text.
                let hashes = caps[1].trim_end().len();
                context.header_level = hashes.saturating_sub(1) as u8;
                context.block_type = Some(BlockKind::Header);
                context.is_block_defining = true;
            }
            context
        }
        Action::SetParagraph => {
            // Block-defining only when the type actually changes or a fresh
            // line begins; consecutive paragraph segments continue the block.
            context.is_block_defining = context.block_type != Some(BlockKind::Paragraph)
                || context.is_processing_new_line;
            context.block_type = Some(BlockKind::Paragraph);
            context
        }
        Action::SetCodeBlock { segment } => {
            context.code_block_language = library()
                .code_block_start
                .captures(segment)
                .map(|caps| caps[2].to_string())
                .unwrap_or_default();
            context.block_type = Some(BlockKind::CodeBlock);
            context.is_block_defining = true;
            context
        }
        Action::SetProcessingNewLine(value) => {
            context.is_processing_new_line = value;
            context
        }
        Action::SetStylingMarkerSegment(value) => {
            context.is_processing_styling_marker_segment = value;
            context
        }
        Action::ApplyInlineTextStyle {
            group,
            variant,
            segment,
        } => apply_inline_text_style(context, group, variant, segment),
        Action::BufferBlockContent { segment } => {
            context.block_content_buffer.push_str(segment);
            context
        }
        Action::BufferCodeBlockSegment { segment } => {
            context.code_block_segments.push_back(segment.to_string());
            context
        }
        Action::ResetBlockContentBuffer => {
            context.block_content_buffer.clear();
            context
        }
        Action::ResetCodeBlockSegments => {
            context.code_block_segments.clear();
            context
        }
        Action::ResetInlineTextStyle => {
            context.styles.clear();
            context
        }
        Action::ResetPrefixedContent => {
            context.prefixed_content.clear();
            context
        }
        Action::ResetPostfixedContent => {
            context.postfixed_content.clear();
            context
        }
    }
}

fn apply_inline_text_style(
    mut context: Context,
    group: StyleGroup,
    variant: StyleVariant,
    segment: &str,
) -> Context {
    let patterns = library().style(group);
    let (prefixed, content, postfixed) = match variant {
        StyleVariant::Full => patterns
            .full
            .captures(segment)
            .map(|caps| (capture(&caps, 1), capture(&caps, 3), capture(&caps, 5)))
            .unwrap_or_default(),
        // The residue group (trailing whitespace the content class cannot
        // hold) is discarded; the space appended below stands in for it.
        StyleVariant::PartialStart => patterns
            .partial_start
            .captures(segment)
            .map(|caps| (capture(&caps, 1), capture(&caps, 3), String::new()))
            .unwrap_or_default(),
        StyleVariant::PartialEnd => patterns
            .partial_end
            .captures(segment)
            .map(|caps| (String::new(), capture(&caps, 1), capture(&caps, 3)))
            .unwrap_or_default(),
    };

    // Without postfixed content the closing marker ate the word delimiter,
    // so restore one space to keep adjacent words apart.
    context.parsed_segment = if postfixed.is_empty() {
        format!("{content} ")
    } else {
        content
    };
    context.prefixed_content = prefixed;
    context.postfixed_content = postfixed;
    context.styles = group.tags().to_vec();
    context
}

fn capture(caps: &regex::Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map_or_else(String::new, |m| m.as_str().to_string())
}

/// How [`emitted_segment`] renders the outgoing text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    /// Strip one trailing newline run from the emitted text.
    pub truncate_trailing_newline: bool,
    /// Emit with an empty style list even while a style group is active.
    /// Used for the unstyled prefixed/postfixed fragments around a styled
    /// span.
    pub skip_styles: bool,
}

impl EmitOptions {
    pub const TRUNCATED: Self = Self {
        truncate_trailing_newline: true,
        skip_styles: false,
    };
    pub const VERBATIM: Self = Self {
        truncate_trailing_newline: false,
        skip_styles: false,
    };
    pub const TRUNCATED_UNSTYLED: Self = Self {
        truncate_trailing_newline: true,
        skip_styles: true,
    };
    pub const VERBATIM_UNSTYLED: Self = Self {
        truncate_trailing_newline: false,
        skip_styles: true,
    };
}

/// Builds the output record for `segment` from the current context.
///
/// `language` is attached exactly to code-block records and `level` exactly
/// to header records. The context itself is untouched; callers pair this
/// with [`after_emit`] once the record has been delivered.
pub fn emitted_segment(context: &Context, segment: &str, options: &EmitOptions) -> ParsedSegment {
    let text = if options.truncate_trailing_newline {
        truncate_trailing_newlines(segment)
    } else {
        segment
    };
    let kind = context.block_type.unwrap_or(BlockKind::Paragraph);
    let record = ParsedSegment {
        segment: text.to_string(),
        kind,
        styles: if options.skip_styles {
            Vec::new()
        } else {
            context.styles.clone()
        },
        language: (kind == BlockKind::CodeBlock).then(|| context.code_block_language.clone()),
        level: (kind == BlockKind::Header).then_some(context.header_level),
        is_block_defining: context.is_block_defining,
        is_processing_new_line: context.is_processing_new_line,
    };
    trace!(?kind, segment = %record.segment, styles = ?record.styles, "built parsed segment");
    record
}

/// Post-emission patch: the record just delivered consumed the
/// block-defining and fresh-line flags.
pub fn after_emit(mut context: Context) -> Context {
    context.is_block_defining = false;
    context.is_processing_new_line = false;
    context
}
