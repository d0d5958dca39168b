use serde::{Deserialize, Serialize};

/// Top-level construct a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Header,
    Paragraph,
    CodeBlock,
}

/// Inline style tag carried on emitted segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    Bold,
    Italic,
    Strikethrough,
    Code,
}

/// Inline emphasis construct recognized by the pattern library.
///
/// Each group owns four pattern variants (full, partial start, partial end,
/// partial-or-full) and maps to one or two [`StyleTag`]s on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleGroup {
    Italic,
    Bold,
    BoldItalic,
    Strikethrough,
    InlineCode,
}

impl StyleGroup {
    /// Routing precedence: the first group whose partial-or-full pattern
    /// matches a segment claims it.
    pub const ROUTING_ORDER: [StyleGroup; 5] = [
        StyleGroup::Italic,
        StyleGroup::Bold,
        StyleGroup::BoldItalic,
        StyleGroup::Strikethrough,
        StyleGroup::InlineCode,
    ];

    /// Style tags applied while this group is active.
    pub fn tags(self) -> &'static [StyleTag] {
        match self {
            StyleGroup::Italic => &[StyleTag::Italic],
            StyleGroup::Bold => &[StyleTag::Bold],
            StyleGroup::BoldItalic => &[StyleTag::Bold, StyleTag::Italic],
            StyleGroup::Strikethrough => &[StyleTag::Strikethrough],
            StyleGroup::InlineCode => &[StyleTag::Code],
        }
    }
}

/// Block axis of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Routing,
    Header,
    Paragraph,
    CodeBlock,
}

/// Inline-style axis of the state machine. The two axes advance
/// independently and are cross-evaluated on every segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineStyleState {
    #[default]
    Routing,
    Active(StyleGroup),
}

/// One renderable output event.
///
/// `language` is present exactly for code-block records (empty string when
/// the fence named no language); `level` exactly for header records. The
/// serde shape is the camelCase wire format consumed by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSegment {
    pub segment: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub styles: Vec<StyleTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    pub is_block_defining: bool,
    pub is_processing_new_line: bool,
}
