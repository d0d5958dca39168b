//! The dual-axis segment classifier.
//!
//! Two state axes advance independently: the block axis (header, paragraph,
//! code block) and the inline-style axis. Every segment passes through the
//! same fixed sequence: block routing, inline routing, block dispatch,
//! inline dispatch. Inline styles cannot stand on their own, so the inline
//! handler runs instead of the block handler while a style group is active,
//! and the block axis holds its state until the style resolves.

use std::mem;

use tracing::{debug, trace};

use crate::subscription::{Listeners, SubscriptionId};

use super::actions::{Action, EmitOptions, StyleVariant, after_emit, apply, emitted_segment};
use super::context::Context;
use super::evaluations::{Evaluation, evaluate};
use super::types::{BlockState, InlineStyleState, ParsedSegment, StyleGroup};

/// Incremental markdown classifier over buffer segments.
///
/// Feed segments with [`process_segment`](Self::process_segment); every
/// renderable fragment is delivered synchronously to the subscribers as a
/// [`ParsedSegment`], in arrival order.
#[derive(Debug, Default)]
pub struct ParserStateMachine {
    context: Context,
    block_state: BlockState,
    inline_state: InlineStyleState,
    listeners: Listeners<ParsedSegment>,
}

impl ParserStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for emitted segments.
    pub fn subscribe(&mut self, listener: impl FnMut(&ParsedSegment) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }

    pub fn block_state(&self) -> BlockState {
        self.block_state
    }

    pub fn inline_state(&self) -> InlineStyleState {
        self.inline_state
    }

    /// Read-only view of the parse context, for diagnostics and tests.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Drops all in-flight state: fresh context, both axes back to routing.
    ///
    /// Called internally on block-terminating newlines and externally at
    /// stream end.
    pub fn reset(&mut self) {
        self.context = Context::default();
        self.block_state = BlockState::Routing;
        self.inline_state = InlineStyleState::Routing;
    }

    /// Classifies one buffer segment and emits its renderable fragments.
    pub fn process_segment(&mut self, segment: &str) {
        trace!(block = ?self.block_state, inline = ?self.inline_state, segment, "processing");

        self.route_block(segment);
        self.route_inline(segment);

        if self.block_state != BlockState::Routing && self.inline_state == InlineStyleState::Routing
        {
            match self.block_state {
                BlockState::Header => self.process_header(segment),
                BlockState::Paragraph => self.process_paragraph(segment),
                BlockState::CodeBlock => self.process_code_block(segment),
                BlockState::Routing => {}
            }
        }

        if let InlineStyleState::Active(group) = self.inline_state {
            self.process_inline_style(segment, group);
        }
    }

    fn act(&mut self, action: Action<'_>) {
        self.context = apply(action, mem::take(&mut self.context));
    }

    fn check(&self, evaluation: Evaluation<'_>) -> bool {
        evaluate(&self.context, evaluation)
    }

    fn emit(&mut self, segment: &str, options: EmitOptions) {
        let record = emitted_segment(&self.context, segment, &options);
        self.listeners.notify(&record);
        self.context = after_emit(mem::take(&mut self.context));
    }

    /// Block classification. Runs only while both axes are routing; every
    /// segment resolves to some block, with paragraph as the fallback.
    fn route_block(&mut self, segment: &str) {
        if self.block_state != BlockState::Routing || self.inline_state != InlineStyleState::Routing
        {
            return;
        }

        if self.check(Evaluation::IsProcessingNewLine)
            && self.check(Evaluation::IsHeaderMarker { segment })
        {
            self.act(Action::SetHeader { segment });
            self.act(Action::SetProcessingNewLine(false));
            self.act(Action::SetStylingMarkerSegment(true));
            self.block_state = BlockState::Header;
            debug!(level = self.context.header_level, "routed to header");
        } else if self.check(Evaluation::IsCodeBlockStartMarker { segment }) {
            self.act(Action::SetCodeBlock { segment });
            self.act(Action::SetStylingMarkerSegment(true));
            self.act(Action::ResetBlockContentBuffer);
            self.block_state = BlockState::CodeBlock;
            debug!(language = %self.context.code_block_language, "routed to code block");
        }

        if self.block_state == BlockState::Routing || !self.check(Evaluation::IsBlockTypeSet) {
            self.act(Action::SetParagraph);
        }
        if self.block_state == BlockState::Routing {
            self.block_state = BlockState::Paragraph;
        }
    }

    /// Inline-style classification. Skipped entirely inside code blocks;
    /// the first group whose partial-or-full pattern matches claims the
    /// segment.
    fn route_inline(&mut self, segment: &str) {
        if self.inline_state != InlineStyleState::Routing
            || self.block_state == BlockState::CodeBlock
        {
            return;
        }

        for group in StyleGroup::ROUTING_ORDER {
            if self.check(Evaluation::IsInlineStylePartialOrFull { group, segment }) {
                debug!(?group, "routed to inline style");
                self.inline_state = InlineStyleState::Active(group);
                break;
            }
        }
    }

    fn process_header(&mut self, segment: &str) {
        self.act(Action::BufferBlockContent { segment });

        // The marker segment itself is consumed, never rendered.
        if self.check(Evaluation::IsProcessingStylingMarkerSegment) {
            self.act(Action::SetStylingMarkerSegment(false));
            return;
        }

        self.emit(segment, EmitOptions::TRUNCATED);

        // Headers span exactly one line.
        self.reset_on_trailing_newline(segment);
    }

    fn process_paragraph(&mut self, segment: &str) {
        self.act(Action::BufferBlockContent { segment });
        self.emit(segment, EmitOptions::TRUNCATED);
        self.reset_on_trailing_newline(segment);

        // Back to routing so the next segment is classified on its own.
        self.block_state = BlockState::Routing;
    }

    /// Code-block content flows through a two-slot lookahead queue: the
    /// closing fence is distinguishable from content only once the segment
    /// after it is known, and must itself never be emitted.
    fn process_code_block(&mut self, segment: &str) {
        // The opening fence is consumed, never rendered.
        if self.check(Evaluation::IsProcessingStylingMarkerSegment) {
            self.act(Action::SetStylingMarkerSegment(false));
            return;
        }

        self.act(Action::BufferCodeBlockSegment { segment });
        if self.context.code_block_segments.len() < 2 {
            return;
        }

        let older = self.context.code_block_segments.pop_front().unwrap_or_default();
        let newer = self
            .context
            .code_block_segments
            .front()
            .cloned()
            .unwrap_or_default();
        let older_closes = self.check(Evaluation::IsCodeBlockEndMarker { segment: &older });
        let newer_closes = self.check(Evaluation::IsCodeBlockEndMarker { segment: &newer });

        match (older_closes, newer_closes) {
            // Ordinary content with more to come: emit verbatim, interior
            // newlines kept.
            (false, false) => {
                self.act(Action::BufferBlockContent { segment: &older });
                self.emit(&older, EmitOptions::VERBATIM);
            }
            // The next segment closes the fence, so this is the last
            // content line.
            (false, true) => {
                self.act(Action::BufferBlockContent { segment: &older });
                self.emit(&older, EmitOptions::TRUNCATED);
            }
            // Two closing fences back to back: the first was an empty code
            // block's body, rendered as a synthetic blank code line.
            (true, true) => {
                self.act(Action::BufferBlockContent { segment: &older });
                let synthetic = format!("\n{older}");
                self.emit(&synthetic, EmitOptions::TRUNCATED);
                self.leave_code_block();
            }
            // The fence has closed and ordinary text follows: leave the
            // block and reclassify the newer segment from scratch.
            (true, false) => {
                self.leave_code_block();
                debug!("code block closed");
                self.process_segment(&newer);
            }
        }
    }

    fn leave_code_block(&mut self) {
        self.act(Action::ResetBlockContentBuffer);
        self.act(Action::SetProcessingNewLine(true));
        self.act(Action::ResetCodeBlockSegments);
        self.block_state = BlockState::Routing;
    }

    fn process_inline_style(&mut self, segment: &str, group: StyleGroup) {
        if self.check(Evaluation::IsInlineStyleFull { group, segment }) {
            self.act(Action::ApplyInlineTextStyle {
                group,
                variant: StyleVariant::Full,
                segment,
            });
            self.emit_prefixed_content();
            self.emit_styled_content();
            self.emit_postfixed_content();
            self.act(Action::ResetInlineTextStyle);
            self.reset_on_trailing_newline(segment);
            self.inline_state = InlineStyleState::Routing;
            return;
        }

        if self.check(Evaluation::IsInlineStylePartialStart { group, segment }) {
            self.act(Action::ApplyInlineTextStyle {
                group,
                variant: StyleVariant::PartialStart,
                segment,
            });
            self.emit_prefixed_content();
            self.emit_styled_content();
            // The style stays open into the next segment, unless the line
            // ended here.
            self.reset_on_trailing_newline(segment);
            return;
        }

        if self.check(Evaluation::IsInlineStylePartialEnd { group, segment }) {
            self.act(Action::ApplyInlineTextStyle {
                group,
                variant: StyleVariant::PartialEnd,
                segment,
            });
            self.emit_styled_content();
            self.emit_postfixed_content();
            self.act(Action::ResetInlineTextStyle);
            self.inline_state = InlineStyleState::Routing;
        } else {
            // No marker in the segment: plain text inside an open style,
            // emitted with the active tags.
            self.act(Action::BufferBlockContent { segment });
            self.emit(segment, EmitOptions::TRUNCATED);
        }

        self.reset_on_trailing_newline(segment);
    }

    fn emit_prefixed_content(&mut self) {
        if self.check(Evaluation::HasPrefixedContent) {
            let prefixed = self.context.prefixed_content.clone();
            self.act(Action::BufferBlockContent { segment: &prefixed });
            self.emit(&prefixed, EmitOptions::VERBATIM_UNSTYLED);
            self.act(Action::ResetPrefixedContent);
        }
    }

    fn emit_styled_content(&mut self) {
        let styled = self.context.parsed_segment.clone();
        self.act(Action::BufferBlockContent { segment: &styled });
        self.emit(&styled, EmitOptions::TRUNCATED);
    }

    fn emit_postfixed_content(&mut self) {
        if self.check(Evaluation::HasPostfixedContent) {
            let postfixed = self.context.postfixed_content.clone();
            self.act(Action::BufferBlockContent { segment: &postfixed });
            self.emit(&postfixed, EmitOptions::TRUNCATED_UNSTYLED);
            self.act(Action::ResetPostfixedContent);
        }
    }

    /// A block-terminating newline abandons everything in flight, open
    /// inline styles included.
    fn reset_on_trailing_newline(&mut self, segment: &str) {
        if self.check(Evaluation::EndsWithNewLine { segment }) {
            debug!("line ended, parser reset");
            self.reset();
        }
    }
}
