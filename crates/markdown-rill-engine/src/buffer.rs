//! Chunk accumulation and segmentation.
//!
//! Token streams arrive split at arbitrary byte positions. [`SegmentBuffer`]
//! reassembles them into segments (a word plus its trailing whitespace or
//! newline run) and emits each one as soon as it completes, so the parser
//! downstream never sees a split marker pair it cannot classify.

use std::mem;

use tracing::{debug, trace};

use crate::parsing::patterns::library;
use crate::subscription::{Listeners, SubscriptionId};

/// Forced-slice policy for whitespace-free runs. Counts are Unicode scalar
/// values, not bytes.
const OVERFLOW_THRESHOLD: usize = 100;
const OVERFLOW_SLICE_LEN: usize = 50;

/// Accumulates stream chunks and emits completed segments in order.
///
/// A segment completes when its trailing delimiter (whitespace or newline
/// run) has fully arrived, or when the whitespace-free overflow policy
/// forces a fixed-size slice out. [`flush`](Self::flush) emits whatever
/// remains at stream end, verbatim.
#[derive(Debug, Default)]
pub struct SegmentBuffer {
    accumulator: String,
    listeners: Listeners<str>,
}

impl SegmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for completed segments.
    pub fn subscribe(&mut self, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }

    /// Appends a chunk and emits every segment it completes.
    pub fn receive_chunk(&mut self, chunk: &str) {
        trace!(len = chunk.len(), "chunk received");
        self.accumulator.push_str(chunk);
        self.drain_complete_segments();
        self.relieve_overflow();
    }

    /// Emits any unterminated remainder verbatim, then clears. Called once,
    /// at stream end.
    pub fn flush(&mut self) {
        let remainder = mem::take(&mut self.accumulator);
        if !remainder.is_empty() {
            debug!(len = remainder.len(), "flushing unterminated remainder");
            self.listeners.notify(&remainder);
        }
    }

    /// Discards pending input without emitting it.
    pub fn clear(&mut self) {
        self.accumulator.clear();
    }

    /// The not-yet-emitted tail of the stream.
    pub fn pending(&self) -> &str {
        &self.accumulator
    }

    fn drain_complete_segments(&mut self) {
        let Self {
            accumulator,
            listeners,
        } = self;

        let mut consumed = 0;
        for found in library().segment.find_iter(accumulator) {
            listeners.notify(found.as_str());
            consumed = found.end();
        }
        if consumed > 0 {
            accumulator.drain(..consumed);
        }
    }

    /// Whitespace-free runs (base64 blobs, minified payloads) never complete
    /// a segment on their own and would otherwise accumulate forever. Past
    /// the threshold, fixed-size slices are forced out; slices cut on char
    /// boundaries, never inside a code point.
    fn relieve_overflow(&mut self) {
        if self.accumulator.contains(char::is_whitespace) {
            return;
        }
        while self.accumulator.chars().count() > OVERFLOW_THRESHOLD {
            let cut = self
                .accumulator
                .char_indices()
                .nth(OVERFLOW_SLICE_LEN)
                .map(|(index, _)| index)
                .unwrap_or(self.accumulator.len());
            let slice: String = self.accumulator.drain(..cut).collect();
            debug!(len = slice.len(), "forced overflow slice");
            self.listeners.notify(&slice);
        }
    }
}
