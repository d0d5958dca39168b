//! Per-stream parsing session: one buffer feeding one state machine.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use crate::buffer::SegmentBuffer;
use crate::error::{Result, StreamError};
use crate::parsing::{ParsedSegment, ParserStateMachine};
use crate::subscription::SubscriptionId;

/// Wires a [`SegmentBuffer`] to a [`ParserStateMachine`] behind a
/// start/feed/stop lifecycle.
///
/// Everything is synchronous: [`feed`](Self::feed) runs segmentation and
/// parsing to completion before returning, delivering [`ParsedSegment`]
/// events to subscribers on the caller's stack. One session owns one
/// stream; callers multiplexing several streams keep one session per
/// stream id.
#[derive(Debug)]
pub struct StreamSession {
    buffer: SegmentBuffer,
    machine: ParserStateMachine,
    /// Segments completed by the buffer, awaiting the machine. The buffer
    /// listener fills it; `pump` drains it in arrival order.
    queue: Rc<RefCell<VecDeque<String>>>,
    started: bool,
}

impl StreamSession {
    pub fn new() -> Self {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        let mut buffer = SegmentBuffer::new();
        let pending = Rc::clone(&queue);
        buffer.subscribe(move |segment: &str| {
            pending.borrow_mut().push_back(segment.to_string());
        });

        Self {
            buffer,
            machine: ParserStateMachine::new(),
            queue,
            started: false,
        }
    }

    /// Registers a listener for parsed segments. Subscriptions survive
    /// stop/start cycles.
    pub fn subscribe(&mut self, listener: impl FnMut(&ParsedSegment) + 'static) -> SubscriptionId {
        self.machine.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.machine.unsubscribe(id);
    }

    pub fn is_active(&self) -> bool {
        self.started
    }

    /// Begins accepting input from a fresh parse state. A no-op while the
    /// session is already active, so pending input is never clobbered
    /// mid-stream.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        debug!("stream session started");
        self.machine.reset();
        self.buffer.clear();
        self.queue.borrow_mut().clear();
        self.started = true;
    }

    /// Submits one stream chunk. All segments it completes are parsed and
    /// emitted before this returns.
    pub fn feed(&mut self, chunk: &str) -> Result<()> {
        if !self.started {
            return Err(StreamError::NotStarted);
        }
        self.buffer.receive_chunk(chunk);
        self.pump();
        Ok(())
    }

    /// Ends the stream: flushes the unterminated tail through the parser,
    /// then resets. A no-op when the session is not active.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.buffer.flush();
        self.pump();
        self.machine.reset();
        self.started = false;
        debug!("stream session stopped");
    }

    fn pump(&mut self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(segment) => self.machine.process_segment(&segment),
                None => break,
            }
        }
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}
