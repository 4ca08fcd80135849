//! Event channel implementation using crossbeam-channel.
//!
//! The worker thread owns an [`EventSender`] and appends to it; a renderer
//! on the control thread takes whole batches out of the [`EventReceiver`].
//! Every event is a single message, so a log line is never split between
//! two batches.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::Path;

use super::{Event, LogLine};

/// Worker side of the channel. Cheap to clone.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Queue an event; dropped silently once the receiver is gone
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    /// Append a plain log line
    pub fn line(&self, text: impl Into<String>) {
        self.send(Event::Line(LogLine::new(text)));
    }

    /// Append a log line that refers to a specific file
    pub fn line_with_path(&self, text: impl Into<String>, path: &Path) {
        self.send(Event::Line(LogLine::with_path(text, path)));
    }
}

/// Renderer side of the channel
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Take everything queued so far as one batch.
    ///
    /// Renderers call this on a timer and draw the whole batch at once.
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }
}

/// Constructors for a sender/receiver pair
pub struct EventChannel;

impl EventChannel {
    /// Unbounded, so the worker never waits on the renderer
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone, for headless runs and tests
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

/// Collect just the text of every log line in a batch
pub fn line_texts(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Line(line) => Some(line.text.clone()),
            _ => None,
        })
        .collect()
}
