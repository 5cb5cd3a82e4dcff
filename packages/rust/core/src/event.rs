//! Pipeline lifecycle events.
//!
//! The pipeline reports subtask activity as a stream of tagged messages
//! over an unbounded channel. Sending is fire-and-forget: a dropped
//! receiver (one-shot actions attach no bridge) silently discards events.

use tokio::sync::mpsc;

/// What happened to a subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Subtask started.
    Start,
    /// Subtask finished without error.
    Stop,
    /// Subtask failed.
    Error,
}

/// A single lifecycle notification emitted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEvent {
    pub kind: EventKind,
    /// Name of the subtask the event is about.
    pub subtask: String,
    /// Error detail; present for [`EventKind::Error`] events.
    pub detail: Option<String>,
}

/// Sending half of the event stream, handed to the pipeline.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl EventSink {
    /// Create a connected sink/receiver pair.
    pub fn channel() -> (EventSink, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSink { tx: Some(tx) }, rx)
    }

    /// A sink that discards everything, for headless/test usage.
    pub fn null() -> EventSink {
        EventSink { tx: None }
    }

    /// Emit a start-of-subtask event.
    pub fn start(&self, subtask: &str) {
        self.send(EventKind::Start, subtask, None);
    }

    /// Emit an end-of-subtask event.
    pub fn stop(&self, subtask: &str) {
        self.send(EventKind::Stop, subtask, None);
    }

    /// Emit an error-in-subtask event with its detail.
    pub fn error(&self, subtask: &str, detail: impl Into<String>) {
        self.send(EventKind::Error, subtask, Some(detail.into()));
    }

    fn send(&self, kind: EventKind, subtask: &str, detail: Option<String>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(PipelineEvent {
                kind,
                subtask: subtask.to_string(),
                detail,
            });
        }
    }
}
