//! Event bridge: console visibility for long-running actions.
//!
//! Attached only when the selected action is logging-worthy (`watch`).
//! Mirrors every pipeline lifecycle event as a log line naming the
//! subtask; an error event additionally requests process exit with code 1.
//! One-shot actions attach no bridge and rely on the spinner's single
//! terminal message.

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{error, info};

use docsmith_core::{EventKind, PipelineEvent};

use crate::supervisor;

/// Consume the pipeline's event stream until it closes.
pub(crate) fn spawn(mut rx: UnboundedReceiver<PipelineEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            handle(&event);
        }
    })
}

fn handle(event: &PipelineEvent) {
    match event.kind {
        EventKind::Start => info!(subtask = %event.subtask, "subtask started"),
        EventKind::Stop => info!(subtask = %event.subtask, "subtask finished"),
        EventKind::Error => {
            error!(
                subtask = %event.subtask,
                detail = event.detail.as_deref().unwrap_or("unknown"),
                "subtask failed"
            );
            supervisor::request_exit(supervisor::FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmith_core::EventSink;
    use serial_test::serial;

    #[tokio::test]
    async fn bridge_drains_stream_and_completes() {
        let (sink, rx) = EventSink::channel();
        let handle = spawn(rx);

        sink.start("assets");
        sink.stop("assets");
        drop(sink);

        handle.await.expect("bridge task");
    }

    #[tokio::test]
    #[serial(pending_exit)]
    async fn error_event_requests_exit() {
        supervisor::reset_pending_exit();

        let (sink, rx) = EventSink::channel();
        let handle = spawn(rx);

        sink.error("rebuild", "bad json");
        drop(sink);
        handle.await.expect("bridge task");

        assert_eq!(supervisor::pending_exit(), supervisor::FAILURE);
        supervisor::reset_pending_exit();
    }
}
