//! Moves parsed entries into the store and notifies the UI loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::LogEvent;
use crate::app::AppEvent;
use crate::store::Store;

/// Forwards a source stream into the [`Store`] and the controller queue
pub struct Ingestor {
    handle: JoinHandle<()>,
}

impl Ingestor {
    /// Spawn the forwarding task.
    ///
    /// Every entry is added to the store before its `NewEntry` notification is
    /// queued, and sending waits for queue capacity, so nothing is dropped.
    pub fn spawn(
        mut source_rx: mpsc::Receiver<LogEvent>,
        store: Arc<Store>,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            while let Some(event) = source_rx.recv().await {
                let app_event = match event {
                    LogEvent::Entry(entry) => {
                        let container = entry.container.clone();
                        store.add(entry);
                        AppEvent::NewEntry { container }
                    }
                    LogEvent::Error(msg) => AppEvent::InputError(msg),
                    LogEvent::EndOfStream => AppEvent::InputClosed,
                };

                let closed = matches!(app_event, AppEvent::InputClosed);
                if events.send(app_event).await.is_err() {
                    break; // Receiver dropped
                }
                if closed {
                    break;
                }
            }
            tracing::debug!(total = store.total_entries(), "ingest finished");
        });

        Self { handle }
    }

    /// Wait for the forwarding task to end
    pub async fn join(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Ingestor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
