//! Log source abstraction and the ingest pipeline.
//!
//! A [`LogSource`] turns an input stream into parsed [`LogEvent`]s on a
//! bounded channel; the [`ingest::Ingestor`] moves them into the store and
//! notifies the UI.

pub mod ingest;
pub mod reader;

use tokio::sync::mpsc;

use crate::parser::Entry;

/// Events emitted by log sources
#[derive(Debug)]
pub enum LogEvent {
    Entry(Entry),
    /// Reading stopped early; followed by `EndOfStream`
    Error(String),
    /// Sent exactly once, last
    EndOfStream,
}

/// Trait for log sources
#[async_trait::async_trait]
pub trait LogSource: Send + Sync {
    /// Start streaming log events
    async fn stream(&self) -> mpsc::Receiver<LogEvent>;

    /// Get the display name for this source
    fn name(&self) -> String;
}
