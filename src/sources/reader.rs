use std::sync::Mutex;

use tokio::io::AsyncRead;
use tokio::sync::mpsc;

use super::{LogEvent, LogSource};
use crate::config::Config;
use crate::parser::{LineReader, parse_line};

/// A log source that parses lines from an async reader, usually stdin
pub struct ReaderSource<R> {
    name: String,
    /// Taken by the first call to `stream`
    reader: Mutex<Option<R>>,
    max_line_bytes: usize,
    channel_capacity: usize,
}

impl<R> ReaderSource<R> {
    pub fn new(name: impl Into<String>, reader: R, config: &Config) -> Self {
        Self {
            name: name.into(),
            reader: Mutex::new(Some(reader)),
            max_line_bytes: config.max_line_bytes,
            channel_capacity: config.channel_capacity,
        }
    }
}

impl ReaderSource<tokio::io::Stdin> {
    pub fn stdin(config: &Config) -> Self {
        Self::new("stdin", tokio::io::stdin(), config)
    }
}

#[async_trait::async_trait]
impl<R> LogSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn stream(&self) -> mpsc::Receiver<LogEvent> {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let reader = self
            .reader
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        let max_line_bytes = self.max_line_bytes;
        let name = self.name.clone();

        tokio::spawn(async move {
            let Some(reader) = reader else {
                let _ = tx.send(LogEvent::Error(format!("{name} is already being read"))).await;
                let _ = tx.send(LogEvent::EndOfStream).await;
                return;
            };

            let mut lines = LineReader::new(reader, max_line_bytes);
            let mut count: u64 = 0;
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        count += 1;
                        // Blocks while the channel is full
                        if tx.send(LogEvent::Entry(parse_line(&line))).await.is_err() {
                            tracing::debug!(source = %name, "receiver dropped, stopping");
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(source = %name, error = %e, lines = count, "input stopped");
                        let _ = tx.send(LogEvent::Error(e.to_string())).await;
                        break;
                    }
                }
            }

            tracing::info!(source = %name, lines = count, "end of input");
            let _ = tx.send(LogEvent::EndOfStream).await;
        });

        rx
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
