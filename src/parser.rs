//! Turns raw input lines into [`Entry`] values.
//!
//! A line is stripped of ANSI escape codes, split on a leading
//! `container-name  | ` tag as printed by `docker compose`, and checked for a
//! JSON object payload.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::error::IngestError;

/// Container name used for lines without a recognizable tag
pub const DEFAULT_CONTAINER: &str = "default";

/// Matches lines like `web-1  | content`
static CONTAINER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_-]+(?:-[0-9]+)?)\s+\|\s+(.*)$").expect("container tag pattern")
});

/// Matches CSI escape sequences such as `\x1b[1;32m`
static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ansi pattern"));

/// A decoded JSON value.
///
/// Object keys are kept in a `BTreeMap` so iteration is always in sorted order.
#[derive(Clone, Debug, PartialEq)]
pub enum StructuredValue {
    Object(BTreeMap<String, StructuredValue>),
    Sequence(Vec<StructuredValue>),
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl StructuredValue {
    /// True for everything except objects and sequences
    pub fn is_primitive(&self) -> bool {
        !matches!(self, StructuredValue::Object(_) | StructuredValue::Sequence(_))
    }
}

impl From<serde_json::Value> for StructuredValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => StructuredValue::Null,
            serde_json::Value::Bool(b) => StructuredValue::Bool(b),
            // Without arbitrary_precision every JSON number has an f64 view
            serde_json::Value::Number(n) => StructuredValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => StructuredValue::String(s),
            serde_json::Value::Array(items) => {
                StructuredValue::Sequence(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => StructuredValue::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

/// One parsed input line
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// Source container, [`DEFAULT_CONTAINER`] when the line had no tag
    pub container: String,
    /// Line text with the tag prefix and ANSI codes removed
    pub content: String,
    /// Decoded payload when the content is a JSON object
    pub structured: Option<StructuredValue>,
}

impl Entry {
    pub fn is_structured(&self) -> bool {
        self.structured.is_some()
    }
}

/// Remove every ANSI CSI escape sequence from `line`
pub fn strip_ansi(line: &str) -> String {
    ANSI_ESCAPE.replace_all(line, "").into_owned()
}

/// Parse a single raw line into an [`Entry`]
pub fn parse_line(raw: &str) -> Entry {
    let line = strip_ansi(raw);

    let (container, content) = match CONTAINER_TAG.captures(&line) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (DEFAULT_CONTAINER.to_string(), line.clone()),
    };

    let structured = decode_object(&content);

    Entry {
        container,
        content,
        structured,
    }
}

/// Decode `content` if it holds a JSON object.
///
/// Top-level arrays are rejected even when they are valid JSON.
fn decode_object(content: &str) -> Option<StructuredValue> {
    let trimmed = content.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }

    serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(trimmed)
        .ok()
        .map(|map| StructuredValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect()))
}

/// Newline-delimited reader with an upper bound on line length.
///
/// Trailing `\r\n` / `\n` are removed and invalid UTF-8 is replaced lossily.
/// After an error or end of input every further call returns `Ok(None)`.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_line_bytes: usize,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            inner: BufReader::new(reader),
            max_line_bytes,
            buf: Vec::with_capacity(64 * 1024),
            finished: false,
        }
    }

    /// Read the next line, `Ok(None)` at end of input
    pub async fn next_line(&mut self) -> Result<Option<String>, IngestError> {
        if self.finished {
            return Ok(None);
        }

        self.buf.clear();
        // One extra byte leaves room for the newline of a maximum-length line
        let limit = self.max_line_bytes as u64 + 1;
        let read = match (&mut self.inner).take(limit).read_until(b'\n', &mut self.buf).await {
            Ok(read) => read,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };

        if read == 0 {
            self.finished = true;
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        } else if self.buf.len() > self.max_line_bytes {
            self.finished = true;
            return Err(IngestError::LineTooLong {
                limit: self.max_line_bytes,
            });
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
