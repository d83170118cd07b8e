//! Terminal viewer for interleaved container logs.
//!
//! Lines piped on stdin (typically from `docker compose up`) are split by their
//! `name | ` prefix, JSON payloads are decoded and pretty-printed, and the
//! result is browsed in a two-pane ratatui interface.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod formatter;
pub mod input;
pub mod logging;
pub mod parser;
pub mod sources;
pub mod store;
pub mod theme;
pub mod ui;
pub mod viewport;
