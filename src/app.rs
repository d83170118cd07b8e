use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use crate::config::Config;
use crate::filter::ActiveFilter;
use crate::formatter::format_entry;
use crate::input;
use crate::parser::Entry;
use crate::store::Store;
use crate::theme::Theme;
use crate::viewport::Viewport;

/// Width taken by the borders and padding of both panels
const PANEL_CHROME_WIDTH: u16 = 8;
/// Rows taken by the help bar, panel borders and the log title
const PANEL_CHROME_HEIGHT: u16 = 4;

/// Which panel or mode receives key input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    ContainerList,
    LogView,
    FilterEdit,
}

/// Everything the controller reacts to, delivered one at a time
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// An entry for `container` has been added to the store
    NewEntry { container: String },
    InputError(String),
    InputClosed,
    /// The terminal event source failed
    TerminalError(String),
}

/// Formatted entries of the selected container.
///
/// Entries never change once stored, so only newly arrived ones are formatted.
#[derive(Default)]
struct RenderCache {
    container: String,
    rendered: Vec<(Arc<Entry>, Text<'static>)>,
}

/// Main application state, owned by the UI loop
pub struct AppState {
    store: Arc<Store>,
    pub theme: Theme,
    /// Current focus
    pub focus: Focus,
    /// Highlighted row in the container list
    pub selected_index: usize,
    /// Container shown in the log view, `None` until the first entry arrives
    pub selected_container: Option<String>,
    /// Substring filter for the log view
    pub filter: ActiveFilter,
    /// Scroll state of the log view
    pub viewport: Viewport,
    /// Terminal size from the last resize
    pub width: u16,
    pub height: u16,
    /// Whether a size is known yet
    pub ready: bool,
    pub side_panel_width: u16,
    /// Whether the input stream has ended
    pub input_closed: bool,
    pub exit_on_eof: bool,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    cache: RenderCache,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config) -> Self {
        Self {
            store,
            theme: Theme::by_name(&config.theme),
            focus: Focus::ContainerList,
            selected_index: 0,
            selected_container: None,
            filter: ActiveFilter::default(),
            viewport: Viewport::default(),
            width: 0,
            height: 0,
            ready: false,
            side_panel_width: config.side_panel_width,
            input_closed: false,
            exit_on_eof: config.exit_on_eof,
            status_message: None,
            should_quit: false,
            cache: RenderCache::default(),
        }
    }

    /// Apply one event. Terminal errors are left to the caller.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => input::handle_key(self, key),
            AppEvent::Resize { width, height } => self.resize(width, height),
            AppEvent::NewEntry { container } => self.on_new_entry(&container),
            AppEvent::InputError(msg) => {
                self.status_message = Some(format!("Error: {msg}"));
            }
            AppEvent::InputClosed => {
                self.input_closed = true;
                if self.exit_on_eof {
                    self.should_quit = true;
                }
            }
            AppEvent::TerminalError(msg) => {
                tracing::error!(%msg, "terminal event source failed");
            }
        }

        // The filter line takes a row from the viewport while it is shown
        if self.ready {
            self.sync_viewport_size();
        }
    }

    /// Sorted `(name, count)` pairs for the container list
    pub fn container_counts(&self) -> Vec<(String, usize)> {
        self.store.container_counts()
    }

    pub fn container_count(&self) -> usize {
        self.store.containers().len()
    }

    /// Whether the filter indicator line is shown above the logs
    pub fn filter_line_visible(&self) -> bool {
        self.focus == Focus::FilterEdit || !self.filter.is_empty()
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.ready = true;
        self.sync_viewport_size();
        self.recompute_view();
    }

    fn sync_viewport_size(&mut self) {
        let width = self
            .width
            .saturating_sub(self.side_panel_width)
            .saturating_sub(PANEL_CHROME_WIDTH);
        let mut height = self.height.saturating_sub(PANEL_CHROME_HEIGHT);
        if self.filter_line_visible() {
            height = height.saturating_sub(1);
        }
        self.viewport.set_size(width as usize, height as usize);
    }

    fn on_new_entry(&mut self, container: &str) {
        // The first container to deliver an entry is selected, whatever
        // else the ingest task has stored in the meantime
        if self.selected_container.is_none() {
            self.selected_container = Some(container.to_string());
        }

        // Keep the highlighted row on the displayed container when a new
        // name sorts before it
        if let Some(selected) = &self.selected_container {
            if let Some(pos) = self.store.containers().iter().position(|c| c == selected) {
                self.selected_index = pos;
            }
        }

        if self.selected_container.as_deref() == Some(container) {
            self.recompute_view();
            self.viewport.goto_bottom();
        }
    }

    /// Switch to the container at `index`; out-of-range indices are ignored
    pub fn select_container(&mut self, index: usize) -> bool {
        let Some(name) = self.store.containers().into_iter().nth(index) else {
            return false;
        };

        self.selected_index = index;
        self.selected_container = Some(name);
        self.filter.clear();
        self.recompute_view();
        self.viewport.goto_bottom();
        true
    }

    /// Clear the filter and refresh the log view
    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.recompute_view();
    }

    /// Rebuild the viewport content for the selected container and filter
    pub fn recompute_view(&mut self) {
        let Some(container) = &self.selected_container else {
            self.viewport.set_content(vec![Line::from("No container selected")]);
            return;
        };

        if self.cache.container != *container {
            self.cache = RenderCache {
                container: container.clone(),
                rendered: Vec::new(),
            };
        }

        let fresh = self.store.entries_from(container, self.cache.rendered.len());
        for entry in fresh {
            let text = format_entry(&entry, &self.theme);
            self.cache.rendered.push((entry, text));
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        for (entry, text) in &self.cache.rendered {
            if self.filter.matches(&entry.content) {
                lines.extend(text.lines.iter().cloned());
            }
        }

        if lines.is_empty() && !self.filter.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("No matches for: {}", self.filter.pattern),
                Style::default().fg(self.theme.help),
            )));
        }

        self.viewport.set_content(lines);
    }

    /// Context-sensitive key help for the bottom bar
    pub fn help_text(&self) -> &'static str {
        match self.focus {
            Focus::ContainerList => "↑/↓: select • enter/→: view logs • tab: switch • q: quit",
            Focus::LogView => "↑/↓: scroll • /: filter • ←/esc: back • g/G: top/bottom • q: quit",
            Focus::FilterEdit => "type to filter • enter: confirm • esc: clear & back",
        }
    }

    /// Scroll position of the log view as a whole percentage
    pub fn scroll_percent(&self) -> u8 {
        (self.viewport.scroll_percent() * 100.0) as u8
    }
}
