use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Padding, Paragraph},
};

use crate::app::{AppState, Focus};

/// Borders plus one column of padding on each side
const PANEL_CHROME: u16 = 4;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    if !state.ready {
        frame.render_widget(Paragraph::new("Loading..."), area);
        return;
    }

    let [panels, help] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
    let [left, right] = Layout::horizontal([
        Constraint::Length(state.side_panel_width + PANEL_CHROME),
        Constraint::Min(PANEL_CHROME),
    ])
    .areas(panels);

    draw_container_list(frame, state, left);
    draw_log_panel(frame, state, right);
    draw_help_bar(frame, state, help);
}

fn panel_block(state: &AppState, focused: bool) -> Block<'static> {
    let border = if focused {
        state.theme.border_focused
    } else {
        state.theme.border_unfocused
    };
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .padding(Padding::horizontal(1))
}

/// Draw the container list with entry counts
fn draw_container_list(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = &state.theme;
    let block = panel_block(state, state.focus == Focus::ContainerList);

    let mut lines = vec![
        Line::from(Span::styled(
            "Containers",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    let counts = state.container_counts();
    if counts.is_empty() {
        lines.push(Line::from(Span::styled(
            "Waiting for input...",
            Style::default().fg(theme.help),
        )));
    }

    for (i, (name, count)) in counts.iter().enumerate() {
        let label = format!(" {name} ({count}) ");
        let style = if i == state.selected_index {
            Style::default()
                .bg(theme.selected_bg)
                .fg(theme.selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.container_fg)
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the title, filter line and visible part of the log viewport
fn draw_log_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = &state.theme;
    let focused = matches!(state.focus, Focus::LogView | Focus::FilterEdit);
    let block = panel_block(state, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let filter_rows = u16::from(state.filter_line_visible());
    let [title_area, filter_area, body_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(filter_rows),
        Constraint::Min(0),
    ])
    .areas(inner);

    let title = Line::from(vec![
        Span::styled(
            format!("Logs: {}", state.selected_container.as_deref().unwrap_or_default()),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}%", state.scroll_percent()),
            Style::default().fg(theme.help),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), title_area);

    if filter_rows > 0 {
        frame.render_widget(Paragraph::new(filter_line(state)), filter_area);
    }

    let body = Paragraph::new(state.viewport.visible_lines().to_vec());
    frame.render_widget(body, body_area);
}

fn filter_line(state: &AppState) -> Line<'static> {
    let theme = &state.theme;
    let prefix = Style::default().fg(theme.filter_prefix).add_modifier(Modifier::BOLD);
    if state.focus == Focus::FilterEdit {
        Line::from(vec![
            Span::styled("/", prefix),
            Span::styled(
                format!(" {}▏ ", state.filter.pattern),
                Style::default().bg(theme.filter_input_bg).fg(theme.filter_input_fg),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("filter: ", prefix),
            Span::styled(state.filter.pattern.clone(), Style::default().fg(theme.help)),
        ])
    }
}

/// Context-sensitive key help plus stream status
fn draw_help_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut text = state.help_text().to_string();
    if state.input_closed {
        text.push_str(" • input closed");
    }
    if let Some(msg) = &state.status_message {
        text.push_str(" • ");
        text.push_str(msg);
    }

    let help = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(state.theme.help),
    )));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::config::Config;
    use crate::parser::parse_line;
    use crate::store::Store;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn render(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state_with(lines: &[&str]) -> AppState {
        let store = Arc::new(Store::new());
        let mut state = AppState::new(Arc::clone(&store), &Config::default());
        state.handle_event(AppEvent::Resize { width: 80, height: 16 });
        for line in lines {
            let entry = parse_line(line);
            let container = entry.container.clone();
            store.add(entry);
            state.handle_event(AppEvent::NewEntry { container });
        }
        state
    }

    #[test]
    fn shows_loading_before_first_resize() {
        let state = AppState::new(Arc::new(Store::new()), &Config::default());
        assert!(render(&state, 40, 5).starts_with("Loading..."));
    }

    #[test]
    fn empty_store_shows_waiting_message() {
        let screen = render(&state_with(&[]), 80, 16);
        assert!(screen.contains("Waiting for input..."));
        assert!(screen.contains("No container selected"));
    }

    #[test]
    fn panels_show_counts_title_and_logs() {
        let state = state_with(&["api | booting", "api | ready", "db | started"]);
        let screen = render(&state, 80, 16);
        assert!(screen.contains("Containers"));
        assert!(screen.contains("api (2)"));
        assert!(screen.contains("db (1)"));
        assert!(screen.contains("Logs: api 100%"));
        assert!(screen.contains("booting"));
        assert!(screen.contains("ready"));
        assert!(!screen.contains("started"));
        assert!(screen.contains("enter/→: view logs"));
    }

    #[test]
    fn filter_line_and_help_follow_focus() {
        let mut state = state_with(&["api | booting"]);
        for code in [KeyCode::Enter, KeyCode::Char('/'), KeyCode::Char('b')] {
            state.handle_event(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
        }
        let screen = render(&state, 80, 16);
        assert!(screen.contains("/ b▏"));
        assert!(screen.contains("type to filter"));

        state.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        let screen = render(&state, 80, 16);
        assert!(screen.contains("filter: b"));
        assert!(screen.contains("/: filter"));
    }

    #[test]
    fn input_closed_is_shown_in_help_bar() {
        let mut state = state_with(&[]);
        state.handle_event(AppEvent::InputClosed);
        assert!(render(&state, 80, 16).contains("input closed"));
    }
}
