use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{AppState, Focus};

/// Handle a key event and update app state accordingly
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+C quits from every mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return;
    }

    match state.focus {
        Focus::FilterEdit => handle_filter_mode(state, key),
        Focus::ContainerList | Focus::LogView => handle_normal_mode(state, key),
    }
}

fn handle_normal_mode(state: &mut AppState, key: KeyEvent) {
    let focus = state.focus;
    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
        }

        // Toggle focus between panels
        KeyCode::Tab => {
            state.focus = match focus {
                Focus::ContainerList => Focus::LogView,
                _ => Focus::ContainerList,
            };
        }

        // Enter the log view
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            if focus == Focus::ContainerList {
                state.focus = Focus::LogView;
            }
        }

        // Back to the container list
        KeyCode::Left | KeyCode::Char('h') => {
            if focus == Focus::LogView {
                state.focus = Focus::ContainerList;
            }
        }

        // Clear the filter first, then go back
        KeyCode::Esc => {
            if focus == Focus::LogView {
                if state.filter.is_empty() {
                    state.focus = Focus::ContainerList;
                } else {
                    state.clear_filter();
                }
            }
        }

        // Enter filter mode
        KeyCode::Char('/') => {
            if focus == Focus::LogView {
                state.focus = Focus::FilterEdit;
            }
        }

        // Navigation (context-dependent on focused panel)
        KeyCode::Up | KeyCode::Char('k') => match focus {
            Focus::ContainerList => {
                if state.selected_index > 0 {
                    state.select_container(state.selected_index - 1);
                }
            }
            _ => state.viewport.line_up(1),
        },
        KeyCode::Down | KeyCode::Char('j') => match focus {
            Focus::ContainerList => {
                if state.selected_index + 1 < state.container_count() {
                    state.select_container(state.selected_index + 1);
                }
            }
            _ => state.viewport.line_down(1),
        },

        KeyCode::PageUp => state.viewport.half_page_up(),
        KeyCode::PageDown => state.viewport.half_page_down(),

        KeyCode::Home | KeyCode::Char('g') => {
            if focus == Focus::LogView {
                state.viewport.goto_top();
            }
        }
        KeyCode::End | KeyCode::Char('G') => {
            if focus == Focus::LogView {
                state.viewport.goto_bottom();
            }
        }

        _ => {}
    }
}

fn handle_filter_mode(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.focus = Focus::LogView;
            state.clear_filter();
        }
        KeyCode::Enter => {
            state.focus = Focus::LogView;
        }
        KeyCode::Backspace => {
            if state.filter.pop() {
                state.recompute_view();
            }
        }
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            state.filter.push(c);
            state.recompute_view();
        }
        _ => {}
    }
}
