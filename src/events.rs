//! Terminal input delivered to the controller queue.

use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

use crate::app::AppEvent;

/// How often the reader checks whether the UI loop is gone
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Read crossterm events on a dedicated thread until `tx` is closed.
///
/// A read failure is forwarded as [`AppEvent::TerminalError`] and ends the thread.
pub fn spawn_terminal_events(tx: mpsc::Sender<AppEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            match read_event() {
                Ok(Some(event)) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    let _ = tx.blocking_send(AppEvent::TerminalError(e.to_string()));
                    break;
                }
            }
        }
    })
}

fn read_event() -> io::Result<Option<AppEvent>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

/// Map a crossterm event to a controller event; key releases and mouse input are dropped
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Only handle key press events (not release)
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(width, height) => Some(AppEvent::Resize { width, height }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn key_presses_and_resizes_are_forwarded() {
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(translate(Event::Key(press)), Some(AppEvent::Key(k)) if k.code == KeyCode::Char('q')));
        assert!(matches!(
            translate(Event::Resize(80, 24)),
            Some(AppEvent::Resize { width: 80, height: 24 })
        ));
    }

    #[test]
    fn key_releases_and_focus_changes_are_dropped() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(translate(Event::Key(release)).is_none());
        assert!(translate(Event::FocusGained).is_none());
    }
}
