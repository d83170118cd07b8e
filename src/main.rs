use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use pretty_output::app::{AppEvent, AppState};
use pretty_output::config::Config;
use pretty_output::events::spawn_terminal_events;
use pretty_output::sources::{LogSource, ingest::Ingestor, reader::ReaderSource};
use pretty_output::store::Store;
use pretty_output::{logging, ui};

const USAGE: &str = "Usage: docker compose up | pretty-output
       docker logs -f container | pretty-output";

/// Options given on the command line
#[derive(Default)]
struct Args {
    theme: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}\n\nOptions:\n  --theme <name>  default, dracula, monochrome");
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("pretty-output {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--theme" => match iter.next() {
                Some(name) => args.theme = Some(name),
                None => usage_error("--theme needs a value"),
            },
            other => usage_error(&format!("unknown argument: {other}")),
        }
    }
    args
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}");
    eprintln!("{USAGE}");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    let args = parse_args();

    // Input must be piped in
    if io::stdin().is_terminal() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    match logging::init(&config) {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "logging enabled"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {e:#}"),
    }

    let result = run(&config).await;

    if config.signal_group_on_exit {
        interrupt_process_group();
    }

    // The stdin reader may still be blocked in a read that cannot be
    // cancelled, so leave without waiting for the runtime to shut down.
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run(config: &Config) -> Result<()> {
    let store = Arc::new(Store::new());
    let (events_tx, mut events_rx) = mpsc::channel(config.channel_capacity);

    // Start the log source stream
    let source = ReaderSource::stdin(config);
    tracing::info!(source = %source.name(), "starting");
    let log_rx = source.stream().await;
    let _ingestor = Ingestor::spawn(log_rx, Arc::clone(&store), events_tx.clone());

    let mut state = AppState::new(Arc::clone(&store), config);

    // Setup terminal; the guard restores it on every return path below
    enable_raw_mode().context("failed to enable raw mode")?;
    let _restore = OnDrop(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        restore_terminal();
        original_hook(panic);
    }));

    let size = terminal.size()?;
    state.handle_event(AppEvent::Resize {
        width: size.width,
        height: size.height,
    });
    spawn_terminal_events(events_tx);

    // Main event loop
    let result = run_event_loop(&mut terminal, &mut state, &mut events_rx).await;

    tracing::info!(entries = store.total_entries(), "exiting");
    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    events_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, state))?;

        let Some(event) = events_rx.recv().await else {
            return Ok(());
        };
        apply(state, event)?;

        // Apply whatever else is already queued before drawing again
        while !state.should_quit {
            match events_rx.try_recv() {
                Ok(event) => apply(state, event)?,
                Err(_) => break,
            }
        }

        // Check if we should quit
        if state.should_quit {
            return Ok(());
        }
    }
}

/// Runs its closure when dropped
struct OnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

fn apply(state: &mut AppState, event: AppEvent) -> Result<()> {
    if let AppEvent::TerminalError(msg) = &event {
        anyhow::bail!("terminal input failed: {msg}");
    }
    state.handle_event(event);
    Ok(())
}

/// Send SIGINT to our process group so an upstream `docker compose` stops too
#[cfg(unix)]
fn interrupt_process_group() {
    // Ignore the signal ourselves so the exit status stays ours
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_IGN);
        if libc::kill(0, libc::SIGINT) != 0 {
            tracing::warn!(error = %io::Error::last_os_error(), "failed to interrupt process group");
        }
    }
}

#[cfg(not(unix))]
fn interrupt_process_group() {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fails_after_setup(restored: &Cell<bool>) -> Result<()> {
        let _restore = OnDrop(|| restored.set(true));
        anyhow::bail!("terminal size unavailable")
    }

    #[test]
    fn early_setup_error_still_restores() {
        let restored = Cell::new(false);
        assert!(fails_after_setup(&restored).is_err());
        assert!(restored.get());
    }

    #[test]
    fn terminal_error_event_stops_the_loop() {
        let mut state = AppState::new(Arc::new(Store::new()), &Config::default());
        let err = apply(&mut state, AppEvent::TerminalError("closed".into())).unwrap_err();
        assert!(err.to_string().contains("closed"));
        assert!(apply(&mut state, AppEvent::InputClosed).is_ok());
        assert!(state.input_closed);
    }
}
