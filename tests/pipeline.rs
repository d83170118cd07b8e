use std::sync::Arc;

use tokio::sync::mpsc;

use pretty_output::app::{AppEvent, AppState, Focus};
use pretty_output::config::Config;
use pretty_output::sources::{LogSource, ingest::Ingestor, reader::ReaderSource};
use pretty_output::store::Store;

const COMPOSE_OUTPUT: &str = "\
\x1b[32mweb-1  |\x1b[0m GET / 200
db-1   | {\"level\":\"info\",\"msg\":\"ready\",\"conns\":[1,2]}
web-1  | GET /health 200
startup banner without tag
db-1   | [1,2,3]
";

/// Run the whole input through source, ingestor and controller
async fn ingest_all(input: &'static str, config: &Config) -> (Arc<Store>, AppState) {
    let store = Arc::new(Store::new());
    let (events_tx, mut events_rx) = mpsc::channel(config.channel_capacity);

    let source = ReaderSource::new("test", input.as_bytes(), config);
    let ingestor = Ingestor::spawn(source.stream().await, Arc::clone(&store), events_tx);

    let mut state = AppState::new(Arc::clone(&store), config);
    state.handle_event(AppEvent::Resize { width: 120, height: 40 });

    while let Some(event) = events_rx.recv().await {
        let closed = matches!(event, AppEvent::InputClosed);
        state.handle_event(event);
        if closed {
            break;
        }
    }
    ingestor.join().await;
    (store, state)
}

#[tokio::test]
async fn compose_output_is_grouped_by_container() {
    let (store, state) = ingest_all(COMPOSE_OUTPUT, &Config::default()).await;

    assert_eq!(store.containers(), vec!["db-1", "default", "web-1"]);
    assert_eq!(store.entry_count("web-1"), 2);
    assert_eq!(store.entry_count("db-1"), 2);
    assert_eq!(store.total_entries(), 5);

    let db = store.entries("db-1");
    assert!(db[0].is_structured());
    assert!(!db[1].is_structured(), "top-level arrays stay plain text");

    // web-1 arrived first, so it was auto-selected and stays highlighted
    assert_eq!(state.selected_container.as_deref(), Some("web-1"));
    assert_eq!(state.selected_index, 2);
    assert_eq!(state.focus, Focus::ContainerList);
    assert!(state.input_closed);
    assert!(!state.should_quit);
}

#[tokio::test]
async fn backpressure_keeps_every_line() {
    let config = Config {
        channel_capacity: 1,
        exit_on_eof: true,
        ..Config::default()
    };
    let input: String = (0..1000).map(|i| format!("svc-{} | line {i}\n", i % 3)).collect();
    let input: &'static str = Box::leak(input.into_boxed_str());

    let (store, state) = ingest_all(input, &config).await;

    assert_eq!(store.total_entries(), 1000);
    assert_eq!(store.entry_count("svc-0"), 334);
    let contents: Vec<String> = store.entries("svc-1").iter().map(|e| e.content.clone()).collect();
    assert_eq!(contents.first().map(String::as_str), Some("line 1"));
    assert_eq!(contents.last().map(String::as_str), Some("line 997"));
    assert!(state.should_quit);
}
