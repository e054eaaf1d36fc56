//! Headless mode runner - main event loop
//!
//! Reads line commands from stdin, feeds them to the engine as messages and
//! writes every broadcast engine event to stdout.
//!
//! Commands:
//! - `add <text>` - score and place a leaf (`add positive:0.8 lovely day`)
//! - `sort` - re-sort every leaf, alternating ascending and descending
//! - `swap` - toggle labels between text and confidence
//! - `delete <id>` - remove a leaf
//! - `quit` - exit once the open campaign (if any) has finished

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, trace, warn};

use stree_app::{config, AppState, Engine, EngineEvent, Message, TaggedScorer};
use stree_core::prelude::*;
use stree_core::EntryId;

use super::HeadlessEvent;

/// Run in headless mode - output JSON events for a project directory
pub async fn run_headless(project_path: &Path) -> Result<()> {
    stree_core::logging::init()?;

    info!("═══════════════════════════════════════════════════════");
    info!("Sentiment tree starting in HEADLESS mode");
    info!("Project: {}", project_path.display());
    info!("═══════════════════════════════════════════════════════");

    let settings = config::load_settings(project_path);
    let mut engine = match Engine::new(settings, Arc::new(TaggedScorer)) {
        Ok(engine) => engine,
        Err(e) => {
            HeadlessEvent::error(e.to_string(), e.is_fatal()).emit();
            return Err(e);
        }
    };
    let mut events = engine.subscribe();

    // Spawn headless-specific stdin reader
    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    engine.start();
    emit_engine_events(&mut events, &engine.state);

    let result = headless_event_loop(&mut engine, &mut events).await;

    engine.shutdown().await;
    emit_engine_events(&mut events, &engine.state);

    info!("Sentiment tree headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop(
    engine: &mut Engine,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                // Handle any burst that queued up meanwhile before writing out
                let drained = engine.drain_pending_messages();
                if drained > 0 {
                    trace!("Processed {} queued messages", drained);
                }
                emit_engine_events(events, &engine.state);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Write every event broadcast since the last call
fn emit_engine_events(events: &mut broadcast::Receiver<EngineEvent>, state: &AppState) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                debug!("Engine event: {}", event.event_type());
                HeadlessEvent::from_engine(&event, state).emit();
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged; {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Parse one stdin line into a message.
///
/// Returns `Ok(None)` for blank lines and `Err` with a description for
/// anything unrecognised.
pub fn parse_command(line: &str) -> std::result::Result<Option<Message>, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let message = match (command, rest) {
        ("", _) => return Ok(None),
        ("add", "") => return Err("usage: add <polarity>:<confidence> <text>".to_string()),
        ("add", text) => Message::SubmitText {
            text: text.to_string(),
        },
        ("sort", "") => Message::Sort,
        ("swap", "") => Message::ToggleLabels,
        ("delete", id) => {
            let id = id
                .parse::<u64>()
                .map_err(|_| format!("usage: delete <id> (got '{}')", id))?;
            Message::DeleteLeaf { entry: EntryId(id) }
        }
        ("q" | "quit", "") => Message::Quit,
        _ => return Err(format!("unknown command: {}", line)),
    };
    Ok(Some(message))
}

/// Spawn stdin reader task that sends commands to message channel (blocking version)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(msg)) => {
                let quit = matches!(msg, Message::Quit);
                if msg_tx.blocking_send(msg).is_err() || quit {
                    info!("Stdin reader exiting");
                    return;
                }
            }
            Ok(None) => {}
            Err(reason) => {
                warn!("Rejected stdin command: {}", reason);
                HeadlessEvent::error(reason, false).emit();
            }
        }
    }

    // EOF behaves like `quit`
    info!("Stdin closed; requesting quit");
    let _ = msg_tx.blocking_send(Message::Quit);
}
