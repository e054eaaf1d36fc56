//! Scripted headless sessions
//!
//! Feeds stdin-style command lines through the engine on a paused clock,
//! using a config directory written to a temp dir.

use std::sync::Arc;

use sentiment_tree::parse_command;
use stree_app::{config, Engine, EngineEvent, TaggedScorer};
use stree_core::{EntryId, Polarity, SortDirection, TreePart};
use tempfile::tempdir;
use tokio::sync::broadcast;

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

/// A 3x3 grid with 6 leaf slots and fast timers
const SMALL_TREE: &str = r#"
[grid]
rows = 3
columns = 3
trunk_column = 1
canopy = []

[timing]
lead_ms = 10
trunk_step_ms = 20
sort_step_ms = 5
"#;

fn small_engine() -> Engine {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".stree")).unwrap();
    std::fs::write(dir.path().join(".stree/config.toml"), SMALL_TREE).unwrap();

    let settings = config::load_settings(dir.path());
    assert_eq!(settings.grid.rows, 3);
    Engine::new(settings, Arc::new(TaggedScorer)).unwrap()
}

/// Apply one command line, then run every campaign it opened to completion
async fn run_line(engine: &mut Engine, line: &str) {
    let msg = parse_command(line)
        .expect("valid command")
        .expect("non-blank command");
    engine.process_message(msg);

    while !engine.state.sequencer.is_idle() {
        let msg = engine.msg_rx.recv().await.expect("message channel open");
        engine.process_message(msg);
    }
}

fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ─────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_full_session() {
    let mut engine = small_engine();
    let mut rx = engine.subscribe();

    engine.start();
    while !engine.state.sequencer.is_idle() {
        let msg = engine.msg_rx.recv().await.unwrap();
        engine.process_message(msg);
    }
    assert_eq!(engine.state.grid.grown_trunk(), 3);

    run_line(&mut engine, "add positive:0.5 good").await;
    run_line(&mut engine, "add negative:0.5 bad").await;
    run_line(&mut engine, "add neutral:0.5 fine").await;
    drain(&mut rx);

    run_line(&mut engine, "sort").await;
    let order: Vec<EntryId> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::LeafPlaced { entry, .. } => Some(entry),
            _ => None,
        })
        .collect();
    // Entry ids follow submission order: good=1, bad=2, fine=3
    assert_eq!(order, vec![EntryId(2), EntryId(3), EntryId(1)]);

    run_line(&mut engine, "delete 3").await;
    let summary = engine.state.stats_summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.get(Polarity::Neutral).average, None);
    assert_eq!(summary.get(Polarity::Positive).percentage, 50.0);

    // The tag is stripped from the leaf text
    assert_eq!(engine.state.label_of(EntryId(1)).as_deref(), Some("good"));

    run_line(&mut engine, "swap").await;
    assert_eq!(
        engine.state.label_of(EntryId(1)).as_deref(),
        Some("50%")
    );

    run_line(&mut engine, "sort").await;
    assert!(drain(&mut rx).iter().any(|e| matches!(
        e,
        EngineEvent::SortCompleted {
            direction: SortDirection::Descending
        }
    )));

    run_line(&mut engine, "quit").await;
    assert!(engine.should_quit());
}

#[tokio::test(start_paused = true)]
async fn test_small_grid_fills_up() {
    let mut engine = small_engine();
    let mut rx = engine.subscribe();

    for i in 0..7 {
        run_line(&mut engine, &format!("add neutral:0.{} leaf {}", i + 1, i)).await;
    }

    assert_eq!(engine.state.ledger.len(), 6);
    assert!(drain(&mut rx).iter().any(|e| matches!(
        e,
        EngineEvent::PlacementFailed {
            part: TreePart::Leaf,
            ..
        }
    )));
}
