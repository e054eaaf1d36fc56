//! Engine-level campaign tests on a paused tokio clock

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use stree_app::{config::Settings, Engine, EngineEvent, Message, TaggedScorer};
use stree_core::{EntryId, SortDirection};

fn engine() -> Engine {
    Engine::new(Settings::default(), Arc::new(TaggedScorer)).unwrap()
}

/// Feed timer messages back into the engine until no campaign is open
async fn pump_until_idle(engine: &mut Engine) {
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

fn submit(engine: &mut Engine, text: &str) {
    engine.process_message(Message::SubmitText {
        text: text.to_string(),
    });
}

fn placed(events: &[EngineEvent]) -> Vec<(EntryId, usize)> {
    events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::LeafPlaced { entry, slot, .. } => Some((*entry, slot.rank)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_trunk_grows_on_schedule() {
    let mut engine = engine();
    let mut rx = engine.subscribe();
    let start = Instant::now();

    engine.start();
    pump_until_idle(&mut engine).await;

    // lead 100ms + 14 steps of 200ms
    assert_eq!(start.elapsed(), Duration::from_millis(2900));
    assert_eq!(engine.state.grid.grown_trunk(), 14);

    let events = drain(&mut rx);
    let rows: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::TrunkGrown { slot } => Some(slot.row),
            _ => None,
        })
        .collect();
    assert_eq!(rows, (0..14).collect::<Vec<_>>());
    assert!(matches!(events.last(), Some(EngineEvent::TrunkCompleted)));
}

#[tokio::test(start_paused = true)]
async fn test_sort_toggles_direction_and_replaces_in_order() {
    let mut engine = engine();
    let mut rx = engine.subscribe();

    submit(&mut engine, "positive:0.2 nice");
    submit(&mut engine, "negative:0.9 awful");
    submit(&mut engine, "neutral:0.5 okay");
    submit(&mut engine, "negative:0.9 awful again");
    assert_eq!(engine.state.ledger.len(), 4);

    let ids: Vec<EntryId> = placed(&drain(&mut rx)).into_iter().map(|(id, _)| id).collect();
    let (nice, awful, okay, awful_again) = (ids[0], ids[1], ids[2], ids[3]);

    let start = Instant::now();
    engine.process_message(Message::Sort);
    pump_until_idle(&mut engine).await;
    assert_eq!(start.elapsed(), Duration::from_millis(500));

    let events = drain(&mut rx);
    assert!(matches!(
        events[0],
        EngineEvent::SortStarted {
            direction: SortDirection::Ascending,
            count: 4
        }
    ));
    assert_eq!(
        placed(&events),
        vec![(awful, 1), (awful_again, 2), (okay, 3), (nice, 4)]
    );

    engine.process_message(Message::Sort);
    pump_until_idle(&mut engine).await;

    let events = drain(&mut rx);
    assert!(matches!(
        events.iter().find(|e| matches!(e, EngineEvent::SortCompleted { .. })),
        Some(EngineEvent::SortCompleted {
            direction: SortDirection::Descending
        })
    ));
    assert_eq!(
        placed(&events),
        vec![(nice, 1), (okay, 2), (awful_again, 3), (awful, 4)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_sort_while_sorting_is_ignored() {
    let mut engine = engine();
    let mut rx = engine.subscribe();
    submit(&mut engine, "neutral:0.1 a");
    submit(&mut engine, "neutral:0.2 b");

    engine.process_message(Message::Sort);
    engine.process_message(Message::Sort);
    submit(&mut engine, "positive:1 late");
    pump_until_idle(&mut engine).await;

    let events = drain(&mut rx);
    let sorts = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::SortStarted { .. }))
        .count();
    assert_eq!(sorts, 1);
    assert_eq!(engine.state.ledger.len(), 2);
    assert_eq!(engine.state.sequencer.next_direction(), SortDirection::Descending);
}

#[tokio::test(start_paused = true)]
async fn test_quit_waits_for_sort_to_finish() {
    let mut engine = engine();
    submit(&mut engine, "neutral:0.1 a");
    engine.process_message(Message::Sort);

    engine.process_message(Message::Quit);
    assert!(!engine.should_quit());

    pump_until_idle(&mut engine).await;
    assert!(engine.should_quit());
}

#[tokio::test(start_paused = true)]
async fn test_untagged_submission_reports_scoring_failure() {
    let mut engine = engine();
    let mut rx = engine.subscribe();

    submit(&mut engine, "no tag here");

    let events = drain(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::ScoringFailed { text, .. }] if text == "no tag here"
    ));
    assert!(engine.state.ledger.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_campaign() {
    let mut engine = engine();
    let mut rx = engine.subscribe();

    engine.start();
    engine.shutdown().await;
    tokio::time::advance(Duration::from_secs(10)).await;

    assert!(engine.msg_rx.try_recv().is_err());
    assert!(matches!(drain(&mut rx).last(), Some(EngineEvent::Shutdown)));
    assert_eq!(engine.state.grid.grown_trunk(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drain_pending_messages_runs_fired_steps() {
    let mut engine = engine();
    assert_eq!(engine.drain_pending_messages(), 0);

    submit(&mut engine, "negative:0.3 cold");
    submit(&mut engine, "positive:0.3 warm");
    engine.process_message(Message::Sort);

    // Both steps (at 200ms and 300ms) fire while we wait
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(engine.drain_pending_messages(), 2);
    assert!(engine.state.sequencer.is_idle());
    assert_eq!(engine.state.grid.occupied_leaves(), 2);
}

#[test]
fn test_engine_rejects_non_finite_multiplier() {
    let mut settings = Settings::default();
    settings.scoring.score_multiplier.negative = f64::NAN;

    let err = match Engine::new(settings, Arc::new(TaggedScorer)) {
        Ok(_) => panic!("NaN multiplier accepted"),
        Err(e) => e,
    };
    assert!(matches!(err, stree_core::Error::Config { .. }));
    assert!(err.is_fatal());
}
