//! Engine - shared orchestration state for runners
//!
//! The Engine owns the coordinator state, the message channel, the campaign
//! timer tasks, the shutdown signal and the scorer. Runners feed it messages
//! and subscribe to the events it broadcasts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::scorer::Scorer;
use crate::state::AppState;
use stree_core::{Result, ResultExt};

/// Orchestration engine for the sentiment tree.
///
/// Encapsulates:
/// - TEA state management
/// - Message channel
/// - Campaign timer tasks
/// - Shutdown signaling
/// - Event broadcasting for external consumers
pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (stdin reader, timer tasks).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Loaded settings
    pub settings: Settings,

    /// External sentiment classifier
    scorer: Arc<dyn Scorer>,

    /// Timer tasks of scheduled campaigns
    campaign_tasks: JoinSet<()>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Create a new Engine.
    ///
    /// Fails only when the configured grid layout is invalid.
    pub fn new(settings: Settings, scorer: Arc<dyn Scorer>) -> Result<Self> {
        let state = AppState::with_settings(&settings).context("Invalid settings")?;

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(256);

        info!(
            "Engine ready: {}x{} grid, {} leaf slots",
            state.grid.rows(),
            state.grid.columns(),
            state.grid.leaf_capacity()
        );

        Ok(Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            settings,
            scorer,
            campaign_tasks: JoinSet::new(),
            event_tx,
        })
    }

    /// Kick off trunk growth.
    pub fn start(&mut self) {
        self.process_message(Message::GrowTrunk);
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle, then
    /// broadcast every event it produced.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            self.scorer.as_ref(),
            &self.msg_tx,
            &self.shutdown_rx,
            &mut self.campaign_tasks,
        );

        for event in self.state.take_events() {
            self.emit(event);
        }
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Initiate shutdown: signal timer tasks and wait for them to exit.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        let _ = self.shutdown_tx.send(true);

        let drain = async {
            while let Some(res) = self.campaign_tasks.join_next().await {
                if let Err(e) = res {
                    warn!("Campaign task panicked: {}", e);
                }
            }
        };
        if tokio::time::timeout(Duration::from_secs(2), drain)
            .await
            .is_err()
        {
            warn!("Campaign task cleanup timed out");
        }
    }

    /// send() returns Err only if there are no receivers; that is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
