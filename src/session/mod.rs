//! Session Actor
//!
//! Runs a `GameEngine` on its own task. Frames and inputs arrive through one
//! FIFO command queue, so they never interleave inside a tick; events fan
//! out to any number of subscribers.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::core::hash::StateHash;
use crate::core::rng::derive_session_seed;
use crate::game::engine::{EngineError, GameEngine};
use crate::game::events::GameEvent;
use crate::game::input::Direction;
use crate::game::road::{Canvas, RoadGeometry};
use crate::game::score::Score;
use crate::game::state::SessionPhase;
use crate::game::traversal::{CorridorOracle, TraversabilityOracle};

/// Unique session identifier.
pub type SessionId = [u8; 16];

/// Channel sizes and optional built-in frame clock.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pending commands before senders wait.
    pub command_buffer: usize,
    /// Events kept for slow subscribers.
    pub event_buffer: usize,
    /// Tick on this interval without external `Frame` commands.
    pub frame_interval: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_buffer: 64,
            event_buffer: 256,
            frame_interval: None,
        }
    }
}

/// Commands accepted by the session task.
#[derive(Debug)]
pub enum SessionCommand {
    /// Run one tick.
    Frame,
    /// Directional input from the player.
    Input(Direction),
    /// Report the current state.
    Snapshot(oneshot::Sender<SessionSnapshot>),
    /// Start over on the same roads.
    Restart {
        /// Seed for the new session
        seed: u64,
        /// Placement outcome
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    /// Stop the task.
    Shutdown,
}

/// Point-in-time summary of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Ticks processed
    pub tick: u32,
    /// Current phase
    pub phase: SessionPhase,
    /// Current score
    pub score: Score,
    /// Collectibles still on the roads
    pub collectibles_remaining: usize,
    /// Hash of the full state
    pub state_hash: StateHash,
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session task has stopped.
    #[error("session closed")]
    Closed,

    /// The engine could not be (re)started.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The session task panicked or was cancelled.
    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Client side of a running session.
pub struct SessionHandle<O = CorridorOracle> {
    id: SessionId,
    commands: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<GameEvent>,
    task: JoinHandle<GameEngine<O>>,
}

impl<O> SessionHandle<O> {
    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Request one tick.
    pub async fn frame(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Frame).await
    }

    /// Forward a directional input.
    pub async fn input(&self, direction: Direction) -> Result<(), SessionError> {
        self.send(SessionCommand::Input(direction)).await
    }

    /// Current state, after every previously sent command has run.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(reply)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Start a new game with `seed`.
    pub async fn restart(&self, seed: u64) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Restart { seed, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)??;
        Ok(())
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Stop the session and take back its engine.
    ///
    /// Commands sent before this one still run first.
    pub async fn shutdown(self) -> Result<GameEngine<O>, SessionError> {
        // Already stopped is fine
        let _ = self.commands.send(SessionCommand::Shutdown).await;
        Ok(self.task.await?)
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).await.map_err(|_| SessionError::Closed)
    }
}

/// Start a session with a fresh identifier.
///
/// The seed is derived from the identifier and the road geometry, so two
/// sessions on the same roads still play out differently.
pub fn spawn_session(
    config: GameConfig,
    roads: Arc<RoadGeometry>,
    canvas: Canvas,
    session_config: SessionConfig,
) -> Result<SessionHandle, SessionError> {
    let id = uuid::Uuid::new_v4().into_bytes();
    let seed = derive_session_seed(&id, &roads.digest());
    let engine = GameEngine::new(config, roads, canvas, seed)?;
    Ok(spawn_with_engine(id, engine, session_config))
}

/// Run an already built engine as a session.
pub fn spawn_with_engine<O>(
    id: SessionId,
    mut engine: GameEngine<O>,
    session_config: SessionConfig,
) -> SessionHandle<O>
where
    O: TraversabilityOracle + Send + 'static,
{
    let (commands, rx) = mpsc::channel(session_config.command_buffer.max(1));
    let (events, _) = broadcast::channel(session_config.event_buffer.max(1));

    let publisher = events.clone();
    engine.on_event(move |event| {
        // No subscribers is not an error
        let _ = publisher.send(event.clone());
    });

    let ticker = session_config.frame_interval.map(|period| {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    });

    let task = tokio::spawn(run_session(id, engine, rx, ticker));

    SessionHandle {
        id,
        commands,
        events,
        task,
    }
}

async fn run_session<O: TraversabilityOracle>(
    id: SessionId,
    mut engine: GameEngine<O>,
    mut commands: mpsc::Receiver<SessionCommand>,
    mut ticker: Option<Interval>,
) -> GameEngine<O> {
    let short_id = hex::encode(&id[..4]);
    info!("Session {} running (seed {})", short_id, engine.state().seed);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    warn!("Session {} lost its handle without a shutdown", short_id);
                    break;
                };
                if !handle_command(&short_id, &mut engine, command) {
                    break;
                }
            }
            _ = next_frame(&mut ticker) => {
                engine.tick();
            }
        }
    }

    info!(
        "Session {} stopped at tick {} with {} points",
        short_id,
        engine.state().tick,
        engine.score_snapshot().total
    );

    // Closes the event channel once the handle is gone too
    engine.clear_listeners();
    engine
}

/// Returns false when the session should stop.
fn handle_command<O: TraversabilityOracle>(
    short_id: &str,
    engine: &mut GameEngine<O>,
    command: SessionCommand,
) -> bool {
    match command {
        SessionCommand::Frame => {
            engine.tick();
        }
        SessionCommand::Input(direction) => {
            engine.handle_directional_input(direction);
        }
        SessionCommand::Snapshot(reply) => {
            let state = engine.state();
            let snapshot = SessionSnapshot {
                tick: state.tick,
                phase: state.phase,
                score: state.score,
                collectibles_remaining: state.collectibles.len(),
                state_hash: engine.compute_hash(),
            };
            if reply.send(snapshot).is_err() {
                warn!("Session {} dropped a snapshot nobody waited for", short_id);
            }
        }
        SessionCommand::Restart { seed, reply } => {
            let result = engine.restart(seed);
            match &result {
                Ok(()) => debug!("Session {} restarted with seed {}", short_id, seed),
                Err(e) => warn!("Session {} failed to restart: {}", short_id, e),
            }
            if reply.send(result).is_err() {
                warn!("Session {} dropped a restart reply nobody waited for", short_id);
            }
        }
        SessionCommand::Shutdown => return false,
    }
    true
}

async fn next_frame(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending::<()>().await,
    }
}
