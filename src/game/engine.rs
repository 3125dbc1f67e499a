//! Game Engine
//!
//! Owns one session: entity lists, score, phase, the traversability oracle
//! and event listeners. Driven by two hooks, `tick` once per frame and
//! `handle_directional_input` whenever a direction arrives. Both run to
//! completion; the engine is single-threaded (see `session` for a queued
//! wrapper).

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, GameConfig};
use crate::core::hash::StateHash;
use crate::core::rng::DeterministicRng;
use crate::game::entity::Character;
use crate::game::events::GameEvent;
use crate::game::input::{Direction, InputLog};
use crate::game::placement::{spawn_entities, PlacementError};
use crate::game::render::RenderFrame;
use crate::game::road::{Canvas, RoadGeometry};
use crate::game::score::Score;
use crate::game::state::{GameState, SessionPhase};
use crate::game::tick::{self, TickResult};
use crate::game::traversal::{CorridorOracle, TraversabilityOracle};

/// Engine construction errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Entities could not be placed on the roads.
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),
}

/// Callback invoked for every emitted event.
pub type EventListener = Box<dyn FnMut(&GameEvent) + Send>;

/// A running game session.
pub struct GameEngine<O = CorridorOracle> {
    config: GameConfig,
    roads: Arc<RoadGeometry>,
    canvas: Canvas,
    oracle: O,
    state: GameState,
    input_log: InputLog,
    listeners: Vec<EventListener>,
}

impl GameEngine<CorridorOracle> {
    /// Start a session on `roads` using the analytic corridor oracle.
    pub fn new(
        config: GameConfig,
        roads: Arc<RoadGeometry>,
        canvas: Canvas,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let oracle = CorridorOracle::new(&roads, canvas, config.stroke_width);
        Self::with_oracle(config, roads, canvas, oracle, seed)
    }
}

impl<O: TraversabilityOracle> GameEngine<O> {
    /// Start a session with a caller-supplied oracle.
    ///
    /// Places pursuers, collectibles and the player; fails if any of them
    /// cannot be placed within the configured attempt budget.
    pub fn with_oracle(
        config: GameConfig,
        roads: Arc<RoadGeometry>,
        canvas: Canvas,
        oracle: O,
        seed: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let state = place_session(&config, &roads, &oracle, seed)?;

        Ok(Self {
            config,
            roads,
            canvas,
            oracle,
            state,
            input_log: InputLog::new(),
            listeners: Vec::new(),
        })
    }

    /// Wrap an existing state, e.g. a hand-built scenario.
    pub fn from_state(
        config: GameConfig,
        roads: Arc<RoadGeometry>,
        canvas: Canvas,
        oracle: O,
        state: GameState,
    ) -> Self {
        Self {
            config,
            roads,
            canvas,
            oracle,
            state,
            input_log: InputLog::new(),
            listeners: Vec::new(),
        }
    }

    /// Discard every entity and start a new session on the same roads.
    ///
    /// Listeners stay registered; the input log starts over.
    pub fn restart(&mut self, seed: u64) -> Result<(), EngineError> {
        self.state = place_session(&self.config, &self.roads, &self.oracle, seed)?;
        self.input_log.clear();
        Ok(())
    }

    /// Register a callback for every future event.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Drop every registered callback.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Move the player one step if the move is legal.
    ///
    /// Returns whether the player moved. Ignored once the session is over.
    pub fn handle_directional_input(&mut self, direction: Direction) -> bool {
        if self.state.is_over() {
            return false;
        }
        self.input_log.record(self.state.tick, direction);
        tick::attempt_move(&mut self.state.player, direction, &self.oracle)
    }

    /// Try to move any character with this engine's oracle.
    pub fn attempt_move(&self, character: &mut Character, direction: Direction) -> bool {
        tick::attempt_move(character, direction, &self.oracle)
    }

    /// Run one frame step and notify listeners.
    pub fn tick(&mut self) -> TickResult {
        let result = tick::tick(&mut self.state, &self.oracle);
        for event in &result.events {
            for listener in self.listeners.iter_mut() {
                listener(event);
            }
        }
        result
    }

    /// Copy of the current score.
    pub fn score_snapshot(&self) -> Score {
        self.state.score
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Whether the session has ended.
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Read-only session state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Inputs handled since the session started.
    pub fn input_log(&self) -> &InputLog {
        &self.input_log
    }

    /// View for drawing the current frame.
    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame::capture(&self.state, &self.roads)
    }

    /// Hash of the full session state.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash()
    }

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Shared road geometry.
    pub fn roads(&self) -> &Arc<RoadGeometry> {
        &self.roads
    }

    /// Canvas bounds.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The traversability oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

fn place_session<O: TraversabilityOracle>(
    config: &GameConfig,
    roads: &RoadGeometry,
    oracle: &O,
    seed: u64,
) -> Result<GameState, PlacementError> {
    let mut rng = DeterministicRng::new(seed);
    let spawned = spawn_entities(roads, oracle, config, &mut rng)?;

    info!(
        "Session started (seed {}): player at {}, {} pursuers, {} collectibles",
        seed,
        spawned.player.position,
        spawned.pursuers.len(),
        spawned.collectibles.len()
    );

    Ok(GameState::new(seed, spawned, rng))
}

/// Rebuild a session from its seed and replay recorded input.
///
/// Inputs recorded at tick `t` are applied after `t` ticks have run, so an
/// identical seed and log reproduce the original state hash.
pub fn replay_session(
    config: GameConfig,
    roads: Arc<RoadGeometry>,
    canvas: Canvas,
    seed: u64,
    log: &InputLog,
    ticks: u32,
) -> Result<GameEngine, EngineError> {
    let mut engine = GameEngine::new(config, roads, canvas, seed)?;
    let mut inputs = log.inputs().iter().peekable();

    for t in 0..=ticks {
        while let Some(input) = inputs.next_if(|input| input.tick <= t) {
            engine.handle_directional_input(input.direction);
        }
        if t < ticks {
            engine.tick();
        }
    }

    Ok(engine)
}
