//! Game Logic Module
//!
//! All game simulation code. Deterministic given a seed and an input log.
//!
//! ## Module Structure
//!
//! - `input`: Directions, key mapping, input log
//! - `score`: Collectible categories and the running score
//! - `entity`: Player, pursuers, collectibles
//! - `collision`: Axis-aligned box overlap
//! - `road`: Canvas and road center-lines
//! - `traversal`: Which points a character may occupy
//! - `placement`: Random start positions on the roads
//! - `state`: Session state
//! - `tick`: Per-frame step
//! - `events`: Score and game-over notifications
//! - `render`: Read-only frame view
//! - `engine`: Session owner tying the above together

pub mod input;
pub mod score;
pub mod entity;
pub mod collision;
pub mod road;
pub mod traversal;
pub mod placement;
pub mod state;
pub mod tick;
pub mod events;
pub mod render;
pub mod engine;

// Re-export key types
pub use input::{Direction, InputLog, RecordedInput};
pub use score::{Category, Score};
pub use entity::{Character, CharacterKind, MouthAnimation};
pub use road::{Canvas, RoadError, RoadGeometry};
pub use traversal::{CorridorOracle, MaskOracle, TraversabilityOracle};
pub use placement::PlacementError;
pub use state::{GameState, SessionPhase};
pub use tick::TickResult;
pub use events::{GameEvent, GameEventData};
pub use render::{EntityView, RenderFrame};
pub use engine::{replay_session, EngineError, GameEngine};
