//! # Road Chase
//!
//! Deterministic arcade chase engine played on a road network: the player
//! steers along the streets eating dots while pursuers wander the same roads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ROAD CHASE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - 2D canvas point                           │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── road.rs     - Canvas and road center-lines              │
//! │  ├── traversal.rs- Corridor and raster oracles               │
//! │  ├── placement.rs- Random start positions                    │
//! │  ├── entity.rs   - Player, pursuers, collectibles            │
//! │  ├── tick.rs     - Per-frame step                            │
//! │  └── engine.rs   - Session owner, replay                     │
//! │                                                              │
//! │  config.rs       - Tunables (JSON)                           │
//! │  session/        - Async actor (non-deterministic timing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same roads, config, seed and input log, a session produces
//! the same state hash:
//! - All randomness from the session's seeded Xorshift128+
//! - No system time in `core/` or `game/`
//! - Pursuers are stepped in placement order

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;
pub mod session;

// Re-export commonly used types
pub use core::vec2::Point;
pub use core::rng::DeterministicRng;
pub use config::{ConfigError, GameConfig};
pub use game::engine::{replay_session, EngineError, GameEngine};
pub use game::input::Direction;
pub use game::road::{Canvas, RoadGeometry};
pub use game::score::{Category, Score};
pub use session::{spawn_session, SessionConfig, SessionHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frames per second the engine is tuned for (Hz)
pub const FRAME_RATE: u32 = 60;
