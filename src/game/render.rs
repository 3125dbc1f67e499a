//! Render View
//!
//! Read-only view of a session for drawing collaborators. Pixel shapes,
//! colors and sprites are up to them.

use serde::Serialize;

use crate::core::vec2::Point;
use crate::game::entity::{Character, CharacterKind};
use crate::game::input::Direction;
use crate::game::road::RoadGeometry;
use crate::game::score::Score;
use crate::game::state::{GameState, SessionPhase};

/// What to draw for one character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EntityView {
    /// Box center
    pub position: Point,
    /// Facing
    pub direction: Direction,
    /// Box edge
    pub size: f64,
    /// Variant, including animation phase
    #[serde(flatten)]
    pub kind: CharacterKind,
}

impl From<&Character> for EntityView {
    fn from(character: &Character) -> Self {
        Self {
            position: character.position,
            direction: character.direction,
            size: character.size,
            kind: character.kind,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, Serialize)]
pub struct RenderFrame<'a> {
    /// Ticks processed so far
    pub tick: u32,
    /// Session phase
    pub phase: SessionPhase,
    /// Current score
    pub score: Score,
    /// The player
    pub player: EntityView,
    /// Pursuers
    pub pursuers: Vec<EntityView>,
    /// Remaining collectibles
    pub collectibles: Vec<EntityView>,
    /// Road center-lines, unchanged since session start
    pub roads: &'a RoadGeometry,
}

impl<'a> RenderFrame<'a> {
    /// Build a frame from session state.
    pub fn capture(state: &GameState, roads: &'a RoadGeometry) -> Self {
        Self {
            tick: state.tick,
            phase: state.phase,
            score: state.score,
            player: EntityView::from(&state.player),
            pursuers: state.pursuers.iter().map(EntityView::from).collect(),
            collectibles: state.collectibles.iter().map(EntityView::from).collect(),
            roads,
        }
    }
}
