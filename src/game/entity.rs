//! Characters
//!
//! Player, pursuers and collectibles share one struct: position, direction,
//! step size and box size, plus a variant payload in `CharacterKind`.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Point;
use crate::game::collision::first_overlap;
use crate::game::input::Direction;
use crate::game::score::Category;

/// Step size of characters that never move.
pub const STATIONARY_STEP: f64 = 10.0;

/// Mouth opening range of the player animation, in degrees.
pub const MOUTH_MAX_OPEN: u8 = 40;

/// Mouth opening change per tick, in degrees.
pub const MOUTH_STEP: u8 = 5;

// =============================================================================
// PLAYER ANIMATION
// =============================================================================

/// Mouth animation of the player. Rendering only; never affects play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouthAnimation {
    /// Current opening angle (0 to `MOUTH_MAX_OPEN`)
    pub open: u8,
    /// Whether the mouth is currently opening
    pub opening: bool,
}

impl Default for MouthAnimation {
    fn default() -> Self {
        Self {
            open: MOUTH_MAX_OPEN,
            opening: false,
        }
    }
}

impl MouthAnimation {
    /// Advance by one frame, bouncing between closed and fully open.
    pub fn advance(&mut self) {
        if self.open == 0 {
            self.opening = true;
        } else if self.open >= MOUTH_MAX_OPEN {
            self.opening = false;
        }

        self.open = if self.opening {
            self.open.saturating_add(MOUTH_STEP).min(MOUTH_MAX_OPEN)
        } else {
            self.open.saturating_sub(MOUTH_STEP)
        };
    }
}

// =============================================================================
// CHARACTER
// =============================================================================

/// Variant-specific part of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CharacterKind {
    /// The user-controlled character
    Player {
        /// Mouth animation phase
        mouth: MouthAnimation,
    },
    /// A ghost that ends the session on contact
    Pursuer,
    /// A dot consumed for points
    Collectible {
        /// Fixed at creation
        category: Category,
    },
}

/// A character on the road network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Center of the bounding box
    pub position: Point,

    /// Last committed (player) or intended (pursuer) direction
    pub direction: Direction,

    /// Distance covered by one move
    pub step_size: f64,

    /// Bounding box edge length
    pub size: f64,

    /// Variant payload
    pub kind: CharacterKind,
}

impl Character {
    /// Create the player, facing right.
    pub fn player(position: Point, size: f64, step_size: f64) -> Self {
        Self {
            position,
            direction: Direction::Right,
            step_size,
            size,
            kind: CharacterKind::Player {
                mouth: MouthAnimation::default(),
            },
        }
    }

    /// Create a pursuer, heading down.
    pub fn pursuer(position: Point, size: f64, step_size: f64) -> Self {
        Self {
            position,
            direction: Direction::Down,
            step_size,
            size,
            kind: CharacterKind::Pursuer,
        }
    }

    /// Create a collectible of a category.
    pub fn collectible(category: Category, position: Point, size: f64) -> Self {
        Self {
            position,
            direction: Direction::Down,
            step_size: STATIONARY_STEP,
            size,
            kind: CharacterKind::Collectible { category },
        }
    }

    /// Half the box edge: the margin this character keeps from the canvas
    /// border.
    #[inline]
    pub fn clearance(&self) -> f64 {
        self.size / 2.0
    }

    /// Category, for collectibles.
    pub fn category(&self) -> Option<Category> {
        match self.kind {
            CharacterKind::Collectible { category } => Some(category),
            _ => None,
        }
    }

    /// Point value, for collectibles.
    pub fn point_value(&self) -> Option<u32> {
        self.category().map(Category::point_value)
    }

    /// Position reached by one step in `direction`. Does not move.
    #[inline]
    pub fn compute_candidate_position(&self, direction: Direction) -> Point {
        self.position.add(direction.unit().scale(self.step_size))
    }

    /// First character in `others` whose box overlaps this one.
    pub fn detect_collision<'a>(&self, others: &'a [Character]) -> Option<(usize, &'a Character)> {
        first_overlap(self.position, self.size, others)
    }

    /// Whether any character in `others` overlaps this one.
    pub fn collides_with_any(&self, others: &[Character]) -> bool {
        self.detect_collision(others).is_some()
    }

    /// Commit a move.
    #[inline]
    pub fn commit_move(&mut self, position: Point, direction: Direction) {
        self.position = position;
        self.direction = direction;
    }

    /// Advance the player's animation. Other variants are unaffected.
    pub fn advance_animation(&mut self) {
        if let CharacterKind::Player { mouth } = &mut self.kind {
            mouth.advance();
        }
    }
}

/// Uniformly sample one of the four directions.
pub fn pick_random_direction(rng: &mut DeterministicRng) -> Direction {
    Direction::ALL[rng.next_index(Direction::ALL.len())]
}
