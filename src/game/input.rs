//! Directional Input
//!
//! The four movement directions, keyboard key mapping, and the input log
//! recorded during a session so it can be replayed deterministically.

use serde::{Serialize, Deserialize};
use crate::core::vec2::Point;

// =============================================================================
// DIRECTION
// =============================================================================

/// Movement direction on the canvas.
///
/// The canvas y axis grows downward, so `Up` decreases y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    /// Toward smaller y
    Up = 0,
    /// Toward larger y
    Down = 1,
    /// Toward smaller x
    Left = 2,
    /// Toward larger x
    Right = 3,
}

impl Direction {
    /// All directions, in sampling order.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Right,
    ];

    /// Unit offset for this direction in canvas space.
    #[inline]
    pub fn unit(self) -> Point {
        match self {
            Direction::Up => Point::new(0.0, -1.0),
            Direction::Down => Point::new(0.0, 1.0),
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Right => Point::new(1.0, 0.0),
        }
    }

    /// Horizontal directions only change x.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Map a browser-style key name to a direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Get from index (0-3).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}

// =============================================================================
// INPUT LOG
// =============================================================================

/// A directional input tagged with the number of ticks processed before it
/// arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedInput {
    /// Ticks completed when the input was handled
    pub tick: u32,
    /// Requested direction
    pub direction: Direction,
}

/// Ordered record of every directional input a session handled.
///
/// Replaying the log against the same seed reproduces the session exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLog {
    inputs: Vec<RecordedInput>,
}

impl InputLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input. Ticks must be non-decreasing.
    pub fn record(&mut self, tick: u32, direction: Direction) {
        debug_assert!(self.inputs.last().map_or(true, |last| last.tick <= tick));
        self.inputs.push(RecordedInput { tick, direction });
    }

    /// All recorded inputs in arrival order.
    pub fn inputs(&self) -> &[RecordedInput] {
        &self.inputs
    }

    /// Number of recorded inputs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Forget every recorded input.
    pub fn clear(&mut self) {
        self.inputs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Space"), None);
    }

    #[test]
    fn test_unit_axes() {
        for direction in Direction::ALL {
            let unit = direction.unit();
            if direction.is_horizontal() {
                assert_eq!(unit.y, 0.0);
                assert_eq!(unit.x.abs(), 1.0);
            } else {
                assert_eq!(unit.x, 0.0);
                assert_eq!(unit.y.abs(), 1.0);
            }
        }
        // Canvas y grows downward
        assert_eq!(Direction::Up.unit().y, -1.0);
    }

    #[test]
    fn test_from_index() {
        for i in 0..4u8 {
            let direction = Direction::from_index(i).unwrap();
            assert_eq!(direction as u8, i);
        }
        assert!(Direction::from_index(4).is_none());
    }

    #[test]
    fn test_input_log_order() {
        let mut log = InputLog::new();
        assert!(log.is_empty());

        log.record(0, Direction::Right);
        log.record(0, Direction::Up);
        log.record(3, Direction::Left);

        assert_eq!(log.len(), 3);
        assert_eq!(log.inputs()[1], RecordedInput { tick: 0, direction: Direction::Up });

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_direction_json() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }
}
