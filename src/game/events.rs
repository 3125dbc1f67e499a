//! Game Events
//!
//! Events emitted synchronously by the engine, strictly in the order the
//! underlying state changes happen within a tick.

use serde::{Serialize, Deserialize};
use crate::game::score::{Category, Score};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventData {
    /// The player consumed a collectible
    ScoreChanged {
        /// Category of the consumed collectible
        category: Category,
        /// Points it was worth
        points: u32,
        /// Score after consumption
        score: Score,
    },

    /// The player touched a pursuer; the session is over
    GameOver {
        /// Score at the end of the session
        final_score: Score,
    },
}

/// A game event with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick index (1-based) of the tick that produced the event
    pub tick: u32,

    /// Event data
    #[serde(flatten)]
    pub data: GameEventData,
}

impl GameEvent {
    /// Create score changed event.
    pub fn score_changed(tick: u32, category: Category, score: Score) -> Self {
        Self {
            tick,
            data: GameEventData::ScoreChanged {
                category,
                points: category.point_value(),
                score,
            },
        }
    }

    /// Create game over event.
    pub fn game_over(tick: u32, final_score: Score) -> Self {
        Self {
            tick,
            data: GameEventData::GameOver { final_score },
        }
    }

    /// Score carried by the event.
    pub fn score(&self) -> Score {
        match &self.data {
            GameEventData::ScoreChanged { score, .. } => *score,
            GameEventData::GameOver { final_score } => *final_score,
        }
    }

    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self.data, GameEventData::GameOver { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_changed_carries_points() {
        let mut score = Score::default();
        score.record(Category::Orange);

        let event = GameEvent::score_changed(3, Category::Orange, score);
        assert_eq!(event.score().total, 5);
        assert!(!event.is_terminal());
        match event.data {
            GameEventData::ScoreChanged { points, .. } => assert_eq!(points, 5),
            _ => panic!("wrong event"),
        }
    }

    #[test]
    fn test_game_over_json() {
        let event = GameEvent::game_over(12, Score::default());
        assert!(event.is_terminal());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "game_over");
        assert_eq!(json["tick"], 12);
        assert_eq!(json["final_score"]["total"], 0);

        let parsed: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }
}
