//! Session State
//!
//! Everything a running session owns: the entity lists, score, phase,
//! tick counter and the seeded RNG. The road geometry lives outside, shared
//! read-only.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::core::rng::DeterministicRng;
use crate::game::entity::{Character, CharacterKind};
use crate::game::events::GameEvent;
use crate::game::placement::SpawnedEntities;
use crate::game::score::Score;

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Ticks and inputs are processed
    Running,
    /// A pursuer caught the player; nothing changes any more
    GameOver,
}

/// State of one game session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG started from
    pub seed: u64,

    /// Number of ticks processed
    pub tick: u32,

    /// Current phase
    pub phase: SessionPhase,

    /// The player
    pub player: Character,

    /// Pursuers; count is fixed for the session
    pub pursuers: Vec<Character>,

    /// Remaining collectibles; only ever shrinks
    pub collectibles: Vec<Character>,

    /// Current score
    pub score: Score,

    /// Session RNG
    pub rng: DeterministicRng,

    /// Events pending collection
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a running session from placed entities.
    ///
    /// `rng` continues from wherever placement left it.
    pub fn new(seed: u64, spawned: SpawnedEntities, rng: DeterministicRng) -> Self {
        Self {
            seed,
            tick: 0,
            phase: SessionPhase::Running,
            player: spawned.player,
            pursuers: spawned.pursuers,
            collectibles: spawned.collectibles,
            score: Score::default(),
            rng,
            events: Vec::new(),
        }
    }

    /// Create a running session with hand-placed entities.
    pub fn with_entities(
        seed: u64,
        player: Character,
        pursuers: Vec<Character>,
        collectibles: Vec<Character>,
    ) -> Self {
        debug_assert!(matches!(player.kind, CharacterKind::Player { .. }));
        Self::new(
            seed,
            SpawnedEntities {
                player,
                pursuers,
                collectibles,
            },
            DeterministicRng::new(seed),
        )
    }

    /// Whether the session has ended.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Queue an event for the current tick.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take pending events (clears the queue).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Compute hash of the full session state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_bool(self.is_over());
            hash_score(hasher, &self.score);

            hash_character(hasher, &self.player);

            hasher.update_u32(self.pursuers.len() as u32);
            for pursuer in &self.pursuers {
                hash_character(hasher, pursuer);
            }

            hasher.update_u32(self.collectibles.len() as u32);
            for collectible in &self.collectibles {
                hash_character(hasher, collectible);
            }

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }
}

fn hash_score(hasher: &mut StateHasher, score: &Score) {
    hasher.update_u32(score.total);
    hasher.update_u32(score.orange);
    hasher.update_u32(score.red);
    hasher.update_u32(score.purple);
    hasher.update_u32(score.green);
    hasher.update_u32(score.blue);
}

fn hash_character(hasher: &mut StateHasher, character: &Character) {
    hasher.update_point(character.position);
    hasher.update_u8(character.direction as u8);
    hasher.update_f64(character.step_size);
    hasher.update_f64(character.size);
    match character.kind {
        CharacterKind::Player { mouth } => {
            hasher.update_u8(0);
            hasher.update_u8(mouth.open);
            hasher.update_bool(mouth.opening);
        }
        CharacterKind::Pursuer => hasher.update_u8(1),
        CharacterKind::Collectible { category } => {
            hasher.update_u8(2);
            hasher.update_u8(category as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Point;
    use crate::game::score::Category;

    fn sample(seed: u64) -> GameState {
        GameState::with_entities(
            seed,
            Character::player(Point::new(10.0, 10.0), 25.0, 10.0),
            vec![Character::pursuer(Point::new(100.0, 10.0), 50.0, 0.5)],
            vec![Character::collectible(Category::Red, Point::new(50.0, 10.0), 25.0)],
        )
    }

    #[test]
    fn test_new_state_is_running() {
        let state = sample(1);
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.tick, 0);
        assert_eq!(state.score, Score::default());
        assert!(!state.is_over());
    }

    #[test]
    fn test_hash_determinism() {
        assert_eq!(sample(1).compute_hash(), sample(1).compute_hash());
        assert_ne!(sample(1).compute_hash(), sample(2).compute_hash());
    }

    #[test]
    fn test_hash_sees_positions() {
        let a = sample(1);
        let mut b = sample(1);
        b.pursuers[0].position.x += 0.5;
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_take_events_clears() {
        let mut state = sample(1);
        state.push_event(GameEvent::game_over(1, Score::default()));
        assert_eq!(state.take_events().len(), 1);
        assert!(state.take_events().is_empty());
    }
}
