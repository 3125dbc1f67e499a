//! Frame Step
//!
//! One call per rendered frame: pursuers move, then the player is checked
//! against pursuers and collectibles. Deterministic given the state's RNG.

#[cfg(feature = "debug-tracing")]
use tracing::trace;
use tracing::{debug, info};

use crate::game::entity::{pick_random_direction, Character};
use crate::game::events::GameEvent;
use crate::game::input::Direction;
use crate::game::state::{GameState, SessionPhase};
use crate::game::traversal::TraversabilityOracle;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, in emission order
    pub events: Vec<GameEvent>,
    /// Whether the session ended this tick
    pub game_over: bool,
}

/// Try to move `character` one step in `direction`.
///
/// The move is legal iff the candidate position is traversable with the
/// character's clearance. Legal moves commit position and direction;
/// illegal ones leave the character untouched.
pub fn attempt_move<O>(character: &mut Character, direction: Direction, oracle: &O) -> bool
where
    O: TraversabilityOracle + ?Sized,
{
    let candidate = character.compute_candidate_position(direction);
    if !oracle.is_traversable(candidate, character.clearance()) {
        return false;
    }
    character.commit_move(candidate, direction);
    true
}

/// Run one frame step.
///
/// Once the session is over this is a no-op returning an empty result.
pub fn tick<O>(state: &mut GameState, oracle: &O) -> TickResult
where
    O: TraversabilityOracle + ?Sized,
{
    let mut result = TickResult::default();
    if state.is_over() {
        return result;
    }

    // 0. Advance tick counter
    state.tick += 1;

    // 1. Pursuers
    move_pursuers(state, oracle);

    // 2. Player animation
    state.player.advance_animation();

    // 3. Collisions (pursuers first: a caught player eats nothing)
    if !process_pursuer_collision(state) {
        process_collectible_collision(state);
    }

    result.events = state.take_events();
    result.game_over = state.is_over();
    result
}

/// Move each pursuer along its direction; blocked ones pick a new direction
/// for the next tick and stay put.
fn move_pursuers<O>(state: &mut GameState, oracle: &O)
where
    O: TraversabilityOracle + ?Sized,
{
    for pursuer in state.pursuers.iter_mut() {
        let direction = pursuer.direction;
        if !attempt_move(pursuer, direction, oracle) {
            pursuer.direction = pick_random_direction(&mut state.rng);

            #[cfg(feature = "debug-tracing")]
            trace!("Pursuer at {} blocked going {:?}, now {:?}", pursuer.position, direction, pursuer.direction);
        }
    }
}

/// Returns true when the session ended.
fn process_pursuer_collision(state: &mut GameState) -> bool {
    if state.player.detect_collision(&state.pursuers).is_none() {
        return false;
    }

    state.phase = SessionPhase::GameOver;
    info!("Player caught at tick {} with {} points", state.tick, state.score.total);

    let event = GameEvent::game_over(state.tick, state.score);
    state.push_event(event);
    true
}

fn process_collectible_collision(state: &mut GameState) {
    let Some((index, _)) = state.player.detect_collision(&state.collectibles) else {
        return;
    };

    let dot = state.collectibles.remove(index);
    let Some(category) = dot.category() else {
        return;
    };
    let points = state.score.record(category);
    debug!("Consumed {} dot (+{}), total {}", category, points, state.score.total);

    let event = GameEvent::score_changed(state.tick, category, state.score);
    state.push_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Point;
    use crate::game::events::GameEventData;
    use crate::game::road::{Canvas, RoadGeometry};
    use crate::game::score::{Category, Score};
    use crate::game::traversal::CorridorOracle;

    fn line_oracle() -> CorridorOracle {
        let roads = RoadGeometry::new(vec![vec![Point::new(0.0, 100.0), Point::new(200.0, 100.0)]]).unwrap();
        CorridorOracle::new(&roads, Canvas::new(200.0, 200.0).unwrap(), 25.0)
    }

    fn player_at(x: f64) -> Character {
        Character::player(Point::new(x, 100.0), 25.0, 10.0)
    }

    #[test]
    fn test_attempt_move_commits_when_legal() {
        let oracle = line_oracle();
        let mut player = player_at(100.0);
        player.direction = Direction::Left;

        assert!(attempt_move(&mut player, Direction::Right, &oracle));
        assert_eq!(player.position, Point::new(110.0, 100.0));
        assert_eq!(player.direction, Direction::Right);
    }

    #[test]
    fn test_attempt_move_rejects_off_road() {
        let oracle = line_oracle();
        let mut player = player_at(100.0);
        let before = player.clone();

        // 10px up is inside the 12.5px corridor, 20px is not
        assert!(attempt_move(&mut player, Direction::Up, &oracle));
        assert!(!attempt_move(&mut player, Direction::Up, &oracle));
        assert_eq!(player.position, Point::new(100.0, 90.0));

        let mut other = before.clone();
        other.position.y = 105.0;
        let snapshot = other.clone();
        assert!(!attempt_move(&mut other, Direction::Down, &oracle));
        assert_eq!(other, snapshot);
    }

    #[test]
    fn test_attempt_move_rejects_canvas_margin() {
        let oracle = line_oracle();
        let mut player = player_at(180.0);
        // 190 > 200 - 12.5
        assert!(!attempt_move(&mut player, Direction::Right, &oracle));
        assert_eq!(player.position.x, 180.0);
    }

    #[test]
    fn test_blocked_pursuer_rerolls_without_moving() {
        let oracle = line_oracle();
        let mut state = GameState::with_entities(
            9,
            player_at(20.0),
            // Off-canvas for its clearance in every direction
            vec![Character::pursuer(Point::new(190.0, 100.0), 50.0, 0.5)],
            vec![],
        );

        for _ in 0..20 {
            tick(&mut state, &oracle);
            assert_eq!(state.pursuers[0].position, Point::new(190.0, 100.0));
        }
        assert_eq!(state.tick, 20);
    }

    #[test]
    fn test_free_pursuer_moves_along_direction() {
        let oracle = line_oracle();
        let mut ghost = Character::pursuer(Point::new(100.0, 100.0), 50.0, 0.5);
        ghost.direction = Direction::Left;
        let mut state = GameState::with_entities(9, player_at(30.0), vec![ghost], vec![]);

        tick(&mut state, &oracle);
        assert_eq!(state.pursuers[0].position, Point::new(99.5, 100.0));
    }

    #[test]
    fn test_pursuer_contact_ends_session() {
        let oracle = line_oracle();
        let mut state = GameState::with_entities(
            1,
            player_at(150.0),
            vec![Character::pursuer(Point::new(170.0, 100.0), 50.0, 0.5)],
            vec![Character::collectible(Category::Orange, Point::new(150.0, 100.0), 25.0)],
        );

        let result = tick(&mut state, &oracle);
        assert!(result.game_over);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].data, GameEventData::GameOver { final_score: Score::default() });
        // Caught player eats nothing
        assert_eq!(state.collectibles.len(), 1);

        let hash = state.compute_hash();
        let after = tick(&mut state, &oracle);
        assert!(after.events.is_empty());
        assert!(!after.game_over);
        assert_eq!(state.compute_hash(), hash);
    }

    #[test]
    fn test_collectible_consumed_once_in_order() {
        let oracle = line_oracle();
        let mut state = GameState::with_entities(
            1,
            player_at(100.0),
            vec![],
            vec![
                Character::collectible(Category::Red, Point::new(105.0, 100.0), 25.0),
                Character::collectible(Category::Blue, Point::new(95.0, 100.0), 25.0),
            ],
        );

        let first = tick(&mut state, &oracle);
        assert_eq!(first.events.len(), 1);
        assert_eq!(first.events[0], GameEvent::score_changed(1, Category::Red, state_score(4, Category::Red)));

        let second = tick(&mut state, &oracle);
        assert_eq!(second.events[0].score().total, 5);
        assert!(state.collectibles.is_empty());

        assert_eq!(state.score.total, 5);
        assert_eq!(state.score.red, 1);
        assert_eq!(state.score.blue, 1);
        assert_eq!(state.score.orange + state.score.purple + state.score.green, 0);

        assert!(tick(&mut state, &oracle).events.is_empty());
    }

    fn state_score(total: u32, category: Category) -> Score {
        let mut score = Score::default();
        score.record(category);
        assert_eq!(score.total, total);
        score
    }
}
