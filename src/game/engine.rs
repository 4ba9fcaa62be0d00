use super::{
    config::GameConfig,
    direction::Direction,
    speed,
    state::{EndCause, GameState, GameStatus, Position, Snake},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set iff this tick ended the game
    pub ended: Option<EndCause>,
}

impl StepOutcome {
    fn noop() -> Self {
        Self {
            ate_food: false,
            ended: None,
        }
    }
}

/// The game engine that handles all movement, collision and growth logic.
///
/// The engine never does I/O and is driven by an external scheduler (the
/// app's tick timer, or a test calling `step` directly).
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a fixed seed, for deterministic food placement in tests
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the initial state of a game: snake centered and heading up,
    /// food placed clear of it, waiting in `Idle`
    pub fn new_game(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;
        let snake = Snake::new(
            Position::new(center, center),
            Direction::Up,
            self.config.initial_snake_length,
        );

        match self.place_food(&snake) {
            Some(food) => GameState::new(
                snake,
                food,
                Direction::Up,
                self.config.grid_size,
                self.config.initial_tick(),
            ),
            None => {
                // Degenerate configuration where the snake already covers
                // the grid; the game is over before it starts.
                let head = snake.head();
                let mut state = GameState::new(
                    snake,
                    head,
                    Direction::Up,
                    self.config.grid_size,
                    self.config.initial_tick(),
                );
                state.end(EndCause::BoardFull);
                state
            }
        }
    }

    /// Execute one tick.
    ///
    /// A no-op unless the game is in `Playing`. The tick is atomic: either
    /// the snake moves (growing or not), or the state transitions to
    /// `GameOver` with the board untouched.
    pub fn step(&mut self, state: &mut GameState) -> StepOutcome {
        if state.status != GameStatus::Playing {
            return StepOutcome::noop();
        }

        // One consistent read of the requested direction for the whole
        // tick; an exact reversal of the applied direction is ignored,
        // not queued.
        let requested = state.requested_direction;
        let direction = if requested.is_opposite(state.applied_direction) {
            state.applied_direction
        } else {
            requested
        };
        state.applied_direction = direction;

        let new_head = state.snake.head().stepped(direction);

        if !state.in_bounds(new_head) {
            state.ticks += 1;
            state.end(EndCause::Wall);
            return StepOutcome {
                ate_food: false,
                ended: Some(EndCause::Wall),
            };
        }

        let ate_food = new_head == state.food;

        if state.snake.would_bite(new_head, ate_food) {
            state.ticks += 1;
            state.end(EndCause::SelfBite);
            return StepOutcome {
                ate_food: false,
                ended: Some(EndCause::SelfBite),
            };
        }

        state.snake.advance(new_head, ate_food);
        state.ticks += 1;

        if ate_food {
            state.score += self.config.food_points;
            state.tick_interval = speed::next_interval(state.tick_interval, true, &self.config);

            match self.place_food(&state.snake) {
                Some(food) => state.food = food,
                None => {
                    // The snake owns every cell; nothing left to eat.
                    state.end(EndCause::BoardFull);
                    return StepOutcome {
                        ate_food: true,
                        ended: Some(EndCause::BoardFull),
                    };
                }
            }
        }

        StepOutcome {
            ate_food,
            ended: None,
        }
    }

    /// Pick a random free cell for food, or `None` if the snake covers the
    /// whole grid.
    ///
    /// Rejection sampling with a bounded attempt count; a dense board falls
    /// back to choosing among the free cells directly, so the loop cannot
    /// spin forever.
    fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let side = self.config.grid_size as i32;
        let cells = self.config.grid_size * self.config.grid_size;
        if snake.len() >= cells {
            return None;
        }

        let max_attempts = cells * 4;
        for _ in 0..max_attempts {
            let pos = Position::new(self.rng.gen_range(0..side), self.rng.gen_range(0..side));
            if !snake.contains(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..side)
            .flat_map(|y| (0..side).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.contains(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn playing_engine(config: GameConfig) -> (GameEngine, GameState) {
        let mut engine = GameEngine::with_seed(config, 7);
        let mut state = engine.new_game();
        state.status = GameStatus::Playing;
        (engine, state)
    }

    #[test]
    fn test_new_game_state() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 7);
        let state = engine.new_game();

        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.tick_interval, Duration::from_millis(150));
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_step_is_noop_unless_playing() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 7);
        let mut state = engine.new_game();
        let before = state.clone();

        let outcome = engine.step(&mut state);

        assert_eq!(outcome, StepOutcome::noop());
        assert_eq!(state, before);
    }

    #[test]
    fn test_basic_movement_keeps_length() {
        let (mut engine, mut state) = playing_engine(GameConfig::default());
        state.food = Position::new(0, 0);
        let initial_head = state.snake.head();

        let outcome = engine.step(&mut state);

        assert!(outcome.ended.is_none());
        assert!(!outcome.ate_food);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), initial_head.stepped(Direction::Up));
        assert_eq!(state.ticks, 1);
    }

    #[test]
    fn test_growth_scenario() {
        // Snake [(10,10),(10,11),(10,12)] heading up with food at (10,9):
        // one tick grows it to 4, scores a point and tightens the clock.
        let (mut engine, mut state) = playing_engine(GameConfig::default());
        state.food = Position::new(10, 9);

        let outcome = engine.step(&mut state);

        assert!(outcome.ate_food);
        assert!(outcome.ended.is_none());
        assert_eq!(
            state.snake.segments(),
            &[
                Position::new(10, 9),
                Position::new(10, 10),
                Position::new(10, 11),
                Position::new(10, 12),
            ]
        );
        assert_eq!(state.score, 1);
        assert_eq!(state.tick_interval, Duration::from_millis(148));
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_wall_collision_leaves_snake_unchanged() {
        let (mut engine, mut state) = playing_engine(GameConfig::small());
        state.snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        state.requested_direction = Direction::Left;
        state.applied_direction = Direction::Left;
        state.food = Position::new(8, 8);
        let snake_before = state.snake.clone();

        let outcome = engine.step(&mut state);

        assert_eq!(outcome.ended, Some(EndCause::Wall));
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.end_cause, Some(EndCause::Wall));
        assert_eq!(state.snake, snake_before);
    }

    #[test]
    fn test_self_collision() {
        let (mut engine, mut state) = playing_engine(GameConfig::small());
        // A length-5 snake turning through a 2x2 loop bites a segment that
        // does not vacate in time.
        state.snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        state.requested_direction = Direction::Right;
        state.applied_direction = Direction::Right;
        state.food = Position::new(8, 8);

        engine.step(&mut state); // (6,5)
        state.requested_direction = Direction::Down;
        engine.step(&mut state); // (6,6)
        state.requested_direction = Direction::Left;
        engine.step(&mut state); // (5,6)
        state.requested_direction = Direction::Up;
        let outcome = engine.step(&mut state); // (5,5) is still body

        assert_eq!(outcome.ended, Some(EndCause::SelfBite));
        assert_eq!(state.end_cause, Some(EndCause::SelfBite));
    }

    #[test]
    fn test_stepping_into_vacating_tail_is_safe() {
        let (mut engine, mut state) = playing_engine(GameConfig::small());
        // A 2x2 loop: head (5,5), body (4,5) (4,6) (5,6); turning down then
        // left chases the tail, which always vacates in time.
        state.snake = Snake::new(Position::new(5, 6), Direction::Up, 1);
        state.snake.advance(Position::new(4, 6), true);
        state.snake.advance(Position::new(4, 5), true);
        state.snake.advance(Position::new(5, 5), true);
        state.requested_direction = Direction::Down;
        state.applied_direction = Direction::Right;
        state.food = Position::new(8, 8);

        let outcome = engine.step(&mut state);

        assert!(outcome.ended.is_none());
        assert_eq!(state.snake.head(), Position::new(5, 6));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_reversal_is_ignored_not_queued() {
        let (mut engine, mut state) = playing_engine(GameConfig::default());
        state.food = Position::new(0, 0);
        let head = state.snake.head();

        // Heading up; a down request must not apply
        state.requested_direction = Direction::Down;
        engine.step(&mut state);

        assert_eq!(state.applied_direction, Direction::Up);
        assert_eq!(state.snake.head(), head.stepped(Direction::Up));
    }

    #[test]
    fn test_reversal_check_uses_applied_direction() {
        let (mut engine, mut state) = playing_engine(GameConfig::default());
        state.food = Position::new(0, 0);

        // Between two ticks the player mashes left-then-down; only the
        // latest request matters and it is legal relative to Up.
        state.requested_direction = Direction::Left;
        state.requested_direction = Direction::Down;
        engine.step(&mut state);
        assert_eq!(state.applied_direction, Direction::Up);

        // Once heading up is re-applied, a left turn goes through.
        state.requested_direction = Direction::Left;
        engine.step(&mut state);
        assert_eq!(state.applied_direction, Direction::Left);
    }

    #[test]
    fn test_exactly_one_outcome_per_tick() {
        let (mut engine, mut state) = playing_engine(GameConfig::small());

        for _ in 0..200 {
            let len_before = state.snake.len();
            let outcome = engine.step(&mut state);

            match (outcome.ate_food, outcome.ended) {
                (_, Some(_)) => break,
                (true, None) => assert_eq!(state.snake.len(), len_before + 1),
                (false, None) => assert_eq!(state.snake.len(), len_before),
            }
        }
    }

    #[test]
    fn test_food_never_on_snake() {
        let config = GameConfig::new(4);
        let mut engine = GameEngine::with_seed(config, 21);
        // Snake fills most of a tiny grid; every placement must still land
        // on a free cell.
        let mut snake = Snake::new(Position::new(0, 0), Direction::Up, 1);
        for x in 1..4 {
            snake.advance(Position::new(x, 0), true);
        }
        for x in (0..4).rev() {
            snake.advance(Position::new(x, 1), true);
        }
        for x in 0..4 {
            snake.advance(Position::new(x, 2), true);
        }

        for _ in 0..50 {
            let food = engine.place_food(&snake).unwrap();
            assert!(!snake.contains(food));
        }
    }

    #[test]
    fn test_full_board_yields_no_food() {
        let config = GameConfig::new(4);
        let mut engine = GameEngine::with_seed(config, 3);
        // Serpentine filling the entire grid
        let mut snake = Snake::new(Position::new(0, 0), Direction::Up, 1);
        for x in 1..4 {
            snake.advance(Position::new(x, 0), true);
        }
        for x in (0..4).rev() {
            snake.advance(Position::new(x, 1), true);
        }
        for x in 0..4 {
            snake.advance(Position::new(x, 2), true);
        }
        for x in (0..4).rev() {
            snake.advance(Position::new(x, 3), true);
        }

        assert_eq!(snake.len(), 16);
        assert_eq!(engine.place_food(&snake), None);
    }

    #[test]
    fn test_eating_last_cell_ends_the_game() {
        let config = GameConfig {
            grid_size: 4,
            initial_snake_length: 1,
            ..GameConfig::default()
        };
        let mut engine = GameEngine::with_seed(config, 3);
        let mut state = engine.new_game();
        state.status = GameStatus::Playing;

        // Serpentine covering all but (0,0), head ending at (1,0) and food
        // on the one free cell.
        let mut snake = Snake::new(Position::new(0, 3), Direction::Up, 1);
        for x in 1..4 {
            snake.advance(Position::new(x, 3), true);
        }
        for x in (0..4).rev() {
            snake.advance(Position::new(x, 2), true);
        }
        for x in 0..4 {
            snake.advance(Position::new(x, 1), true);
        }
        snake.advance(Position::new(3, 0), true);
        for x in (1..3).rev() {
            snake.advance(Position::new(x, 0), true);
        }
        state.snake = snake;
        state.food = Position::new(0, 0);
        state.requested_direction = Direction::Left;
        state.applied_direction = Direction::Left;

        let outcome = engine.step(&mut state);

        assert!(outcome.ate_food);
        assert_eq!(outcome.ended, Some(EndCause::BoardFull));
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.snake.len(), 16);
    }
}
