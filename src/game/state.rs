use super::direction::Direction;
use std::fmt;
use std::time::Duration;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The adjacent position one cell away in a direction
    pub fn stepped(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake's body, head at index 0.
///
/// The body is never empty and is replaced wholesale by the engine each
/// tick; nothing else mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Create a new snake with the given head, trailing away from `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        Self { body }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Whether moving the head to `new_head` would bite the body.
    ///
    /// When the snake is not growing, the tail cell vacates on the same
    /// tick, so it is excluded from the check. Snakes of length 2 or less
    /// cannot bite themselves: the only candidate cell is the one being
    /// legitimately vacated.
    pub fn would_bite(&self, new_head: Position, will_grow: bool) -> bool {
        if self.body.len() <= 2 {
            return false;
        }
        let to_check = if will_grow {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        to_check.contains(&new_head)
    }

    /// Advance the head to `new_head`, keeping the tail if growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }
}

/// High-level gameplay state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting for the player to start; the tick timer is not running
    Idle,
    /// Tick loop active, input accepted
    Playing,
    /// Terminal; restart input accepted
    GameOver,
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// Ran into the edge of the grid
    Wall,
    /// Ran into the snake's own body
    SelfBite,
    /// The snake filled every cell of the grid
    BoardFull,
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndCause::Wall => "wall",
            EndCause::SelfBite => "self",
            EndCause::BoardFull => "board full",
        };
        f.write_str(text)
    }
}

/// Complete state of one game.
///
/// `requested_direction` is written by the input side at any time;
/// `applied_direction` is written only inside the engine's step, and the
/// reversal check compares against it. Keeping the two apart stops a quick
/// double key-press from slipping an illegal reversal in between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub requested_direction: Direction,
    pub applied_direction: Direction,
    pub status: GameStatus,
    pub score: u32,
    pub tick_interval: Duration,
    pub end_cause: Option<EndCause>,
    pub ticks: u32,
    pub grid_size: usize,
}

impl GameState {
    pub fn new(
        snake: Snake,
        food: Position,
        direction: Direction,
        grid_size: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            requested_direction: direction,
            applied_direction: direction,
            status: GameStatus::Idle,
            score: 0,
            tick_interval,
            end_cause: None,
            ticks: 0,
            grid_size,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_size as i32
            && pos.y >= 0
            && pos.y < self.grid_size as i32
    }

    /// Transition into the terminal state, leaving the board as-is
    pub(crate) fn end(&mut self, cause: EndCause) {
        self.status = GameStatus::GameOver;
        self.end_cause = Some(cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.stepped(Direction::Up), Position::new(5, 4));
        assert_eq!(pos.stepped(Direction::Down), Position::new(5, 6));
    }

    #[test]
    fn test_snake_creation_trails_away_from_heading() {
        let snake = Snake::new(Position::new(10, 10), Direction::Up, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(10, 10));
        assert_eq!(snake.segments()[1], Position::new(10, 11));
        assert_eq!(snake.segments()[2], Position::new(10, 12));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));

        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
    }

    #[test]
    fn test_would_bite_excludes_vacating_tail() {
        // Body: (5,5) (4,5) (3,5); the tail cell is fair game unless growing
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(!snake.would_bite(Position::new(3, 5), false));
        assert!(snake.would_bite(Position::new(3, 5), true));
        assert!(snake.would_bite(Position::new(4, 5), false));
    }

    #[test]
    fn test_would_bite_tolerates_short_snakes() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 2);
        // Only candidate cell is the one being vacated
        assert!(!snake.would_bite(Position::new(4, 5), false));
        assert!(!snake.would_bite(Position::new(4, 5), true));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(8, 8),
            Direction::Right,
            20,
            Duration::from_millis(150),
        );

        assert!(state.in_bounds(Position::new(0, 0)));
        assert!(state.in_bounds(Position::new(19, 19)));
        assert!(!state.in_bounds(Position::new(-1, 0)));
        assert!(!state.in_bounds(Position::new(20, 0)));
        assert!(!state.in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_end_cause_labels() {
        assert_eq!(EndCause::Wall.to_string(), "wall");
        assert_eq!(EndCause::SelfBite.to_string(), "self");
        assert_eq!(EndCause::BoardFull.to_string(), "board full");
    }
}
