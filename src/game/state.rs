use super::action::Direction;
use super::board::Board;

/// A position on the board, in tile-aligned pixel coordinates
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

    /// Move position one tile in a direction
    pub fn stepped(&self, direction: Direction, tile_size: u32) -> Self {
        let (dx, dy) = direction.delta();
        let size = tile_size as i32;
        self.moved_by(dx * size, dy * size)
    }
}

/// The snake: a distinguished head followed by trailing body segments,
/// nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub head: Position,
    pub body: Vec<Position>,
}

impl Snake {
    /// Create a head-only snake
    pub fn new(head: Position) -> Self {
        Self {
            head,
            body: Vec::new(),
        }
    }

    /// Head followed by the body
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        std::iter::once(&self.head).chain(self.body.iter())
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.head == pos || self.body.contains(&pos)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Shift every body segment into its predecessor's pre-move position,
    /// then move the head one tile.
    pub fn advance(&mut self, direction: Direction, tile_size: u32) {
        if !self.body.is_empty() {
            // Walk tail to neck so each read happens before its slot is overwritten.
            for i in (1..self.body.len()).rev() {
                self.body[i] = self.body[i - 1];
            }
            self.body[0] = self.head;
        }
        self.head = self.head.stepped(direction, tile_size);
    }

    /// Append a segment to the tail end
    pub fn grow_at(&mut self, pos: Position) {
        self.body.push(pos);
    }

    /// Number of segments, head included
    pub fn len(&self) -> usize {
        self.body.len() + 1
    }

    /// Always false: the head is never removed
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a game stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Collision(CollisionType),
    /// No free tile was left for food after the snake grew
    BoardCleared,
}

/// Engine lifecycle derived from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFirstInput,
    Running,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub snake: Snake,
    /// `None` only after the board has been cleared
    pub food: Option<Position>,
    pub direction: Option<Direction>,
    pub score: u32,
    pub steps: u32,
    pub game_over: bool,
    pub ending: Option<Ending>,
}

impl GameState {
    /// Create a fresh game state: head only, no direction, score zero
    pub fn new(board: Board, head: Position, food: Option<Position>) -> Self {
        Self {
            board,
            snake: Snake::new(head),
            food,
            direction: None,
            score: 0,
            steps: 0,
            game_over: false,
            ending: None,
        }
    }

    /// Check if a position is occupied by the head or any body segment
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Check if a position is within the board bounds
    pub fn is_within_bounds(&self, pos: Position) -> bool {
        self.board.contains(pos)
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.direction.is_none() {
            Phase::AwaitingFirstInput
        } else {
            Phase::Running
        }
    }

    /// Tiles not covered by the snake, row-major
    pub fn free_tiles(&self) -> impl Iterator<Item = Position> + '_ {
        self.board
            .positions()
            .filter(move |pos| !self.is_occupied_by_snake(*pos))
    }

    pub(crate) fn finish(&mut self, ending: Ending) {
        self.game_over = true;
        self.ending = Some(ending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(25, 25, 25).unwrap()
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(125, 125);
        assert_eq!(pos.moved_by(25, 0), Position::new(150, 125));
        assert_eq!(pos.stepped(Direction::Up, 25), Position::new(125, 100));
        assert_eq!(pos.stepped(Direction::Down, 25), Position::new(125, 150));
        assert_eq!(pos.stepped(Direction::Left, 25), Position::new(100, 125));
        assert_eq!(pos.stepped(Direction::Right, 25), Position::new(150, 125));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(125, 125));
        assert_eq!(snake.len(), 1);
        assert!(snake.body.is_empty());
        assert_eq!(snake.segments().count(), 1);
    }

    #[test]
    fn test_advance_shifts_body_in_lock_step() {
        let mut snake = Snake {
            head: Position::new(75, 0),
            body: vec![
                Position::new(50, 0),
                Position::new(25, 0),
                Position::new(0, 0),
            ],
        };

        snake.advance(Direction::Down, 25);

        assert_eq!(snake.head, Position::new(75, 25));
        assert_eq!(
            snake.body,
            vec![
                Position::new(75, 0),
                Position::new(50, 0),
                Position::new(25, 0),
            ]
        );
    }

    #[test]
    fn test_advance_head_only() {
        let mut snake = Snake::new(Position::new(0, 0));
        snake.advance(Direction::Right, 25);
        assert_eq!(snake.head, Position::new(25, 0));
        assert!(snake.body.is_empty());
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake {
            head: Position::new(50, 0),
            body: vec![Position::new(25, 0)],
        };
        assert!(!snake.collides_with_body(Position::new(50, 0)));
        assert!(snake.collides_with_body(Position::new(25, 0)));
        assert!(snake.occupies(Position::new(50, 0)));
        assert!(!snake.occupies(Position::new(250, 250)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(board(), Position::new(125, 125), None);

        assert!(state.is_within_bounds(Position::new(0, 0)));
        assert!(state.is_within_bounds(Position::new(600, 600)));
        assert!(!state.is_within_bounds(Position::new(-25, 0)));
        assert!(!state.is_within_bounds(Position::new(625, 0)));
        assert!(!state.is_within_bounds(Position::new(0, 625)));
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = GameState::new(board(), Position::new(125, 125), None);
        assert_eq!(state.phase(), Phase::AwaitingFirstInput);

        state.direction = Some(Direction::Left);
        assert_eq!(state.phase(), Phase::Running);

        state.finish(Ending::Collision(CollisionType::Wall));
        assert_eq!(state.phase(), Phase::GameOver);
        assert!(state.game_over);
    }

    #[test]
    fn test_free_tiles_exclude_snake() {
        let mut state = GameState::new(
            Board::new(3, 1, 10).unwrap(),
            Position::new(0, 0),
            None,
        );
        state.snake.body.push(Position::new(10, 0));

        let free: Vec<_> = state.free_tiles().collect();
        assert_eq!(free, vec![Position::new(20, 0)]);
    }
}
