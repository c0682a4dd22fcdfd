use rand::{SeedableRng, rngs::StdRng, seq::IteratorRandom};
use tracing::{debug, info};

use super::{
    action::Direction,
    board::Board,
    config::{ConfigError, GameConfig},
    state::{CollisionType, Ending, GameState, Position},
};

/// What a tick did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing moved: the game is over or no direction has been chosen yet
    Idle,
    /// The snake moved one tile
    Moved,
    /// The snake ate and the score is now `score`
    Ate { score: u32 },
    /// The snake hit a wall or itself; the game is over
    Collided(CollisionType),
    /// The snake ate and filled the last free tile; the game is over
    BoardCleared,
}

/// Result of a tick: the event plus a read-only snapshot for rendering
#[derive(Debug, Clone, Copy)]
pub struct Tick<'a> {
    pub event: TickEvent,
    pub state: &'a GameState,
}

/// The simulation engine. Owns the one live [`GameState`] and is the only
/// thing that mutates it.
pub struct SimulationEngine {
    config: GameConfig,
    board: Board,
    rng: StdRng,
    seed: u64,
    state: GameState,
}

impl SimulationEngine {
    /// Create an engine, seeding food placement from `config.seed` or a
    /// random seed when none is set
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    /// Create an engine with an explicit seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let board = config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let state = Self::fresh_state(&config, board, &mut rng);

        info!(
            columns = board.columns(),
            rows = board.rows(),
            tile_size = board.tile_size(),
            seed,
            "Simulation engine ready"
        );

        Ok(Self {
            config,
            board,
            rng,
            seed,
            state,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the food placement was last seeded with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the random sequence used for food placement
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
        debug!(seed, "Reseeded food placement");
    }

    /// Steer the snake. Reversals and requests made after game over are
    /// dropped. Returns whether the direction was taken.
    pub fn request_direction_change(&mut self, direction: Direction) -> bool {
        if self.state.game_over {
            return false;
        }

        match self.state.direction {
            Some(current) if current.is_opposite(direction) => {
                debug!(?current, requested = ?direction, "Rejected reversal");
                false
            }
            _ => {
                self.state.direction = Some(direction);
                true
            }
        }
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) -> Tick<'_> {
        let event = self.step();
        Tick {
            event,
            state: &self.state,
        }
    }

    /// Throw the current game away and start a fresh one
    pub fn restart(&mut self) -> &GameState {
        self.state = Self::fresh_state(&self.config, self.board, &mut self.rng);
        info!("Game restarted");
        &self.state
    }

    fn step(&mut self) -> TickEvent {
        if self.state.game_over {
            return TickEvent::Idle;
        }
        let Some(direction) = self.state.direction else {
            return TickEvent::Idle;
        };

        self.state.snake.advance(direction, self.board.tile_size());
        self.state.steps += 1;
        let head = self.state.snake.head;

        // Collisions are resolved before food so a fatal move never scores.
        if let Some(collision) = self.check_collision(head) {
            self.state.finish(Ending::Collision(collision));
            info!(
                ?collision,
                score = self.state.score,
                steps = self.state.steps,
                "Game over"
            );
            return TickEvent::Collided(collision);
        }

        if self.state.food != Some(head) {
            return TickEvent::Moved;
        }

        self.state.snake.grow_at(head);
        self.state.score += 1;

        match self.place_food() {
            Some(food) => {
                self.state.food = Some(food);
                debug!(score = self.state.score, ?food, "Food eaten");
                TickEvent::Ate {
                    score: self.state.score,
                }
            }
            None => {
                self.state.food = None;
                self.state.finish(Ending::BoardCleared);
                info!(score = self.state.score, "Board cleared");
                TickEvent::BoardCleared
            }
        }
    }

    /// Check if the head position is a collision
    fn check_collision(&self, head: Position) -> Option<CollisionType> {
        if !self.state.is_within_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a free tile uniformly, or `None` when the snake covers the board
    fn place_food(&mut self) -> Option<Position> {
        self.state.free_tiles().choose(&mut self.rng)
    }

    fn fresh_state(config: &GameConfig, board: Board, rng: &mut StdRng) -> GameState {
        let mut state = GameState::new(board, config.start_position(), None);
        let food = state.free_tiles().choose(rng);
        state.food = food;
        state
    }
}
