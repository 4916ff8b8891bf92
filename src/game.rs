use crate::config::RulesConfig;
use crate::food::FoodPlacer;
use crate::grid::Grid;
use crate::pos::{Dir, Pos};
use crate::score::ScoreBoard;
use crate::snake::Snake;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for the first start
    Initial,
    Running,
    /// Frozen until restarted
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single `update` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not running, nothing changed
    Idle,
    Moved,
    Ate,
    Died(Collision),
}

/// Commands the input side may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Dir),
    StartOrRestart,
}

/// Read-only copy of everything a frame needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub snake: Vec<Pos>,
    pub food: Pos,
    pub food_visible: bool,
    pub dir: Dir,
    pub score: u32,
    pub high_score: u32,
    pub state: GameState,
    pub grid: Grid,
}

pub struct Game {
    grid: Grid,
    snake: Snake,
    dir: Dir,
    /// Heading the last `update` moved along; reversal is judged against it.
    moving: Dir,
    food: Pos,
    state: GameState,
    scores: ScoreBoard,
    placer: FoodPlacer,
    start: Pos,
    reject_reversal: bool,
}

impl Game {
    pub fn new(grid: Grid, rules: &RulesConfig, scores: ScoreBoard) -> Self {
        let placer = FoodPlacer::new(rules.avoid_snake_body, rules.rng_seed);
        let mut g = Self {
            grid,
            snake: Snake::default(),
            dir: Dir::Right,
            moving: Dir::Right,
            food: Pos::new(0, 0),
            state: GameState::Initial,
            scores,
            placer,
            start: rules.start,
            reject_reversal: rules.reject_reversal,
        };
        g.place_food();
        g
    }

    fn place_food(&mut self) {
        self.food = self.placer.place(&self.grid, &self.snake);
        debug!(x = self.food.x, y = self.food.y, "food placed");
    }

    /// Swap in a grid for a new viewport. Food is re-placed so it lies inside
    /// the new bounds; everything else is kept.
    pub fn set_grid(&mut self, grid: Grid) {
        if grid != self.grid {
            self.grid = grid;
            self.place_food();
        }
    }

    /// Starts from `Initial` or `GameOver`; ignored while running.
    pub fn start_or_restart(&mut self) -> bool {
        if self.state == GameState::Running {
            return false;
        }
        self.snake.reset(self.spawn_cell());
        self.dir = Dir::Right;
        self.moving = Dir::Right;
        self.scores.reset();
        self.place_food();
        self.state = GameState::Running;
        info!(high_score = self.scores.high_score(), "game started");
        true
    }

    /// The configured start cell, pulled inside the walls when the grid is
    /// too small for it.
    fn spawn_cell(&self) -> Pos {
        let x = self.start.x.clamp(0, (self.grid.cols - 1).max(0));
        let y = self.start.y.clamp(0, (self.grid.rows - 1).max(0));
        let cell = Pos::new(x, y);
        if cell != self.start {
            warn!(
                x = self.start.x,
                y = self.start.y,
                cols = self.grid.cols,
                rows = self.grid.rows,
                "start cell outside the grid, clamped"
            );
        }
        cell
    }

    /// Returns false when the change was rejected as a reversal. Several
    /// turns may arrive within one tick, so the check is against the heading
    /// actually moved along, not the last one requested.
    pub fn set_direction(&mut self, dir: Dir) -> bool {
        if self.reject_reversal && dir == self.moving.opposite() {
            return false;
        }
        self.dir = dir;
        true
    }

    pub fn apply(&mut self, cmd: Command) {
        debug!(?cmd, state = ?self.state, "command");
        match cmd {
            Command::Steer(dir) => {
                self.set_direction(dir);
            }
            Command::StartOrRestart => {
                self.start_or_restart();
            }
        }
    }

    /// Advance one tick.
    ///
    /// The new head is tested against the walls, then against the whole body
    /// as it was before the move, tail included.
    pub fn update(&mut self) -> Step {
        if self.state != GameState::Running {
            return Step::Idle;
        }
        let Some(head) = self.snake.head() else {
            return Step::Idle;
        };
        let new_head = head.step(self.dir);
        self.moving = self.dir;

        let collision = if !self.grid.contains(new_head) {
            Some(Collision::Wall)
        } else if self.snake.contains(new_head) {
            Some(Collision::Body)
        } else {
            None
        };
        if let Some(kind) = collision {
            self.state = GameState::GameOver;
            self.scores.commit();
            info!(?kind, score = self.scores.score(), "game over");
            return Step::Died(kind);
        }

        let ate = new_head == self.food;
        self.snake.advance(new_head, ate);
        if ate {
            self.scores.add_point();
            self.place_food();
            Step::Ate
        } else {
            Step::Moved
        }
    }

    pub fn snapshot(&self, food_visible: bool) -> Snapshot {
        Snapshot {
            snake: self.snake.cells().collect(),
            food: self.food,
            food_visible,
            dir: self.dir,
            score: self.scores.score(),
            high_score: self.scores.high_score(),
            state: self.state,
            grid: self.grid,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn high_score(&self) -> u32 {
        self.scores.high_score()
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }
}
