use crate::config::{Config, RulesConfig, TimingConfig};
use crate::driver::GameLoop;
use crate::game::{Command, Game};
use crate::grid::Grid;
use crate::prefs::PreferenceStore;
use crate::render::Renderer;
use crate::score::ScoreBoard;
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Ties the game to the lifetime of a drawable surface.
///
/// The high score is read when the session is built. The game itself needs
/// a grid, so it is created on the first `surface_created`; later surfaces
/// reuse it with a recomputed grid.
pub struct Session {
    rules: RulesConfig,
    timing: TimingConfig,
    scores: Option<ScoreBoard>,
    game: Option<Arc<Mutex<Game>>>,
    running: Option<GameLoop>,
}

impl Session {
    pub fn new(config: &Config, store: Box<dyn PreferenceStore>) -> Self {
        let scores = ScoreBoard::load(store);
        info!(high_score = scores.high_score(), "session ready");
        Self {
            rules: config.rules.clone(),
            timing: config.timing.clone(),
            scores: Some(scores),
            game: None,
            running: None,
        }
    }

    /// Build the grid for a `width` x `height` viewport and start the loop.
    /// A second call while the loop runs only updates the grid.
    pub fn surface_created(&mut self, width: u32, height: u32, renderer: Box<dyn Renderer>) -> Result<()> {
        let grid = Grid::from_viewport(width, height, self.rules.cells_across);
        info!(width, height, cell = grid.cell_size, cols = grid.cols, rows = grid.rows, "surface created");

        let game = if let Some(game) = &self.game {
            game.lock().unwrap_or_else(PoisonError::into_inner).set_grid(grid);
            game.clone()
        } else {
            let scores = self.scores.take().context("score board already handed to a game")?;
            let game = Arc::new(Mutex::new(Game::new(grid, &self.rules, scores)));
            self.game = Some(game.clone());
            game
        };

        if self.running.as_ref().is_some_and(GameLoop::is_running) {
            warn!("game loop already running");
            return Ok(());
        }
        let game_loop = GameLoop::start(game, renderer, self.timing.tick(), self.timing.blink())
            .context("Failed to spawn game loop thread")?;
        self.running = Some(game_loop);
        Ok(())
    }

    /// Stop the loop and wait for it. Safe to call more than once.
    pub fn surface_destroyed(&mut self) {
        if let Some(game_loop) = self.running.take() {
            info!("surface destroyed, stopping game loop");
            game_loop.stop();
        }
    }

    pub fn dispatch(&self, cmd: Command) {
        match &self.game {
            Some(game) => game.lock().unwrap_or_else(PoisonError::into_inner).apply(cmd),
            None => debug!(?cmd, "no game yet, command dropped"),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(GameLoop::is_running)
    }

    pub fn game(&self) -> Option<&Arc<Mutex<Game>>> {
        self.game.as_ref()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.surface_destroyed();
    }
}
