//! The game state machine: Idle -> Playing -> GameOver -> Playing.
//!
//! `GameSession` owns the engine, the current game state and the high
//! score, and is the only thing that talks to the storage port. The app
//! layer feeds it start/restart intents, direction requests and timer
//! ticks; it never reaches into game internals itself.

use crate::game::{Direction, GameConfig, GameEngine, GameState, GameStatus, StepOutcome};
use crate::storage::ScoreStore;
use std::time::Duration;
use tracing::{debug, warn};

pub struct GameSession {
    engine: GameEngine,
    state: GameState,
    high_score: u32,
    store: Box<dyn ScoreStore>,
}

impl GameSession {
    /// Create a session, loading the persisted high score. A failed read
    /// degrades to zero rather than refusing to start.
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Self {
        Self::with_engine(GameEngine::new(config), store)
    }

    pub fn with_engine(mut engine: GameEngine, mut store: Box<dyn ScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(Some(score)) => score,
            Ok(None) => 0,
            Err(err) => {
                warn!("failed to load high score, starting from 0: {err:#}");
                0
            }
        };

        let state = engine.new_game();

        Self {
            engine,
            state,
            high_score,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_playing(&self) -> bool {
        self.state.status == GameStatus::Playing
    }

    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    /// Start a game from Idle, or restart from GameOver. Everything except
    /// the high score is rebuilt from scratch; while Playing this is a
    /// no-op.
    pub fn start(&mut self) {
        if self.is_playing() {
            return;
        }

        let mut state = self.engine.new_game();
        if state.status == GameStatus::Idle {
            state.status = GameStatus::Playing;
        }
        self.state = state;
        debug!("game started");
    }

    /// Record a direction intent. Only the most recent request before a
    /// tick matters; reversals are filtered inside the engine, not here.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.is_playing() {
            self.state.requested_direction = direction;
        }
    }

    /// Advance the game one tick. On a terminal outcome the high score is
    /// reconciled and written through the store.
    pub fn advance(&mut self) -> StepOutcome {
        let outcome = self.engine.step(&mut self.state);

        if let Some(cause) = outcome.ended {
            debug!(score = self.state.score, %cause, "game over");
            self.reconcile_high_score();
        }

        outcome
    }

    fn reconcile_high_score(&mut self) {
        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            if let Err(err) = self.store.save(self.high_score) {
                warn!("failed to persist high score: {err:#}");
            }
        }
    }
}
