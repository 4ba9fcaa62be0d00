//! Terminal front end: owns the tokio select loop that wires key events,
//! the tick timer, rendering and the commentary task together.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::commentary::{self, Commentator};
use crate::game::{EndCause, GameConfig};
use crate::input::{InputHandler, KeyIntent};
use crate::render::Renderer;
use crate::session::GameSession;
use crate::storage::ScoreStore;

/// Render at 30 FPS regardless of game speed
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct App {
    session: GameSession,
    renderer: Renderer,
    input_handler: InputHandler,
    commentator: Option<Arc<dyn Commentator>>,
    commentary: Option<String>,
    commentary_tx: mpsc::UnboundedSender<(u64, String)>,
    commentary_rx: mpsc::UnboundedReceiver<(u64, String)>,
    game_seq: u64,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: GameConfig,
        store: Box<dyn ScoreStore>,
        commentator: Option<Arc<dyn Commentator>>,
    ) -> Self {
        let (commentary_tx, commentary_rx) = mpsc::unbounded_channel();

        Self {
            session: GameSession::new(config, store),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            commentator,
            commentary: None,
            commentary_tx,
            commentary_rx,
            game_seq: 0,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor().context("failed to hide cursor")?;
        terminal.clear().context("failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_len = self.session.tick_interval();
        let mut tick_timer = time::interval_at(Instant::now() + tick_len, tick_len);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut render_timer = time::interval(FRAME_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick; the timer is only polled while a game
                // is actually running
                _ = tick_timer.tick(), if self.session.is_playing() => {
                    let outcome = self.session.advance();
                    if let Some(cause) = outcome.ended {
                        self.spawn_commentary(self.session.state().score, cause);
                    }
                }

                // Commentary results; stale ones from a game that has
                // since restarted are dropped
                Some((seq, text)) = self.commentary_rx.recv() => {
                    if seq == self.game_seq {
                        self.commentary = Some(text);
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.session.state(),
                            self.session.high_score(),
                            self.commentary.as_deref(),
                        );
                    }).context("failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Eating food tightens the interval, and a restart resets it;
            // rebuild the timer whenever the session disagrees with it.
            let want = self.session.tick_interval();
            if want != tick_len {
                tick_len = want;
                tick_timer = time::interval_at(Instant::now() + want, want);
                tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyIntent::Steer(direction) => {
                    self.session.request_direction(direction);
                }
                KeyIntent::StartOrRestart => {
                    if !self.session.is_playing() {
                        self.game_seq += 1;
                        self.commentary = None;
                        self.session.start();
                    }
                }
                KeyIntent::Quit => {
                    self.should_quit = true;
                }
                KeyIntent::None => {}
            }
        }
    }

    /// Kick off the commentary fetch for a finished game. Fire-and-forget:
    /// the result comes back over the channel tagged with the game it
    /// belongs to, and a missing or late result leaves the fallback text
    /// on screen.
    fn spawn_commentary(&mut self, score: u32, cause: EndCause) {
        let Some(commentator) = self.commentator.clone() else {
            return;
        };

        let tx = self.commentary_tx.clone();
        let seq = self.game_seq;
        tokio::spawn(async move {
            let text = commentary::fetch(commentator, score, cause).await;
            let _ = tx.send((seq, text));
        });
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("failed to leave alternate screen")?;
        terminal.show_cursor().context("failed to show cursor")?;
        Ok(())
    }
}
