use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{GameConfig, SimulationEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven play in the terminal
pub struct HumanMode {
    engine: SimulationEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = SimulationEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(seed = self.engine.seed(), "Starting human mode");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                if self.engine.request_direction_change(direction) {
                    debug!(?direction, "Turn accepted");
                }
            }
            KeyAction::Restart => {
                // Restarting is only offered from the game-over screen.
                if self.engine.state().game_over {
                    self.reset_game();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        let tick = self.engine.tick();
        self.metrics.on_tick(tick.event, tick.state.score);
    }

    fn reset_game(&mut self) {
        self.engine.restart();
        self.metrics.on_game_start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Phase};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn seeded_mode() -> HumanMode {
        HumanMode::new(GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = seeded_mode();
        assert_eq!(mode.engine.state().phase(), Phase::AwaitingFirstInput);
        assert_eq!(mode.engine.state().score, 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            columns: 0,
            ..GameConfig::default()
        };
        assert!(HumanMode::new(config).is_err());
    }

    #[test]
    fn test_key_press_turns_snake() {
        let mut mode = seeded_mode();

        mode.handle_event(key(KeyCode::Char('d'), KeyEventKind::Release));
        assert_eq!(mode.engine.state().direction, None);

        mode.handle_event(key(KeyCode::Char('d'), KeyEventKind::Press));
        assert_eq!(mode.engine.state().direction, Some(Direction::Right));

        mode.handle_event(key(KeyCode::Left, KeyEventKind::Press));
        assert_eq!(mode.engine.state().direction, Some(Direction::Right));
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut mode = seeded_mode();
        mode.handle_event(key(KeyCode::Up, KeyEventKind::Press));
        mode.update_game();
        assert_eq!(mode.engine.state().steps, 1);

        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(mode.engine.state().steps, 1);

        // Head starts on row 5, so six moves up leave the board.
        for _ in 0..5 {
            mode.update_game();
        }
        assert!(mode.engine.state().game_over);
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(mode.engine.state().phase(), Phase::AwaitingFirstInput);
        assert!(mode.metrics.clock_running);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = seeded_mode();
        mode.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press));
        assert!(mode.should_quit);
    }
}
