use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use super::timers::{ExpiryTimer, Ticker};
use crate::game::{Consumption, Direction, GameConfig, GameEngine, GameState, StepResult};
use crate::input::{ButtonMap, InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::storage::HighScoreStore;

/// Interactive game session in the terminal
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    store: HighScoreStore,
    renderer: Renderer,
    input_handler: InputHandler,
    buttons: ButtonMap,
    ticker: Ticker,
    special_food_timer: ExpiryTimer,
    /// Turn requested since the last tick, applied when the next one starts
    pending_direction: Option<Direction>,
    should_quit: bool,
    needs_redraw: bool,
}

impl HumanMode {
    /// Build a session and load the persisted high score
    ///
    /// Nothing ticks until [`HumanMode::start_game`] (called by `run`).
    pub fn new(config: GameConfig, store: HighScoreStore) -> Self {
        Self::with_engine(GameEngine::new(config), store)
    }

    pub fn with_engine(mut engine: GameEngine, store: HighScoreStore) -> Self {
        let high_score = store.load();
        info!("Loaded high score {high_score} from {:?}", store.path());

        let renderer = Renderer::new(engine.config());
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::with_high_score(high_score),
            store,
            renderer,
            input_handler: InputHandler::new(),
            buttons: ButtonMap::new(),
            ticker: Ticker::stopped(),
            special_food_timer: ExpiryTimer::new(),
            pending_direction: None,
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

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

        self.start_game();

        loop {
            if self.needs_redraw {
                // The clock stops with the game
                if !self.state.is_game_over {
                    self.metrics.update();
                }
                terminal
                    .draw(|frame| {
                        self.buttons = self.renderer.render(frame, &self.state, &self.metrics);
                    })
                    .context("Failed to draw frame")?;
                self.needs_redraw = false;
            }

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
                _ = self.ticker.tick() => {
                    self.update_game();
                }

                // Special food ran out
                id = self.special_food_timer.fired() => {
                    if self.engine.expire_special_food(&mut self.state, id) {
                        self.needs_redraw = true;
                    }
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

        info!(
            "Quitting after {} games, high score {}",
            self.metrics.games_played, self.metrics.high_score
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.input_handler.handle_mouse_event(mouse, &self.buttons),
            Event::Resize(_, _) => {
                self.needs_redraw = true;
                KeyAction::None
            }
            _ => KeyAction::None,
        };

        self.apply(action);
    }

    /// Carry out one input intent
    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                // Checked against the direction of the last move, so several
                // presses within one tick can never add up to a reversal
                if !self.state.is_game_over && !self.state.direction().is_opposite(direction) {
                    self.pending_direction = Some(direction);
                }
            }
            KeyAction::Restart => self.start_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// Start (or restart) a game, whatever state the current one is in
    pub fn start_game(&mut self) {
        self.special_food_timer.cancel();
        self.pending_direction = None;
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.ticker.start(self.state.tick_interval);
        self.needs_redraw = true;
        info!("New game started");
    }

    /// Advance one tick and react to what happened
    pub fn update_game(&mut self) -> StepResult {
        if let Some(direction) = self.pending_direction.take() {
            self.state.change_direction(direction);
        }

        let was_over = self.state.is_game_over;
        let result = self.engine.step(&mut self.state);
        let info = &result.info;

        if let Some(Consumption::SpecialFood(_)) = info.consumed {
            self.special_food_timer.cancel();
        }

        if let Some(id) = info.spawned_special {
            let lifetime = self.engine.config().special_food_lifetime();
            self.special_food_timer.arm(id, lifetime);
        }

        if result.terminated && !was_over {
            self.end_game();
        } else if info.speed_changed {
            self.ticker.reschedule(self.state.tick_interval);
        }

        self.needs_redraw = true;
        result
    }

    /// Stop ticking and record the final score
    fn end_game(&mut self) {
        self.ticker.cancel();
        self.special_food_timer.cancel();

        let score = self.state.score;
        info!(
            "Game over: {} with score {score}",
            self.state.outcome.map(|o| o.describe()).unwrap_or("stopped")
        );

        if self.metrics.on_game_over(score) {
            info!("New high score {score}");
            if let Err(err) = self.store.save(score) {
                warn!("Could not save high score: {err:#}");
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
