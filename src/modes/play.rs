use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::time::interval;
use tracing::info;

use super::speed::Speed;
use super::terminal::{FRAME_INTERVAL, Tui, cleanup_terminal, setup_terminal};
use crate::driver::{DriverConfig, FrameDriver, FrameReport, ManualSteering};
use crate::game::{Control, GameConfig, GameEngine, GameState, GameStatus, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{HeaderInfo, Renderer};

/// Keyboard-controlled game
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    driver: FrameDriver,
    steering: ManualSteering,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    speed: Speed,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, driver: DriverConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let speed = Speed::Normal;
        engine.set_tick_interval(speed.frames_per_tick());
        let state = engine.reset();

        Self {
            engine,
            state,
            // one tick per due frame; the keyboard cannot keep up with more
            driver: FrameDriver::new(DriverConfig {
                ticks_per_frame: 1,
                ..driver
            }),
            steering: ManualSteering::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            speed,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.run_game_loop(&mut terminal).await;
        cleanup_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "play session ended"
        );
        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Simulate and render one frame
                _ = frame_timer.tick() => {
                    let report = self.driver.frame(&mut self.engine, &mut self.state, &mut self.steering);
                    self.record(&report);
                    self.metrics.on_frame();
                    self.metrics.update();

                    let snapshot = Snapshot::capture(&self.state, self.metrics.fps());
                    let header = HeaderInfo {
                        mode: "Manual".to_string(),
                        speed: self.speed.level(),
                        detail: Some(format!("Time: {}", self.metrics.format_time())),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, &header);
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
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.apply_key(self.input_handler.handle_key_event(key));
        }
    }

    fn apply_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => {
                if self.state.is_playing() {
                    self.steering.push(direction);
                }
            }
            KeyAction::Control(control) => self.apply_control(control),
            KeyAction::Speed(level) => {
                if let Some(speed) = Speed::from_level(level) {
                    self.speed = speed;
                    self.engine.set_tick_interval(speed.frames_per_tick());
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn apply_control(&mut self, control: Control) {
        let was_over = self.state.is_over();
        self.engine.apply_control(&mut self.state, control);

        if was_over && self.state.status == GameStatus::Playing {
            self.steering.clear();
            self.driver.reset_episode();
            self.metrics.on_game_start();
        }
    }

    fn record(&mut self, report: &FrameReport) {
        for episode in &report.finished {
            self.metrics.on_game_over(episode.score);
        }
    }
}
