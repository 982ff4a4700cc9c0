//! Watch a policy steer the snake
//!
//! With a saved policy the predictor steers from the first tick. Without one
//! (or when it cannot be loaded) the controller explores at full speed, trains
//! inline and then carries on with what it learned, so the whole cycle can be
//! watched live.
//!
//! # Controls
//!
//! - Space / P: Pause/unpause
//! - R: Restart episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use std::path::Path;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::time::interval;
use tracing::{info, warn};

use super::speed::Speed;
use super::terminal::{FRAME_INTERVAL, Tui, cleanup_terminal, setup_terminal};
use crate::driver::{DriverConfig, FrameDriver, FrameReport};
use crate::game::{Control, GameConfig, GameEngine, GameState, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{GameMetrics, TrainingStats};
use crate::policy::{
    DefaultPredictor, PolicyController, PolicyError, PolicyMode, TrainerConfig, default_device,
    load_policy,
};
use crate::render::{HeaderInfo, Renderer};

/// Episodes averaged in the header
const STATS_WINDOW: usize = 20;

pub struct WatchMode {
    engine: GameEngine,
    state: GameState,
    driver: FrameDriver,
    controller: PolicyController<DefaultPredictor>,
    metrics: GameMetrics,
    stats: TrainingStats,
    renderer: Renderer,
    input_handler: InputHandler,
    speed: Speed,
    should_quit: bool,
}

impl WatchMode {
    pub fn new(
        game: GameConfig,
        trainer: TrainerConfig,
        driver: DriverConfig,
        policy_path: Option<&Path>,
    ) -> Result<Self> {
        let controller = match policy_path {
            Some(path) => match Self::load_controller(path, trainer.clone()) {
                Ok(controller) => {
                    info!(path = %path.display(), "loaded trained policy");
                    controller
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "could not load policy, exploring instead");
                    PolicyController::new(DefaultPredictor::new(trainer.clone(), default_device()), trainer)?
                }
            },
            None => PolicyController::new(DefaultPredictor::new(trainer.clone(), default_device()), trainer)?,
        };

        let mut engine = GameEngine::new(game);
        let speed = Speed::VeryFast;
        engine.set_tick_interval(speed.frames_per_tick());
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            driver: FrameDriver::new(DriverConfig {
                auto_restart: true,
                ..driver
            }),
            controller,
            metrics: GameMetrics::new(),
            stats: TrainingStats::new(STATS_WINDOW),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            speed,
            should_quit: false,
        })
    }

    fn load_controller(
        path: &Path,
        trainer: TrainerConfig,
    ) -> Result<PolicyController<DefaultPredictor>, PolicyError> {
        let snapshot = load_policy(path)?;
        let predictor = DefaultPredictor::from_snapshot(&snapshot, trainer.clone(), default_device())?;
        PolicyController::trained(predictor, trainer)
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.run_loop(&mut terminal).await;
        cleanup_terminal(&mut terminal)?;

        info!(summary = %self.stats.format_summary(), "watch session ended");
        result
    }

    async fn run_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event {
                        if key.kind == KeyEventKind::Press {
                            self.apply_key(self.input_handler.handle_key_event(key));
                        }
                    }
                }

                _ = frame_timer.tick() => {
                    self.step_frame();

                    let snapshot = Snapshot::capture(&self.state, self.metrics.fps());
                    let header = self.header();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, &header);
                    }).context("Failed to draw frame")?;
                }

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

    fn step_frame(&mut self) {
        let was_exploring = self.controller.mode() == PolicyMode::Exploration;
        let report = self
            .driver
            .frame(&mut self.engine, &mut self.state, &mut self.controller);
        self.record(&report);

        if was_exploring && self.controller.mode() == PolicyMode::Inference {
            if let Some(report) = self.controller.last_report() {
                self.stats.record_training(*report);
            }
            // exploration episodes say nothing about the trained policy
            self.stats.reset_episodes();
        }

        self.metrics.on_frame();
        self.metrics.update();
    }

    fn record(&mut self, report: &FrameReport) {
        for episode in &report.finished {
            self.metrics.on_game_over(episode.score);
            self.stats.record_episode(episode);
        }
    }

    fn header(&self) -> HeaderInfo {
        let (mode, detail) = match self.controller.mode() {
            PolicyMode::Exploration => (
                "Exploring",
                format!(
                    "Samples: {} | Decisions: {}/{}",
                    self.controller.samples().len(),
                    self.controller.decisions(),
                    self.controller.config().exploration_ticks,
                ),
            ),
            PolicyMode::Inference => {
                let error = self
                    .controller
                    .last_report()
                    .map(|report| format!("Error: {:.4} | ", report.final_error))
                    .unwrap_or_default();
                (
                    "Trained",
                    format!("{}Avg score: {:.2}", error, self.stats.mean_episode_score()),
                )
            }
        };

        HeaderInfo {
            mode: mode.to_string(),
            speed: self.speed.level(),
            detail: Some(detail),
        }
    }

    fn apply_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::Control(Control::Restart) => {
                self.engine.restart(&mut self.state);
                self.driver.reset_episode();
            }
            KeyAction::Control(control) => self.engine.apply_control(&mut self.state, control),
            KeyAction::Speed(level) => {
                if let Some(speed) = Speed::from_level(level) {
                    self.speed = speed;
                    self.engine.set_tick_interval(speed.frames_per_tick());
                }
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Steer(_) | KeyAction::None => {}
        }
    }
}
