//! Headless training
//!
//! Runs the policy controller against the game as fast as possible: random
//! exploration collects samples until the exploration budget is spent, the
//! predictor is fitted, the trained weights are saved, and then a number of
//! evaluation episodes measure how well the learned policy steers.
//!
//! # Example
//!
//! ```rust,ignore
//! use neuro_snake::modes::{TrainConfig, TrainMode};
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(20, PathBuf::from("models/policy.json"));
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::driver::{DriverConfig, EpisodeSummary, FrameDriver, FrameReport};
use crate::game::{GameConfig, GameEngine, GameState};
use crate::metrics::TrainingStats;
use crate::policy::{
    DefaultPredictor, PolicyController, PolicyMode, TrainerConfig, default_device, save_policy,
};

/// Episodes kept for rolling averages
const STATS_WINDOW: usize = 100;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Evaluation episodes played with the trained policy
    pub episodes: usize,

    /// Where the trained policy is written
    pub output: PathBuf,

    pub game: GameConfig,

    pub trainer: TrainerConfig,

    /// Evaluation episodes are cut off after this many ticks
    ///
    /// A policy that never turns into itself would otherwise wrap forever.
    pub max_episode_ticks: u32,

    /// Log progress every N episodes
    pub log_frequency: usize,
}

impl TrainConfig {
    pub fn new(episodes: usize, output: PathBuf) -> Self {
        Self {
            episodes,
            output,
            game: GameConfig::default(),
            trainer: TrainerConfig::default(),
            max_episode_ticks: 2000,
            log_frequency: 100,
        }
    }
}

pub struct TrainMode {
    engine: GameEngine,
    state: GameState,
    driver: FrameDriver,
    controller: PolicyController<DefaultPredictor>,
    exploration_stats: TrainingStats,
    evaluation_stats: TrainingStats,
    config: TrainConfig,
}

impl TrainMode {
    pub fn new(config: TrainConfig) -> Result<Self> {
        // headless: every frame is due
        let game = GameConfig {
            tick_interval: 1,
            ..config.game.clone()
        };
        let mut engine = GameEngine::new(game);
        let state = engine.reset();

        let predictor = DefaultPredictor::new(config.trainer.clone(), default_device());
        let controller = PolicyController::new(predictor, config.trainer.clone())
            .context("Failed to set up policy controller")?;

        Ok(Self {
            engine,
            state,
            driver: FrameDriver::new(DriverConfig {
                ticks_per_frame: 1,
                auto_restart: true,
            }),
            controller,
            exploration_stats: TrainingStats::new(STATS_WINDOW),
            evaluation_stats: TrainingStats::new(STATS_WINDOW),
            config,
        })
    }

    /// Explore, train, save, evaluate
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        self.explore()?;
        self.save()?;

        println!();
        println!("Evaluating trained policy over {} episodes", self.config.episodes);
        for episode in 0..self.config.episodes {
            let summary = self.evaluate_episode();
            self.evaluation_stats.record_episode(&summary);

            if (episode + 1) % self.config.log_frequency.max(1) == 0 {
                self.print_progress(episode + 1);
            }
        }

        println!("\nTraining complete!");
        println!("Policy saved to: {:?}", self.config.output);
        println!("\nExploration:");
        println!("{}", self.exploration_stats.format_summary());
        println!("\nEvaluation:");
        println!("{}", self.evaluation_stats.format_summary());

        Ok(())
    }

    pub fn exploration_stats(&self) -> &TrainingStats {
        &self.exploration_stats
    }

    pub fn evaluation_stats(&self) -> &TrainingStats {
        &self.evaluation_stats
    }

    pub fn controller(&self) -> &PolicyController<DefaultPredictor> {
        &self.controller
    }

    /// Drive exploration until the controller has trained and switched over
    fn explore(&mut self) -> Result<()> {
        while self.controller.mode() == PolicyMode::Exploration {
            let report = self
                .driver
                .frame(&mut self.engine, &mut self.state, &mut self.controller);
            self.record_exploration(&report);
        }

        let report = self
            .controller
            .last_report()
            .copied()
            .ok_or_else(|| anyhow!("Exploration collected no usable training samples"))?;
        self.exploration_stats.record_training(report);

        println!(
            "Trained on {} samples in {} epochs (error {:.4}{})",
            report.samples,
            report.epochs,
            report.final_error,
            if report.converged { ", converged" } else { "" },
        );

        Ok(())
    }

    fn record_exploration(&mut self, report: &FrameReport) {
        for episode in &report.finished {
            self.exploration_stats.record_episode(episode);

            let total = self.exploration_stats.total_episodes();
            if total % self.config.log_frequency.max(1) == 0 {
                info!(
                    episodes = total,
                    decisions = self.controller.decisions(),
                    samples = self.controller.samples().len(),
                    "exploring"
                );
            }
        }
    }

    fn save(&self) -> Result<()> {
        let snapshot = self
            .controller
            .predictor()
            .snapshot()
            .context("Failed to export trained weights")?;
        save_policy(&snapshot, &self.config.output)
            .with_context(|| format!("Failed to save policy to {:?}", self.config.output))?;

        info!(path = ?self.config.output, "policy saved");
        Ok(())
    }

    /// Play one episode with the trained policy, up to the tick cap
    fn evaluate_episode(&mut self) -> EpisodeSummary {
        self.engine.restart(&mut self.state);
        self.driver.reset_episode();

        loop {
            let report = self
                .driver
                .frame(&mut self.engine, &mut self.state, &mut self.controller);
            if let Some(summary) = report.finished.first() {
                return *summary;
            }

            if self.state.ticks >= self.config.max_episode_ticks {
                debug!(score = self.state.score(), "evaluation episode hit the tick cap");
                return EpisodeSummary {
                    score: self.state.score(),
                    ticks: self.state.ticks,
                    reward: self.driver.episode_reward(),
                };
            }
        }
    }

    fn print_header(&self) {
        let trainer = &self.config.trainer;
        println!("{}", "=".repeat(70));
        println!("Policy Training - Neuro Snake");
        println!("{}", "=".repeat(70));
        println!("Grid: {0}x{0}", self.config.game.grid_size);
        println!("Sensors: {:?}", trainer.sensor_layout);
        println!("Exploration: {} decisions", trainer.exploration_ticks);
        println!("Edge is fatal: {}", trainer.edge_is_fatal);
        println!("Network:");
        println!("  Hidden units: {}", trainer.hidden_size);
        println!("  Learning rate: {}", trainer.learning_rate);
        println!("  Max epochs: {}", trainer.epochs);
        println!("  Error threshold: {}", trainer.error_threshold);
        println!("Evaluation: {} episodes, capped at {} ticks", self.config.episodes, self.config.max_episode_ticks);
        println!("Save path: {:?}", self.config.output);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] {}",
            episode,
            self.config.episodes,
            self.evaluation_stats.format_summary()
        );
    }
}
