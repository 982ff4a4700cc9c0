//! Fixed-step stepping decoupled from rendering
//!
//! The [`FrameDriver`] is called once per rendered frame. It consults the tick
//! gate and, when a tick is due, asks a [`Steering`] implementation for a decision
//! and applies it, `ticks_per_frame` times over.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::{Direction, GameEngine, GameState, TickResult};

/// What the steering wants done this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Move(Direction),
    /// End the episode without moving
    Fail,
}

/// Result of applying a [`Decision`], reported back to the steering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Tick(TickResult),
    PolicyFailure,
}

impl StepOutcome {
    pub fn is_fatal(&self) -> bool {
        match self {
            StepOutcome::Tick(result) => result.is_fatal(),
            StepOutcome::PolicyFailure => true,
        }
    }
}

/// Source of movement decisions: the keyboard or a policy
pub trait Steering {
    /// Decide the next move; only called while the game is playing
    fn decide(&mut self, state: &GameState) -> Decision;

    /// Learn how the last decision turned out
    fn observe(&mut self, _outcome: StepOutcome) {}

    /// Override for the driver's ticks per frame
    fn ticks_per_frame(&self) -> Option<usize> {
        None
    }
}

/// Steering from queued key presses
///
/// Presses are kept in order so that two quick turns land on consecutive ticks.
#[derive(Debug, Clone, Default)]
pub struct ManualSteering {
    pending: VecDeque<Direction>,
}

impl ManualSteering {
    const MAX_QUEUED: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, direction: Direction) {
        if self.pending.back() == Some(&direction) {
            return;
        }
        if self.pending.len() == Self::MAX_QUEUED {
            self.pending.pop_front();
        }
        self.pending.push_back(direction);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Steering for ManualSteering {
    fn decide(&mut self, state: &GameState) -> Decision {
        let heading = state.snake.heading;
        while let Some(direction) = self.pending.pop_front() {
            if !heading.is_opposite(direction) {
                return Decision::Move(direction);
            }
        }
        Decision::Move(heading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Ticks per due frame unless the steering overrides it
    pub ticks_per_frame: usize,
    /// Start a new episode as soon as one ends
    pub auto_restart: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ticks_per_frame: 1,
            auto_restart: false,
        }
    }
}

/// One finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub score: usize,
    pub ticks: u32,
    pub reward: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub ticks: usize,
    pub growths: usize,
    pub restarts: usize,
    pub finished: Vec<EpisodeSummary>,
}

pub struct FrameDriver {
    config: DriverConfig,
    episode_reward: f32,
}

impl FrameDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            episode_reward: 0.0,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn set_ticks_per_frame(&mut self, ticks: usize) {
        self.config.ticks_per_frame = ticks.max(1);
    }

    /// Reward collected so far in the running episode
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Forget the running episode's reward, e.g. after a manual restart
    pub fn reset_episode(&mut self) {
        self.episode_reward = 0.0;
    }

    /// Advance one rendered frame
    pub fn frame<S: Steering + ?Sized>(
        &mut self,
        engine: &mut GameEngine,
        state: &mut GameState,
        steering: &mut S,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        if state.is_over() && self.config.auto_restart {
            self.restart(engine, state, &mut report);
        }

        if !engine.advance_frame(state) {
            return report;
        }

        let ticks = steering
            .ticks_per_frame()
            .unwrap_or(self.config.ticks_per_frame)
            .max(1);

        for _ in 0..ticks {
            if state.is_over() {
                if !self.config.auto_restart {
                    break;
                }
                self.restart(engine, state, &mut report);
            }
            if !state.is_playing() {
                break;
            }

            let outcome = match steering.decide(state) {
                Decision::Move(direction) => {
                    let result = engine.tick(state, direction);
                    self.episode_reward += result.reward(engine.config());
                    if result == TickResult::Grew {
                        report.growths += 1;
                    }
                    StepOutcome::Tick(result)
                }
                Decision::Fail => {
                    debug!(score = state.score(), "policy ended the episode");
                    engine.end_episode(state);
                    self.episode_reward += engine.config().death_penalty;
                    StepOutcome::PolicyFailure
                }
            };

            report.ticks += 1;
            steering.observe(outcome);

            if outcome.is_fatal() {
                report.finished.push(EpisodeSummary {
                    score: state.score(),
                    ticks: state.ticks,
                    reward: self.episode_reward,
                });
                self.episode_reward = 0.0;
            }
        }

        report
    }

    fn restart(&mut self, engine: &mut GameEngine, state: &mut GameState, report: &mut FrameReport) {
        engine.restart(state);
        self.episode_reward = 0.0;
        report.restarts += 1;
    }
}
