//! Policy steering: random exploration first, then the trained predictor
//!
//! While exploring, every decision is a uniformly random relative turn. The
//! features seen and the turn taken are kept as a training sample if the snake
//! survives the move. Once the exploration budget is spent the predictor is
//! trained on those samples and takes over.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, info, warn};

use crate::driver::{Decision, Steering, StepOutcome};
use crate::game::{GameState, TickResult, Turn};

use super::config::TrainerConfig;
use super::dataset::SampleLog;
use super::error::PolicyError;
use super::predictor::{Predictor, TrainingReport};
use super::sensor::sense;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    Exploration,
    Inference,
}

pub struct PolicyController<P: Predictor> {
    predictor: P,
    config: TrainerConfig,
    mode: PolicyMode,
    samples: SampleLog,
    rng: SmallRng,
    /// Exploration decisions taken so far
    decisions: usize,
    last_report: Option<TrainingReport>,
}

impl<P: Predictor> PolicyController<P> {
    /// Start exploring with an untrained predictor
    pub fn new(predictor: P, config: TrainerConfig) -> Result<Self, PolicyError> {
        Self::with_mode(predictor, config, PolicyMode::Exploration)
    }

    /// Steer with an already trained predictor from the first tick
    pub fn trained(predictor: P, config: TrainerConfig) -> Result<Self, PolicyError> {
        Self::with_mode(predictor, config, PolicyMode::Inference)
    }

    fn with_mode(predictor: P, config: TrainerConfig, mode: PolicyMode) -> Result<Self, PolicyError> {
        let expected = config.sensor_layout.input_size();
        if predictor.input_size() != expected {
            return Err(PolicyError::Topology {
                layer: "hidden",
                expected,
                actual: predictor.input_size(),
            });
        }

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Ok(Self {
            predictor,
            samples: SampleLog::new(config.max_samples),
            config,
            mode,
            rng,
            decisions: 0,
            last_report: None,
        })
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    pub fn samples(&self) -> &SampleLog {
        &self.samples
    }

    pub fn decisions(&self) -> usize {
        self.decisions
    }

    pub fn last_report(&self) -> Option<&TrainingReport> {
        self.last_report.as_ref()
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train on the collected samples and switch to inference
    ///
    /// The switch happens even when training fails; the predictor then steers
    /// with whatever weights it has.
    pub fn finish_exploration(&mut self) -> Result<TrainingReport, PolicyError> {
        self.mode = PolicyMode::Inference;
        self.samples.discard_pending();

        info!(
            samples = self.samples.len(),
            discarded = self.samples.discarded(),
            "exploration finished"
        );

        let report = self.predictor.train(&self.samples.to_vec())?;
        self.last_report = Some(report);
        Ok(report)
    }

    fn explore(&mut self, state: &GameState) -> Decision {
        let Some(head) = state.snake.head() else {
            return Decision::Move(state.snake.heading);
        };

        let turn = Turn::ALL[self.rng.gen_range(0..Turn::ALL.len())];
        let direction = state.snake.heading.turned(turn);
        self.decisions += 1;
        self.samples
            .record(sense(state, self.config.sensor_layout), turn.encode());

        if self.config.edge_is_fatal && state.grid.crosses_edge(head, direction) {
            debug!(?head, ?direction, "exploration turn hit the edge");
            return Decision::Fail;
        }

        Decision::Move(direction)
    }

    fn infer(&self, state: &GameState) -> Decision {
        let features = sense(state, self.config.sensor_layout);
        let turn = Turn::decode(self.predictor.predict(&features));
        Decision::Move(state.snake.heading.turned(turn))
    }
}

impl<P: Predictor> Steering for PolicyController<P> {
    fn decide(&mut self, state: &GameState) -> Decision {
        if self.mode == PolicyMode::Exploration && self.decisions >= self.config.exploration_ticks {
            if let Err(err) = self.finish_exploration() {
                warn!(%err, "training failed, steering with the untrained predictor");
            }
        }

        match self.mode {
            PolicyMode::Exploration => self.explore(state),
            PolicyMode::Inference => self.infer(state),
        }
    }

    fn observe(&mut self, outcome: StepOutcome) {
        if self.mode != PolicyMode::Exploration {
            return;
        }
        match outcome {
            StepOutcome::Tick(TickResult::Continued | TickResult::Grew) => {
                self.samples.commit_pending();
            }
            _ => self.samples.discard_pending(),
        }
    }

    fn ticks_per_frame(&self) -> Option<usize> {
        Some(match self.mode {
            PolicyMode::Exploration => self.config.exploration_ticks_per_frame,
            PolicyMode::Inference => self.config.inference_ticks_per_frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverConfig, FrameDriver};
    use crate::game::{Direction, GameConfig, GameEngine, Grid, Position, Snake};
    use crate::policy::dataset::TrainingSample;
    use crate::policy::sensor::SensorLayout;

    /// Predicts a constant and remembers what it was trained on
    struct ConstPredictor {
        value: f32,
        inputs: usize,
        trained_on: usize,
    }

    impl ConstPredictor {
        fn new(value: f32) -> Self {
            Self {
                value,
                inputs: 5,
                trained_on: 0,
            }
        }
    }

    impl Predictor for ConstPredictor {
        fn input_size(&self) -> usize {
            self.inputs
        }

        fn predict(&self, _input: &[f32]) -> f32 {
            self.value
        }

        fn train(&mut self, samples: &[TrainingSample]) -> Result<TrainingReport, PolicyError> {
            if samples.is_empty() {
                return Err(PolicyError::EmptyDataset);
            }
            self.trained_on = samples.len();
            Ok(TrainingReport {
                samples: samples.len(),
                epochs: 1,
                final_error: 0.0,
                converged: true,
            })
        }
    }

    fn config(exploration_ticks: usize) -> TrainerConfig {
        TrainerConfig {
            exploration_ticks,
            seed: Some(3),
            ..Default::default()
        }
    }

    fn state_at(head: Position, heading: Direction) -> GameState {
        GameState::new(Snake::new(head, heading, 3), None, Grid::new(16))
    }

    #[test]
    fn test_rejects_predictor_of_wrong_size() {
        let mut predictor = ConstPredictor::new(0.5);
        predictor.inputs = 4;

        assert!(matches!(
            PolicyController::new(predictor, config(10)),
            Err(PolicyError::Topology { expected: 5, actual: 4, .. })
        ));
    }

    #[test]
    fn test_exploration_never_reverses() {
        let mut controller = PolicyController::new(ConstPredictor::new(0.5), config(1000)).unwrap();
        let state = state_at(Position::new(8, 8), Direction::Right);

        for _ in 0..100 {
            match controller.decide(&state) {
                Decision::Move(direction) => assert_ne!(direction, Direction::Left),
                Decision::Fail => panic!("no edge nearby"),
            }
            controller.observe(StepOutcome::Tick(TickResult::Continued));
        }
        assert_eq!(controller.samples().len(), 100);
    }

    #[test]
    fn test_sample_kept_on_survival() {
        let mut controller = PolicyController::new(ConstPredictor::new(0.5), config(1000)).unwrap();
        let state = state_at(Position::new(8, 8), Direction::Right);

        let Decision::Move(direction) = controller.decide(&state) else {
            panic!("expected a move");
        };
        controller.observe(StepOutcome::Tick(TickResult::Continued));

        let sample = &controller.samples().to_vec()[0];
        let turn = Turn::ALL
            .into_iter()
            .find(|turn| Direction::Right.turned(*turn) == direction)
            .unwrap();
        assert_eq!(sample.target, turn.encode());
        assert_eq!(sample.input, sense(&state, SensorLayout::Relative));
    }

    #[test]
    fn test_sample_dropped_on_death() {
        let mut controller = PolicyController::new(ConstPredictor::new(0.5), config(1000)).unwrap();
        let state = state_at(Position::new(8, 8), Direction::Right);

        controller.decide(&state);
        controller.observe(StepOutcome::Tick(TickResult::SelfCollided));

        assert!(controller.samples().is_empty());
        assert_eq!(controller.samples().discarded(), 1);
    }

    #[test]
    fn test_edge_turns_fail_while_exploring() {
        // heading up in the top-left corner: straight and left both leave the grid
        let mut controller = PolicyController::new(ConstPredictor::new(0.5), config(1000)).unwrap();
        let state = state_at(Position::new(0, 0), Direction::Up);

        let mut failures = 0;
        for _ in 0..60 {
            match controller.decide(&state) {
                Decision::Fail => {
                    failures += 1;
                    controller.observe(StepOutcome::PolicyFailure);
                }
                Decision::Move(direction) => {
                    assert_eq!(direction, Direction::Right);
                    controller.observe(StepOutcome::Tick(TickResult::Continued));
                }
            }
        }

        assert!(failures > 0);
        assert_eq!(controller.samples().len() + controller.samples().discarded(), 60);
        assert!(controller.samples().iter().all(|sample| sample.target == 1.0));
    }

    #[test]
    fn test_edge_rule_can_be_disabled() {
        let config = TrainerConfig {
            edge_is_fatal: false,
            ..config(1000)
        };
        let mut controller = PolicyController::new(ConstPredictor::new(0.5), config).unwrap();
        let state = state_at(Position::new(0, 0), Direction::Up);

        for _ in 0..30 {
            assert_ne!(controller.decide(&state), Decision::Fail);
        }
    }

    #[test]
    fn test_switches_to_inference_after_budget() {
        let mut controller = PolicyController::new(ConstPredictor::new(1.0), config(5)).unwrap();
        let state = state_at(Position::new(8, 8), Direction::Right);

        for _ in 0..5 {
            controller.decide(&state);
            controller.observe(StepOutcome::Tick(TickResult::Continued));
        }
        assert_eq!(controller.mode(), PolicyMode::Exploration);
        assert_eq!(controller.ticks_per_frame(), Some(200));

        // the sixth decision trains first, then follows the predictor (1.0 = right)
        assert_eq!(controller.decide(&state), Decision::Move(Direction::Down));
        assert_eq!(controller.mode(), PolicyMode::Inference);
        assert_eq!(controller.predictor().trained_on, 5);
        assert_eq!(controller.last_report().map(|report| report.samples), Some(5));
        assert_eq!(controller.ticks_per_frame(), Some(1));
    }

    #[test]
    fn test_failed_training_still_switches() {
        let mut controller = PolicyController::new(ConstPredictor::new(0.0), config(0)).unwrap();
        let state = state_at(Position::new(8, 8), Direction::Right);

        assert_eq!(controller.decide(&state), Decision::Move(Direction::Up));
        assert_eq!(controller.mode(), PolicyMode::Inference);
        assert!(controller.last_report().is_none());
    }

    #[test]
    fn test_inference_ignores_edges_and_records_nothing() {
        let mut controller = PolicyController::trained(ConstPredictor::new(0.5), config(0)).unwrap();
        let state = state_at(Position::new(15, 4), Direction::Right);

        assert_eq!(controller.decide(&state), Decision::Move(Direction::Right));
        controller.observe(StepOutcome::Tick(TickResult::Continued));
        assert!(controller.samples().is_empty());
    }

    #[test]
    fn test_drives_a_game_headless() {
        let mut engine = GameEngine::new(GameConfig::new(16).with_seed(11));
        let mut state = engine.reset();
        let mut driver = FrameDriver::new(DriverConfig {
            ticks_per_frame: 1,
            auto_restart: true,
        });
        let mut controller = PolicyController::new(ConstPredictor::new(0.5), config(300)).unwrap();

        let mut episodes = 0;
        for _ in 0..10 {
            episodes += driver.frame(&mut engine, &mut state, &mut controller).finished.len();
        }

        assert_eq!(controller.mode(), PolicyMode::Inference);
        assert!(controller.decisions() >= 300);
        assert!(controller.samples().len() + controller.samples().discarded() <= 300);
        assert!(episodes > 0);
    }
}
