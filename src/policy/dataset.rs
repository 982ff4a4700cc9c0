//! Training samples gathered while exploring
//!
//! A decision is recorded as *pending* before the engine moves. It becomes a
//! training sample only once the move survives; a move that ends the episode is
//! discarded so the predictor never learns fatal turns.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One (features, encoded turn) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub input: Vec<f32>,
    pub target: f32,
}

impl TrainingSample {
    pub fn new(input: Vec<f32>, target: f32) -> Self {
        Self { input, target }
    }
}

/// Bounded log of committed samples plus at most one pending decision
#[derive(Debug, Clone)]
pub struct SampleLog {
    samples: VecDeque<TrainingSample>,
    capacity: usize,
    pending: Option<TrainingSample>,
    discarded: usize,
}

impl SampleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
            pending: None,
            discarded: 0,
        }
    }

    /// Hold a decision until its outcome is known
    ///
    /// An unresolved earlier decision is replaced.
    pub fn record(&mut self, input: Vec<f32>, target: f32) {
        self.pending = Some(TrainingSample::new(input, target));
    }

    /// Keep the pending decision; the oldest sample goes once the log is full
    pub fn commit_pending(&mut self) {
        if let Some(sample) = self.pending.take() {
            self.samples.push_back(sample);
            if self.samples.len() > self.capacity {
                self.samples.pop_front();
            }
        }
    }

    pub fn discard_pending(&mut self) {
        if self.pending.take().is_some() {
            self.discarded += 1;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Decisions thrown away because they ended an episode
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<TrainingSample> {
        self.samples.iter().cloned().collect()
    }
}
