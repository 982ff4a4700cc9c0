//! Rolling statistics over exploration and evaluation episodes

use std::collections::VecDeque;

use crate::driver::EpisodeSummary;
use crate::policy::TrainingReport;

/// Training statistics tracker with rolling averages
///
/// Tracks episode-level metrics (rewards, lengths, scores) using rolling windows
/// and remembers the outcome of the last predictor fit.
///
/// # Example
///
/// ```rust
/// use neuro_snake::driver::EpisodeSummary;
/// use neuro_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(&EpisodeSummary { score: 5, ticks: 150, reward: 15.5 });
///
/// assert_eq!(stats.total_episodes(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in ticks (rolling window)
    episode_lengths: VecDeque<u32>,

    /// Episode scores (food eaten) (rolling window)
    episode_scores: VecDeque<usize>,

    best_score: usize,

    total_episodes: usize,

    total_ticks: usize,

    last_training: Option<TrainingReport>,

    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker keeping the last `window_size` episodes for averages
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            best_score: 0,
            total_episodes: 0,
            total_ticks: 0,
            last_training: None,
            window_size,
        }
    }

    pub fn record_episode(&mut self, episode: &EpisodeSummary) {
        Self::push_deque(&mut self.episode_rewards, episode.reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, episode.ticks, self.window_size);
        Self::push_deque(&mut self.episode_scores, episode.score, self.window_size);
        self.best_score = self.best_score.max(episode.score);
        self.total_episodes += 1;
        self.total_ticks += episode.ticks as usize;
    }

    pub fn record_training(&mut self, report: TrainingReport) {
        self.last_training = Some(report);
    }

    /// Forget episode windows, keeping the training record
    pub fn reset_episodes(&mut self) {
        self.episode_rewards.clear();
        self.episode_lengths.clear();
        self.episode_scores.clear();
        self.best_score = 0;
        self.total_episodes = 0;
        self.total_ticks = 0;
    }

    pub fn mean_episode_reward(&self) -> f32 {
        mean(self.episode_rewards.iter().copied())
    }

    pub fn mean_episode_length(&self) -> f32 {
        mean(self.episode_lengths.iter().map(|&ticks| ticks as f32))
    }

    pub fn mean_episode_score(&self) -> f32 {
        mean(self.episode_scores.iter().map(|&score| score as f32))
    }

    pub fn best_score(&self) -> usize {
        self.best_score
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    pub fn last_training(&self) -> Option<&TrainingReport> {
        self.last_training.as_ref()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    ///
    /// ```text
    /// Episodes: 1 | Ticks: 150 | Reward: 15.50 | Score: 5.00 | Best: 5 | Len: 150.0 | Error: 0.0042
    /// ```
    pub fn format_summary(&self) -> String {
        let error = self
            .last_training
            .map(|report| format!("{:.4}", report.final_error))
            .unwrap_or_else(|| "-".to_string());

        format!(
            "Episodes: {} | Ticks: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Error: {}",
            self.total_episodes,
            self.total_ticks,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            error,
        )
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

fn mean(values: impl ExactSizeIterator<Item = f32>) -> f32 {
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f32>() / len as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(reward: f32, ticks: u32, score: usize) -> EpisodeSummary {
        EpisodeSummary {
            score,
            ticks,
            reward,
        }
    }

    #[test]
    fn test_record_episode() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(&episode(10.0, 50, 3));

        assert_eq!(stats.total_episodes(), 1);
        assert_eq!(stats.total_ticks(), 50);
        assert!((stats.mean_episode_reward() - 10.0).abs() < 1e-5);
        assert!((stats.mean_episode_length() - 50.0).abs() < 1e-5);
        assert!((stats.mean_episode_score() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = TrainingStats::new(3);

        stats.record_episode(&episode(1.0, 10, 1));
        stats.record_episode(&episode(2.0, 20, 2));
        stats.record_episode(&episode(3.0, 30, 3));
        assert!((stats.mean_episode_reward() - 2.0).abs() < 1e-5);

        // a 4th episode evicts the first
        stats.record_episode(&episode(4.0, 40, 4));

        assert_eq!(stats.total_episodes(), 4);
        assert!((stats.mean_episode_reward() - 3.0).abs() < 1e-5);
        assert_eq!(stats.total_ticks(), 100);
    }

    #[test]
    fn test_best_score_survives_window() {
        let mut stats = TrainingStats::new(1);
        stats.record_episode(&episode(0.0, 10, 9));
        stats.record_episode(&episode(0.0, 10, 2));

        assert_eq!(stats.best_score(), 9);
        assert!((stats.mean_episode_score() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(&episode(15.5, 150, 5));

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Reward: 15.50"));
        assert!(summary.contains("Error: -"));

        stats.record_training(TrainingReport {
            samples: 10,
            epochs: 4,
            final_error: 0.0042,
            converged: true,
        });
        assert!(stats.format_summary().contains("Error: 0.0042"));
    }

    #[test]
    fn test_reset_keeps_training_record() {
        let mut stats = TrainingStats::new(10);
        stats.record_episode(&episode(1.0, 5, 1));
        stats.record_training(TrainingReport {
            samples: 1,
            epochs: 1,
            final_error: 0.1,
            converged: false,
        });

        stats.reset_episodes();

        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.mean_episode_reward(), 0.0);
        assert!(stats.last_training().is_some());
    }
}
