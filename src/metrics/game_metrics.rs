use std::time::{Duration, Instant};

/// Frame rate shown in the header is refreshed once per this many frames
const FPS_SAMPLE_FRAMES: u32 = 10;

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: usize,
    pub games_played: u32,
    last_frame: Option<Instant>,
    frames_since_sample: u32,
    instant_fps: f32,
    displayed_fps: f32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            last_frame: None,
            frames_since_sample: 0,
            instant_fps: 0.0,
            displayed_fps: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Record a rendered frame at the current time
    pub fn on_frame(&mut self) {
        self.on_frame_at(Instant::now());
    }

    pub fn on_frame_at(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            let dt = now.saturating_duration_since(last).as_secs_f32();
            if dt > 0.0 {
                self.instant_fps = 1.0 / dt;
            }
        }
        self.last_frame = Some(now);

        self.frames_since_sample += 1;
        if self.frames_since_sample >= FPS_SAMPLE_FRAMES {
            self.frames_since_sample = 0;
            self.displayed_fps = self.instant_fps;
        }
    }

    /// Frame rate as shown to the player, refreshed every few frames
    pub fn fps(&self) -> f32 {
        self.displayed_fps
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: usize) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10);
        metrics.on_game_over(5);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.high_score, 15);
    }

    #[test]
    fn test_fps_refreshes_every_ten_frames() {
        let mut metrics = GameMetrics::new();
        let start = Instant::now();

        for frame in 0..9 {
            metrics.on_frame_at(start + Duration::from_millis(20 * frame));
        }
        assert_eq!(metrics.fps(), 0.0);

        metrics.on_frame_at(start + Duration::from_millis(180));
        assert!((metrics.fps() - 50.0).abs() < 0.5, "fps {}", metrics.fps());

        // faster frames only show up at the next refresh
        metrics.on_frame_at(start + Duration::from_millis(190));
        assert!((metrics.fps() - 50.0).abs() < 0.5);
    }
}
