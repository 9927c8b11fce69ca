//! Smoothed frame-rate tracking.

use web_time::Instant;

/// Per-session frame timing with a smoothed FPS estimate.
///
/// Frame timestamps are supplied by the caller (the animation-frame
/// callback's clock) rather than sampled here, so headless sessions can
/// drive time deterministically.
pub struct FrameTiming {
    /// Timestamp of the previous frame, if any frame has run yet.
    last_frame: Option<Instant>,
    /// Smoothed FPS using exponential moving average.
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0).
    smoothing: f32,
    /// Total frames completed.
    frames: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a new frame timer.
    pub fn new() -> Self {
        Self {
            last_frame: None,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Record the end of a frame that started at `now`.
    pub fn end_frame(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            let frame_time = now.saturating_duration_since(last).as_secs_f32();
            if frame_time > 0.0 {
                let instant_fps = 1.0 / frame_time;
                self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                    + instant_fps * self.smoothing;
            }
        }
        self.last_frame = Some(now);
        self.frames += 1;
    }

    /// Current FPS (smoothed).
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Number of frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn counts_frames_and_tracks_rate() {
        let mut timing = FrameTiming::new();
        let start = Instant::now();
        for i in 0..200 {
            timing.end_frame(start + Duration::from_millis(10 * i));
        }
        assert_eq!(timing.frames(), 200);
        // 10ms frames pull the estimate from 60 toward 100
        assert!(timing.fps() > 90.0);
    }
}
