//! Displayed load progress and stage labels.
//!
//! Two numbers are tracked. `actual` is the share of requested resources
//! that have resolved, capped below 100 until the last one lands. The
//! displayed value chases `actual` one frame at a time and is the only
//! number ever published. Once every resource has resolved the display
//! ramps to 100 at a fixed rate and `Loaded` fires exactly once.
//!
//! The displayed value never moves backwards. Resources requested after
//! the first completion are tracked quietly: they do not restart the ramp.

use std::time::Duration;

use web_time::Instant;

use crate::animation::{Rate, Tween};
use crate::options::LoadingOptions;

/// What a [`ProgressTracker::tick`] produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// New displayed percentage, if it changed this frame.
    pub value: Option<u32>,
    /// Set on the single frame the display reached 100.
    pub loaded: bool,
}

/// Counts resources and animates the displayed percentage.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    options: LoadingOptions,
    total: u32,
    loaded: u32,
    actual: u32,
    display: Tween,
    published: Option<u32>,
    finished: bool,
    background: u32,
}

impl ProgressTracker {
    /// Idle tracker.
    #[must_use]
    pub fn new(options: &LoadingOptions) -> Self {
        Self {
            options: options.clone(),
            total: 0,
            loaded: 0,
            actual: 0,
            display: Tween::new(0.0, 0.0, ease(options)),
            published: None,
            finished: false,
            background: 0,
        }
    }

    /// A tracked resource was requested.
    pub fn item_start(&mut self) {
        if self.finished {
            self.background += 1;
            return;
        }
        self.total += 1;
        self.recompute();
    }

    /// A tracked resource resolved, successfully or not.
    pub fn item_end(&mut self) {
        if self.finished {
            self.background = self.background.saturating_sub(1);
            return;
        }
        self.loaded = (self.loaded + 1).min(self.total);
        self.recompute();
    }

    fn recompute(&mut self) {
        if self.total == 0 {
            return;
        }
        let share = self.loaded * 100 / self.total;
        self.actual = share.min(self.options.actual_cap);
    }

    /// Whether every requested resource has resolved.
    #[must_use]
    pub fn all_loaded(&self) -> bool {
        self.total > 0 && self.loaded == self.total
    }

    /// Completion share, capped until every resource resolves.
    #[must_use]
    pub fn actual(&self) -> u32 {
        self.actual
    }

    /// Currently displayed percentage.
    #[must_use]
    pub fn displayed(&self) -> f32 {
        self.display.value()
    }

    /// Whether the display has reached 100.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Resources requested after the display finished and still pending.
    #[must_use]
    pub fn background_pending(&self) -> u32 {
        self.background
    }

    /// Advance the display by one frame.
    pub fn tick(&mut self) -> ProgressUpdate {
        if self.total == 0 || self.finished {
            return ProgressUpdate::default();
        }

        if self.all_loaded() {
            self.display.retarget(100.0);
            self.display.set_rate(Rate::Linear(self.options.finish_step));
            let _ = self.display.step();
        } else {
            let target = self.actual as f32;
            self.display.set_rate(ease(&self.options));
            if target > self.display.value() {
                self.display.retarget(target);
                let _ = self.display.step();
            }
        }

        let shown = (self.display.value().floor() as u32).min(100);
        let mut update = ProgressUpdate::default();
        if self.published != Some(shown) {
            self.published = Some(shown);
            update.value = Some(shown);
        }
        if shown == 100 && self.all_loaded() {
            self.finished = true;
            update.loaded = true;
        }
        update
    }
}

fn ease(options: &LoadingOptions) -> Rate {
    Rate::Ease {
        factor: options.ease_factor,
        min_step: options.min_step,
    }
}

/// Coarse loading phase derived from the displayed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Below the texture threshold.
    LoadingTextures,
    /// Below the lighting threshold.
    PreparingLighting,
    /// Below 100.
    Finalising,
    /// Done.
    Ready,
}

impl LoadStage {
    /// Stage for a displayed percentage.
    #[must_use]
    pub fn from_progress(value: u32, options: &LoadingOptions) -> Self {
        if value < options.textures_below {
            Self::LoadingTextures
        } else if value < options.lighting_below {
            Self::PreparingLighting
        } else if value < 100 {
            Self::Finalising
        } else {
            Self::Ready
        }
    }
}

/// Stage text with the animated finalising ellipsis.
#[derive(Debug, Clone)]
pub struct StageLabel {
    options: LoadingOptions,
    interval: Duration,
    stage: Option<LoadStage>,
    dots: u8,
    last_dot: Option<Instant>,
    text: String,
}

impl StageLabel {
    /// Label with nothing shown yet.
    #[must_use]
    pub fn new(options: &LoadingOptions) -> Self {
        Self {
            options: options.clone(),
            interval: Duration::from_millis(options.dot_interval_ms),
            stage: None,
            dots: 0,
            last_dot: None,
            text: String::new(),
        }
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current stage, once any progress has been shown.
    #[must_use]
    pub fn stage(&self) -> Option<LoadStage> {
        self.stage
    }

    /// Refresh for the displayed value at `now`. Returns the new text when
    /// it changed.
    pub fn update(&mut self, value: u32, now: Instant) -> Option<&str> {
        let stage = LoadStage::from_progress(value, &self.options);

        if self.stage != Some(stage) {
            self.stage = Some(stage);
            self.dots = 0;
            self.last_dot = (stage == LoadStage::Finalising).then_some(now);
        } else if stage == LoadStage::Finalising {
            let last = self.last_dot.unwrap_or(now);
            if now.saturating_duration_since(last) >= self.interval {
                self.dots = (self.dots + 1) % 4;
                self.last_dot = Some(now);
            }
        }

        let text = match stage {
            LoadStage::LoadingTextures => "Loading textures…".to_owned(),
            LoadStage::PreparingLighting => "Preparing lighting…".to_owned(),
            LoadStage::Finalising => {
                format!("Finalising scene{}", ".".repeat(self.dots.max(1).into()))
            }
            LoadStage::Ready => "Ready".to_owned(),
        };
        if text == self.text {
            return None;
        }
        self.text = text;
        Some(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(&LoadingOptions::default())
    }

    #[test]
    fn half_of_ten_is_fifty() {
        let mut p = tracker();
        for _ in 0..10 {
            p.item_start();
        }
        for _ in 0..5 {
            p.item_end();
        }
        assert_eq!(p.actual(), 50);
        for _ in 0..4 {
            p.item_end();
        }
        assert_eq!(p.actual(), 90);
        assert!(!p.all_loaded());
    }

    #[test]
    fn actual_is_capped_until_the_last_item() {
        let mut p = tracker();
        for _ in 0..100 {
            p.item_start();
        }
        for _ in 0..99 {
            p.item_end();
        }
        assert_eq!(p.actual(), 97);
        for _ in 0..1000 {
            let update = p.tick();
            assert!(!update.loaded);
            assert!(p.displayed() <= 97.0);
        }
    }

    #[test]
    fn display_is_monotonic_and_loaded_fires_once() {
        let mut p = tracker();
        for _ in 0..10 {
            p.item_start();
        }
        let mut last = 0.0;
        let mut loaded = 0;
        let mut published = Vec::new();
        for frame in 0..400 {
            if frame % 7 == 0 && !p.all_loaded() {
                p.item_end();
            }
            let update = p.tick();
            assert!(p.displayed() >= last);
            last = p.displayed();
            published.extend(update.value);
            if update.loaded {
                loaded += 1;
            }
        }
        assert_eq!(loaded, 1);
        assert_eq!(published.first(), Some(&0));
        assert_eq!(published.last(), Some(&100));
        assert!(published.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn new_requests_after_finish_do_not_restart() {
        let mut p = tracker();
        p.item_start();
        p.item_end();
        while !p.tick().loaded {}
        p.item_start();
        assert_eq!(p.background_pending(), 1);
        assert_eq!(p.tick(), ProgressUpdate::default());
        assert_eq!(p.displayed(), 100.0);
        p.item_end();
        assert_eq!(p.background_pending(), 0);
    }

    #[test]
    fn late_request_holds_display_instead_of_rewinding() {
        let mut p = tracker();
        p.item_start();
        p.item_end();
        for _ in 0..20 {
            let _ = p.tick();
        }
        let before = p.displayed();
        assert!(before > 0.0 && before < 100.0);
        p.item_start();
        assert_eq!(p.actual(), 50);
        for _ in 0..50 {
            let update = p.tick();
            assert!(!update.loaded);
            assert!(p.displayed() >= before);
        }
        p.item_end();
        while !p.tick().loaded {}
        assert_eq!(p.displayed(), 100.0);
    }

    #[test]
    fn stage_thresholds() {
        let o = LoadingOptions::default();
        assert_eq!(LoadStage::from_progress(0, &o), LoadStage::LoadingTextures);
        assert_eq!(LoadStage::from_progress(54, &o), LoadStage::LoadingTextures);
        assert_eq!(LoadStage::from_progress(55, &o), LoadStage::PreparingLighting);
        assert_eq!(LoadStage::from_progress(85, &o), LoadStage::Finalising);
        assert_eq!(LoadStage::from_progress(99, &o), LoadStage::Finalising);
        assert_eq!(LoadStage::from_progress(100, &o), LoadStage::Ready);
    }

    #[test]
    fn finalising_ellipsis_cycles() {
        let mut label = StageLabel::new(&LoadingOptions::default());
        let t0 = Instant::now();
        assert_eq!(label.update(10, t0), Some("Loading textures…"));
        assert_eq!(label.update(11, t0), None);
        assert_eq!(label.update(90, t0), Some("Finalising scene."));
        let step = Duration::from_millis(450);
        assert_eq!(label.update(90, t0 + step), None);
        assert_eq!(label.update(91, t0 + step * 2), Some("Finalising scene.."));
        assert_eq!(label.update(92, t0 + step * 3), Some("Finalising scene..."));
        assert_eq!(label.update(93, t0 + step * 4), Some("Finalising scene."));
        assert_eq!(label.update(100, t0 + step * 5), Some("Ready"));
    }

    #[test]
    fn label_follows_configured_thresholds() {
        let options = LoadingOptions {
            textures_below: 20,
            lighting_below: 40,
            ..LoadingOptions::default()
        };
        let mut label = StageLabel::new(&options);
        let t0 = Instant::now();
        assert_eq!(label.update(30, t0), Some("Preparing lighting…"));
        assert_eq!(label.stage(), Some(LoadStage::from_progress(30, &options)));
        assert_eq!(label.update(45, t0), Some("Finalising scene."));
    }
}
