use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Loading", inline)]
#[serde(default)]
/// Progress ramp and stage-label parameters.
pub struct LoadingOptions {
    /// Highest `actual` percentage reported before every tracked resource
    /// has resolved.
    #[schemars(skip)]
    pub actual_cap: u32,
    /// Fraction of the remaining gap closed per frame while loading.
    #[schemars(title = "Ease Factor", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub ease_factor: f32,
    /// Minimum per-frame advance while easing toward `actual`.
    #[schemars(skip)]
    pub min_step: f32,
    /// Fixed per-frame advance toward 100 once everything has loaded.
    #[schemars(title = "Finish Step", range(min = 0.5, max = 5.0), extend("step" = 0.1))]
    pub finish_step: f32,
    /// Below this percentage the stage is "Loading textures".
    #[schemars(skip)]
    pub textures_below: u32,
    /// Below this percentage the stage is "Preparing lighting".
    #[schemars(skip)]
    pub lighting_below: u32,
    /// Ellipsis animation period for the finalising stage.
    #[schemars(skip)]
    pub dot_interval_ms: u64,
}

impl Default for LoadingOptions {
    fn default() -> Self {
        Self {
            actual_cap: 97,
            ease_factor: 0.08,
            min_step: 0.25,
            finish_step: 1.1,
            textures_below: 55,
            lighting_below: 85,
            dot_interval_ms: 450,
        }
    }
}
