use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Transitions", inline)]
#[serde(default)]
/// Per-frame steps for the two texture-swap fades.
pub struct TransitionOptions {
    /// Emissive intensity removed per frame during an emissive flash.
    #[schemars(title = "Flash Step", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub flash_step: f32,
    /// Opacity added per frame during an opacity fade.
    #[schemars(title = "Fade Step", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub fade_step: f32,
    /// Curve applied to the normalized fade value.
    #[schemars(skip)]
    pub easing: EasingFunction,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            flash_step: 0.08,
            fade_step: 0.06,
            easing: EasingFunction::Linear,
        }
    }
}
