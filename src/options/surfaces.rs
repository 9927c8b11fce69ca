use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::FadeStrategy;

/// Shading parameters and swap transition for one user-selectable surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(inline)]
#[serde(default)]
pub struct SurfaceStyle {
    /// PBR roughness.
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub roughness: f32,
    /// PBR metalness.
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub metalness: f32,
    /// Environment reflection strength restored after a transition.
    #[schemars(range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub env_map_intensity: f32,
    /// How a newly selected texture is revealed.
    #[schemars(skip)]
    pub fade: FadeStrategy,
    /// Texture repeat along U and V.
    #[schemars(skip)]
    pub uv_scale: [f32; 2],
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            roughness: 0.5,
            metalness: 0.0,
            env_map_intensity: 0.1,
            fade: FadeStrategy::Instant,
            uv_scale: [1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Surfaces", inline)]
#[serde(default)]
/// Per-category surface styling.
pub struct SurfaceOptions {
    /// Floor surface.
    #[schemars(title = "Floor")]
    pub floor: SurfaceStyle,
    /// Worktop surface.
    #[schemars(title = "Worktop")]
    pub worktop: SurfaceStyle,
    /// Wall surface.
    #[schemars(title = "Walls")]
    pub walls: SurfaceStyle,
    /// Initial cupboard tint as `#rrggbb`.
    #[schemars(skip)]
    pub cupboard_color: String,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            floor: SurfaceStyle {
                roughness: 0.8,
                metalness: 0.0,
                env_map_intensity: 0.05,
                fade: FadeStrategy::EmissiveFlash,
                uv_scale: [1.0, 1.0],
            },
            worktop: SurfaceStyle {
                roughness: 0.25,
                metalness: 0.0,
                env_map_intensity: 0.2,
                fade: FadeStrategy::EmissiveFlash,
                uv_scale: [1.0, 1.0],
            },
            walls: SurfaceStyle {
                roughness: 0.5,
                metalness: 0.0,
                env_map_intensity: 0.1,
                fade: FadeStrategy::OpacityFade,
                uv_scale: [1.0, 1.0],
            },
            cupboard_color: "#ffffff".to_owned(),
        }
    }
}
