use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Room lighting rig: warm ambient fill, one directional key light and the
/// HDR environment.
pub struct LightingOptions {
    /// Ambient light color as `0xRRGGBB`.
    #[schemars(skip)]
    pub ambient_color: u32,
    /// Ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub ambient_intensity: f32,
    /// Directional light color as `0xRRGGBB`.
    #[schemars(skip)]
    pub key_color: u32,
    /// Directional light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub key_intensity: f32,
    /// Directional light position; the light points at the origin.
    #[schemars(skip)]
    pub key_position: [f32; 3],
    /// Tone-mapping exposure applied after the HDR environment resolves.
    #[schemars(title = "Exposure", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub exposure: f32,
    /// Clear color used until the environment panorama is available.
    #[schemars(skip)]
    pub clear_color: u32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: 0x00ff_f5e8,
            ambient_intensity: 0.6,
            key_color: 0x00ff_ffff,
            key_intensity: 0.4,
            key_position: [5.0, 10.0, 7.5],
            exposure: 0.55,
            clear_color: 0x00f5_f5f5,
        }
    }
}
