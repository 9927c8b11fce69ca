use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit constraint parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial eye position before the room model resolves.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Fixed orbit distance (zoom is disabled).
    #[schemars(title = "Distance", range(min = 1.0, max = 10.0), extend("step" = 0.1))]
    pub distance: f32,
    /// Lower azimuth bound in radians.
    #[schemars(skip)]
    pub min_azimuth: f32,
    /// Upper azimuth bound in radians.
    #[schemars(skip)]
    pub max_azimuth: f32,
    /// First polar bound in radians (the window is normalized, order does
    /// not matter).
    #[schemars(skip)]
    pub min_polar: f32,
    /// Second polar bound in radians.
    #[schemars(skip)]
    pub max_polar: f32,
    /// Fraction of the remaining orbit delta applied per frame.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Whether scroll zoom is honoured.
    #[schemars(skip)]
    pub enable_zoom: bool,
    /// Whether drag panning is honoured.
    #[schemars(skip)]
    pub enable_pan: bool,
    /// Orbit target height as a fraction of the model height.
    #[schemars(skip)]
    pub target_height_ratio: f32,
    /// Orbit target depth offset (Z) in model units.
    #[schemars(skip)]
    pub target_depth: f32,
    /// Upper bound on the device pixel ratio used for the render target.
    #[schemars(title = "Max Pixel Ratio", range(min = 1.0, max = 3.0), extend("step" = 0.5))]
    pub max_pixel_ratio: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 42.0,
            znear: 0.1,
            zfar: 50.0,
            position: [0.0, 0.85, 3.6],
            distance: 3.6,
            min_azimuth: -1.0,
            max_azimuth: 0.05,
            min_polar: std::f32::consts::PI / 2.05,
            max_polar: std::f32::consts::PI / 2.15,
            damping: 0.05,
            rotate_speed: 1.0,
            enable_zoom: false,
            enable_pan: false,
            target_height_ratio: 0.45,
            target_depth: 0.60,
            max_pixel_ratio: 2.0,
        }
    }
}
