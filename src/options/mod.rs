//! Centralized engine options with TOML preset support.
//!
//! Every tweakable constant (camera constraints, progress ramp, fade steps,
//! lighting rig, surface styling) is consolidated here. Options serialize
//! to/from TOML so a deployment can override a single section.

mod camera;
mod lighting;
mod loading;
mod surfaces;
mod transitions;

use std::path::Path;

pub use camera::CameraOptions;
pub use lighting::LightingOptions;
pub use loading::LoadingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use surfaces::{SurfaceOptions, SurfaceStyle};
pub use transitions::TransitionOptions;

use crate::catalog::Category;
use crate::error::VisualiserError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[loading]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and orbit constraints.
    pub camera: CameraOptions,
    /// Progress ramp and stage labels.
    pub loading: LoadingOptions,
    /// Texture swap transitions.
    pub transitions: TransitionOptions,
    /// Lighting rig.
    pub lighting: LightingOptions,
    /// Per-category surface styling.
    pub surfaces: SurfaceOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VisualiserError> {
        let content =
            std::fs::read_to_string(path).map_err(VisualiserError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, VisualiserError> {
        toml::from_str(content)
            .map_err(|e| VisualiserError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), VisualiserError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VisualiserError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VisualiserError::Io)?;
        }
        std::fs::write(path, content).map_err(VisualiserError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Surface style for a texture-backed category. Cupboards are tinted,
    /// not textured, and have no style.
    #[must_use]
    pub fn surface(&self, category: Category) -> Option<&SurfaceStyle> {
        match category {
            Category::Floor => Some(&self.surfaces.floor),
            Category::Worktop => Some(&self.surfaces.worktop),
            Category::Walls => Some(&self.surfaces.walls),
            Category::Cupboards => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FadeStrategy;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[loading]
finish_step = 2.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.loading.finish_step, 2.0);
        assert_eq!(opts.loading.actual_cap, 97);
        assert_eq!(opts.camera.fovy, 42.0);
        assert_eq!(opts.transitions.flash_step, 0.08);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, VisualiserError::OptionsParse(_)));
    }

    #[test]
    fn surface_lookup_matches_fade_strategy() {
        let opts = Options::default();
        assert_eq!(
            opts.surface(Category::Floor).map(|s| s.fade),
            Some(FadeStrategy::EmissiveFlash)
        );
        assert_eq!(
            opts.surface(Category::Walls).map(|s| s.fade),
            Some(FadeStrategy::OpacityFade)
        );
        assert!(opts.surface(Category::Cupboards).is_none());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("loading"));
        assert!(props.contains_key("lighting"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("min_polar").is_none());
    }
}
