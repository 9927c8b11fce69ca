//! Runtime room manifests.
//!
//! Accepts both the camelCase document shape and the snake_case column
//! names a storefront backend returns.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{BakedSlot, CameraPose, Catalog, Category, RoomModel, TextureVariant};
use crate::error::VisualiserError;

/// Top-level manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomManifest {
    /// Room metadata.
    pub room: RoomSection,
    /// Variants keyed by category name.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<TextureDescriptor>>,
}

/// `room` object of a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSection {
    /// Display name.
    pub name: String,
    /// URL-safe identifier.
    #[serde(default)]
    pub slug: String,
    /// Binary glTF location.
    #[serde(alias = "glb_url", alias = "glbUrl")]
    pub model_url: String,
    /// HDR panorama location.
    #[serde(default, alias = "hdr_url")]
    pub hdr_url: Option<String>,
    /// Suggested camera pose.
    #[serde(default, alias = "camera", alias = "default_camera")]
    pub default_camera: Option<CameraPose>,
    /// Category names offered in the picker.
    #[serde(default, alias = "allowed_categories")]
    pub allowed_categories: Vec<String>,
    /// Baked texture locations.
    #[serde(default)]
    pub baked: BTreeMap<BakedSlot, String>,
}

/// One texture variant as it appears in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureDescriptor {
    /// Stable identifier.
    pub id: String,
    /// Linked product.
    #[serde(default, alias = "product_id")]
    pub product_id: Option<String>,
    /// Category name as stored.
    #[serde(default)]
    pub category: Option<String>,
    /// Name shown on picker cards.
    #[serde(alias = "display_name")]
    pub display_name: String,
    /// Full-resolution texture location.
    #[serde(alias = "texture_url")]
    pub texture_url: String,
    /// Picker thumbnail location.
    #[serde(default, alias = "thumbnail_url")]
    pub thumbnail_url: Option<String>,
    /// Roughness override.
    #[serde(default)]
    pub roughness: Option<f32>,
    /// Metalness override.
    #[serde(default)]
    pub metalness: Option<f32>,
    /// Environment intensity override.
    #[serde(default, alias = "env_map_intensity")]
    pub env_map_intensity: Option<f32>,
    /// UV repeat in X.
    #[serde(default, alias = "scale_x")]
    pub scale_x: Option<f32>,
    /// UV repeat in Y.
    #[serde(default, alias = "scale_y")]
    pub scale_y: Option<f32>,
    /// Initial selection flag.
    #[serde(default, alias = "default_selected")]
    pub default_selected: bool,
}

impl RoomManifest {
    /// Parse a manifest document.
    pub fn from_json(json: &str) -> Result<Self, VisualiserError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into a [`Catalog`]. Categories this engine does not
    /// customise are skipped with a warning.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        let mut allowed = Vec::new();
        for name in &self.room.allowed_categories {
            match Category::parse(name) {
                Some(c) if !allowed.contains(&c) => allowed.push(c),
                Some(_) => {}
                None => log::warn!("ignoring unsupported category `{name}`"),
            }
        }
        if self.room.allowed_categories.is_empty() {
            allowed.extend(Category::ALL);
        }

        let mut variants = Vec::new();
        for (name, descriptors) in self.categories {
            let Some(category) = Category::parse(&name) else {
                log::warn!(
                    "skipping {} variants for unsupported category `{name}`",
                    descriptors.len()
                );
                continue;
            };
            variants.extend(
                descriptors.into_iter().map(|d| d.into_variant(category)),
            );
        }

        let room = RoomModel {
            name: self.room.name,
            slug: self.room.slug,
            model_path: self.room.model_url,
            environment_path: self.room.hdr_url,
            default_camera: self.room.default_camera,
            allowed_categories: allowed,
            baked: self.room.baked,
        };
        Catalog::new(room, variants)
    }
}

impl TextureDescriptor {
    fn into_variant(self, category: Category) -> TextureVariant {
        if let Some(declared) = self.category.as_deref() {
            if Category::parse(declared) != Some(category) {
                log::debug!(
                    "variant `{}` declares `{declared}` but is filed under \
                     {category}",
                    self.id
                );
            }
        }
        let thumbnail = self
            .thumbnail_url
            .unwrap_or_else(|| self.texture_url.clone());
        TextureVariant {
            id: self.id,
            display_name: self.display_name,
            category,
            source_path: self.texture_url,
            thumbnail_path: thumbnail,
            product_ref: self.product_id,
            roughness: self.roughness,
            metalness: self.metalness,
            env_map_intensity: self.env_map_intensity,
            scale: [self.scale_x.unwrap_or(1.0), self.scale_y.unwrap_or(1.0)],
            default_selected: self.default_selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_JSON: &str = r#"{
        "room": {
            "name": "Kitchen",
            "slug": "kitchen",
            "glb_url": "/models/kitchen.glb",
            "camera": { "position": [0.0, 0.85, 3.6] },
            "allowed_categories": ["Floor", "Worktop", "Stools"]
        },
        "categories": {
            "Floor": [
                {
                    "id": "a",
                    "product_id": "p-1",
                    "category": "Floor",
                    "display_name": "Alpha",
                    "texture_url": "/t/a.webp",
                    "thumbnail_url": "/thumb/a.webp",
                    "roughness": 0.7,
                    "scale_x": 2.0,
                    "default_selected": false
                },
                {
                    "id": "b",
                    "display_name": "Beta",
                    "texture_url": "/t/b.webp",
                    "default_selected": true
                }
            ],
            "Stools": [
                { "id": "s", "display_name": "S", "texture_url": "/s" }
            ]
        }
    }"#;

    #[test]
    fn backend_shape_parses() {
        let catalog = RoomManifest::from_json(BACKEND_JSON)
            .unwrap()
            .into_catalog();
        assert_eq!(catalog.room.model_path, "/models/kitchen.glb");
        assert_eq!(
            catalog.room.allowed_categories,
            vec![Category::Floor, Category::Worktop]
        );
        let floor = catalog.variants(Category::Floor);
        assert_eq!(floor.len(), 2);
        assert_eq!(floor[0].scale, [2.0, 1.0]);
        assert_eq!(floor[0].roughness, Some(0.7));
        assert_eq!(floor[1].thumbnail_path, "/t/b.webp");
        assert_eq!(catalog.default_index(Category::Floor), 1);
        assert!(catalog.room.default_camera.is_some());
    }

    #[test]
    fn camel_case_shape_parses() {
        let json = r#"{
            "room": {
                "name": "Bath",
                "modelUrl": "/models/bath.glb",
                "hdrUrl": "/hdr/bath.hdr",
                "allowedCategories": ["walls"],
                "baked": { "sink": "/t/sink.webp" }
            },
            "categories": {}
        }"#;
        let catalog = RoomManifest::from_json(json).unwrap().into_catalog();
        assert_eq!(catalog.room.environment_path.as_deref(), Some("/hdr/bath.hdr"));
        assert_eq!(catalog.room.allowed_categories, vec![Category::Walls]);
        assert_eq!(
            catalog.room.baked.get(&BakedSlot::Sink).map(String::as_str),
            Some("/t/sink.webp")
        );
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let err = RoomManifest::from_json("{\"room\": 3}").unwrap_err();
        assert!(matches!(err, VisualiserError::Manifest(_)));
    }
}
