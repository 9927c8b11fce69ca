//! Room and texture-variant catalog.
//!
//! A [`Catalog`] pairs one [`RoomModel`] with the variants offered for each
//! customisable [`Category`]. Catalog data is static for a session: the
//! built-in kitchen comes from [`kitchen::catalog`], and hosts can supply
//! their own through [`RoomManifest`].

pub mod kitchen;
mod manifest;

use std::collections::BTreeMap;
use std::fmt;

pub use manifest::{RoomManifest, TextureDescriptor};

use crate::options::SurfaceStyle;

/// User-customisable surface group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Category {
    /// Floor tiles.
    Floor,
    /// Kitchen worktop.
    Worktop,
    /// Wall tiles.
    Walls,
    /// Cupboard fronts (tinted, not textured).
    Cupboards,
}

impl Category {
    /// Every category, in picker order.
    pub const ALL: [Self; 4] =
        [Self::Floor, Self::Worktop, Self::Cupboards, Self::Walls];

    /// Categories whose look comes from a texture variant.
    pub const TEXTURED: [Self; 3] = [Self::Floor, Self::Worktop, Self::Walls];

    /// Parse a category name, ignoring case. Returns `None` for names this
    /// engine does not customise (e.g. "Stools").
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "floor" => Some(Self::Floor),
            "worktop" => Some(Self::Worktop),
            "walls" | "wall" => Some(Self::Walls),
            "cupboards" | "cupboard" => Some(Self::Cupboards),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Floor => "Floor",
            Self::Worktop => "Worktop",
            Self::Walls => "Walls",
            Self::Cupboards => "Cupboards",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One selectable texture for a category.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureVariant {
    /// Stable identifier.
    pub id: String,
    /// Name shown on picker cards.
    pub display_name: String,
    /// Category this variant belongs to.
    pub category: Category,
    /// Full-resolution texture location.
    pub source_path: String,
    /// Picker thumbnail location.
    pub thumbnail_path: String,
    /// Link to the product page, if any.
    pub product_ref: Option<String>,
    /// Roughness override.
    pub roughness: Option<f32>,
    /// Metalness override.
    pub metalness: Option<f32>,
    /// Environment intensity override.
    pub env_map_intensity: Option<f32>,
    /// UV repeat in X and Y.
    pub scale: [f32; 2],
    /// Whether this variant is the category's initial selection.
    pub default_selected: bool,
}

impl TextureVariant {
    /// Variant with default surface parameters.
    #[must_use]
    pub fn new(
        category: Category,
        id: &str,
        display_name: &str,
        source_path: &str,
        thumbnail_path: &str,
        product_ref: &str,
    ) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            category,
            source_path: source_path.to_owned(),
            thumbnail_path: thumbnail_path.to_owned(),
            product_ref: Some(product_ref.to_owned())
                .filter(|r| !r.is_empty() && !r.ends_with('#')),
            roughness: None,
            metalness: None,
            env_map_intensity: None,
            scale: [1.0, 1.0],
            default_selected: false,
        }
    }

    /// `base` with this variant's overrides applied.
    #[must_use]
    pub fn style(&self, base: &SurfaceStyle) -> SurfaceStyle {
        SurfaceStyle {
            roughness: self.roughness.unwrap_or(base.roughness),
            metalness: self.metalness.unwrap_or(base.metalness),
            env_map_intensity: self
                .env_map_intensity
                .unwrap_or(base.env_map_intensity),
            fade: base.fade,
            uv_scale: self.scale,
        }
    }
}

/// Pre-baked texture slots for fixed parts of the room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum BakedSlot {
    /// Non-customisable wall sections.
    StaticWalls,
    /// Cupboard fronts (tinted at runtime).
    Cupboards,
    /// Coffee machine.
    Coffee,
    /// Cooker.
    Cooker,
    /// Hob.
    Hob,
    /// Sink.
    Sink,
    /// Window frame.
    WindowFrame,
}

impl BakedSlot {
    /// Every slot.
    pub const ALL: [Self; 7] = [
        Self::StaticWalls,
        Self::Cupboards,
        Self::Coffee,
        Self::Cooker,
        Self::Hob,
        Self::Sink,
        Self::WindowFrame,
    ];
}

/// Camera pose suggested by a room.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraPose {
    /// Eye position.
    pub position: [f32; 3],
    /// Orbit target, derived from the model bounds when absent.
    #[serde(default)]
    pub target: Option<[f32; 3]>,
}

/// Room metadata. Immutable once a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomModel {
    /// Display name.
    pub name: String,
    /// URL-safe identifier.
    pub slug: String,
    /// Binary glTF location.
    pub model_path: String,
    /// Equirectangular HDR panorama location.
    pub environment_path: Option<String>,
    /// Suggested camera pose.
    pub default_camera: Option<CameraPose>,
    /// Categories offered in the picker.
    pub allowed_categories: Vec<Category>,
    /// Baked texture locations for fixed meshes.
    pub baked: BTreeMap<BakedSlot, String>,
}

/// A room together with its per-category variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Room metadata.
    pub room: RoomModel,
    variants: BTreeMap<Category, Vec<TextureVariant>>,
}

impl Catalog {
    /// Build a catalog. Variants filed under the wrong category are moved to
    /// the category they declare.
    #[must_use]
    pub fn new(room: RoomModel, variants: Vec<TextureVariant>) -> Self {
        let mut by_category: BTreeMap<Category, Vec<TextureVariant>> =
            BTreeMap::new();
        for variant in variants {
            by_category.entry(variant.category).or_default().push(variant);
        }
        Self {
            room,
            variants: by_category,
        }
    }

    /// Variants for a category, in display order.
    #[must_use]
    pub fn variants(&self, category: Category) -> &[TextureVariant] {
        self.variants.get(&category).map_or(&[], Vec::as_slice)
    }

    /// A single variant.
    #[must_use]
    pub fn variant(
        &self,
        category: Category,
        index: usize,
    ) -> Option<&TextureVariant> {
        self.variants(category).get(index)
    }

    /// Index of the first variant marked default, else 0.
    #[must_use]
    pub fn default_index(&self, category: Category) -> usize {
        self.variants(category)
            .iter()
            .position(|v| v.default_selected)
            .unwrap_or(0)
    }

    /// Find a variant by id.
    #[must_use]
    pub fn find(&self, category: Category, id: &str) -> Option<usize> {
        self.variants(category).iter().position(|v| v.id == id)
    }

    /// Whether the room offers `category`.
    #[must_use]
    pub fn is_allowed(&self, category: Category) -> bool {
        self.room.allowed_categories.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_skips_unknowns() {
        assert_eq!(Category::parse("floor"), Some(Category::Floor));
        assert_eq!(Category::parse(" Walls "), Some(Category::Walls));
        assert_eq!(Category::parse("Stools"), None);
    }

    #[test]
    fn product_placeholder_links_are_dropped() {
        let v = TextureVariant::new(
            Category::Worktop,
            "a",
            "A",
            "/a.webp",
            "/a-thumb.webp",
            "/products/#",
        );
        assert!(v.product_ref.is_none());
    }

    #[test]
    fn variant_overrides_style() {
        let base = SurfaceStyle::default();
        let mut v =
            TextureVariant::new(Category::Floor, "a", "A", "/a", "/a", "");
        v.roughness = Some(0.1);
        v.scale = [4.0, 2.0];
        let style = v.style(&base);
        assert_eq!(style.roughness, 0.1);
        assert_eq!(style.metalness, base.metalness);
        assert_eq!(style.uv_scale, [4.0, 2.0]);
    }

    #[test]
    fn kitchen_catalog_has_expected_shape() {
        let catalog = kitchen::catalog();
        assert_eq!(catalog.variants(Category::Floor).len(), 17);
        assert_eq!(catalog.variants(Category::Worktop).len(), 9);
        assert_eq!(catalog.variants(Category::Walls).len(), 15);
        assert!(catalog.variants(Category::Cupboards).is_empty());
        assert_eq!(catalog.room.baked.len(), BakedSlot::ALL.len());
        assert!(catalog.find(Category::Floor, "floor-panda-marble-1200x1200").is_some());
    }
}
