//! Mesh classification by node name.
//!
//! Names are matched case-insensitively against an ordered rule table; the
//! first rule whose predicate accepts the name decides the class. Order
//! matters: `static_wall` must win over `wall`, `worktop_support` over
//! `worktop`, and oven glass over plain glass.

use glam::Vec3;

use super::{Material, Shading};
use crate::catalog::{BakedSlot, Category};
use crate::scene::AuthoredMaterial;
use crate::util::color::from_hex_u32;

/// Glass flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlassKind {
    /// Dark, partly opaque oven door glass.
    Oven,
    /// Near-clear window pane.
    Window,
}

/// Non-customisable mesh groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedKind {
    /// Baked wall sections.
    StaticWalls,
    /// Window frame.
    WindowFrame,
    /// Coffee machine.
    Coffee,
    /// Cooker.
    Cooker,
    /// Hob.
    Hob,
    /// Sink.
    Sink,
    /// Supports under the worktop; keep their authored look.
    WorktopSupport,
    /// Bar stools; keep their authored look.
    Stools,
}

/// Outcome of classifying a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshClass {
    /// Glass with a fixed physical material.
    Glass(GlassKind),
    /// Fixed or baked appearance.
    Fixed(FixedKind),
    /// User-customisable surface.
    Surface(Category),
    /// Anything unrecognised.
    Default,
}

struct Rule {
    matches: fn(&str) -> bool,
    class: MeshClass,
}

const RULES: &[Rule] = &[
    Rule {
        matches: |n| {
            n.contains("oven_glass")
                || n.contains("glass")
                    && (n.contains("oven") || n.contains("cooker"))
        },
        class: MeshClass::Glass(GlassKind::Oven),
    },
    Rule {
        matches: |n| n.contains("glass"),
        class: MeshClass::Glass(GlassKind::Window),
    },
    Rule {
        matches: |n| n.contains("static_wall"),
        class: MeshClass::Fixed(FixedKind::StaticWalls),
    },
    Rule {
        matches: |n| n.contains("windowframe"),
        class: MeshClass::Fixed(FixedKind::WindowFrame),
    },
    Rule {
        matches: |n| n.contains("worktop_support"),
        class: MeshClass::Fixed(FixedKind::WorktopSupport),
    },
    Rule {
        matches: |n| n.contains("cupboard") || n.contains("cabinet"),
        class: MeshClass::Surface(Category::Cupboards),
    },
    Rule {
        matches: |n| n.contains("coffee"),
        class: MeshClass::Fixed(FixedKind::Coffee),
    },
    Rule {
        matches: |n| n.contains("cooker"),
        class: MeshClass::Fixed(FixedKind::Cooker),
    },
    Rule {
        matches: |n| n.contains("hob"),
        class: MeshClass::Fixed(FixedKind::Hob),
    },
    Rule {
        matches: |n| n.contains("sink"),
        class: MeshClass::Fixed(FixedKind::Sink),
    },
    Rule {
        matches: |n| n.contains("stool"),
        class: MeshClass::Fixed(FixedKind::Stools),
    },
    Rule {
        matches: |n| n.contains("floor"),
        class: MeshClass::Surface(Category::Floor),
    },
    Rule {
        matches: |n| n.contains("worktop"),
        class: MeshClass::Surface(Category::Worktop),
    },
    Rule {
        matches: |n| n.contains("wall"),
        class: MeshClass::Surface(Category::Walls),
    },
];

/// Classify a mesh by name.
#[must_use]
pub fn classify(name: &str) -> MeshClass {
    let lower = name.to_ascii_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map_or(MeshClass::Default, |rule| rule.class)
}

impl FixedKind {
    /// Baked texture used by this group, if any.
    #[must_use]
    pub fn baked_slot(self) -> Option<BakedSlot> {
        match self {
            Self::StaticWalls => Some(BakedSlot::StaticWalls),
            Self::WindowFrame => Some(BakedSlot::WindowFrame),
            Self::Coffee => Some(BakedSlot::Coffee),
            Self::Cooker => Some(BakedSlot::Cooker),
            Self::Hob => Some(BakedSlot::Hob),
            Self::Sink => Some(BakedSlot::Sink),
            Self::WorktopSupport | Self::Stools => None,
        }
    }

    /// Whether the mesh keeps the material authored in the model file.
    #[must_use]
    pub fn keeps_authored(self) -> bool {
        matches!(self, Self::WorktopSupport | Self::Stools)
    }

    /// Fixed material; the baked map is attached once it loads.
    #[must_use]
    pub fn material(self, authored: &AuthoredMaterial) -> Material {
        match self {
            Self::StaticWalls => Material::unlit(None),
            Self::WindowFrame => Material::standard(Vec3::ONE, 0.45, 0.0),
            Self::Coffee => Material::standard(Vec3::ONE, 0.35, 0.15),
            Self::Cooker => Material::standard(Vec3::ONE, 0.4, 0.2),
            Self::Hob => Material::standard(Vec3::ONE, 0.15, 0.6),
            Self::Sink => Material::standard(Vec3::ONE, 0.2, 0.8),
            Self::WorktopSupport | Self::Stools => authored_material(authored),
        }
    }
}

impl GlassKind {
    /// Physical glass material.
    #[must_use]
    pub fn material(self) -> Material {
        match self {
            Self::Oven => Material {
                shading: Shading::Physical,
                color: from_hex_u32(0x0022_2222),
                transmission: 0.7,
                opacity: 0.5,
                transparent: true,
                roughness: 0.1,
                render_order: 1,
                ..Material::default()
            },
            Self::Window => Material {
                shading: Shading::Physical,
                transmission: 0.95,
                opacity: 0.1,
                transparent: true,
                roughness: 0.05,
                metalness: 0.0,
                ior: 1.5,
                thickness: 0.05,
                specular_intensity: 1.0,
                env_map_intensity: 1.5,
                render_order: 1,
                ..Material::default()
            },
        }
    }
}

/// Neutral material for unrecognised meshes and failed surface loads.
#[must_use]
pub fn default_material() -> Material {
    Material::standard(from_hex_u32(0x00e5_e5e5), 0.6, 0.0)
}

fn authored_material(authored: &AuthoredMaterial) -> Material {
    let alpha = authored.color.w;
    Material {
        color: authored.color.truncate(),
        opacity: alpha,
        transparent: alpha < 1.0,
        roughness: authored.roughness,
        metalness: authored.metalness,
        ..Material::default()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn order_resolves_overlapping_names() {
        assert_eq!(classify("Static_Wall_01"), MeshClass::Fixed(FixedKind::StaticWalls));
        assert_eq!(classify("Wall_Tiles"), MeshClass::Surface(Category::Walls));
        assert_eq!(
            classify("worktop_support_left"),
            MeshClass::Fixed(FixedKind::WorktopSupport)
        );
        assert_eq!(classify("Worktop_Main"), MeshClass::Surface(Category::Worktop));
        assert_eq!(classify("Oven_Glass"), MeshClass::Glass(GlassKind::Oven));
        assert_eq!(classify("cooker_door_glass"), MeshClass::Glass(GlassKind::Oven));
        assert_eq!(classify("Window_Glass"), MeshClass::Glass(GlassKind::Window));
        assert_eq!(classify("Cooker"), MeshClass::Fixed(FixedKind::Cooker));
    }

    #[test]
    fn cupboards_and_cabinets_are_customisable() {
        assert_eq!(classify("Cupboard_Upper"), MeshClass::Surface(Category::Cupboards));
        assert_eq!(classify("tall_cabinet"), MeshClass::Surface(Category::Cupboards));
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(classify("Ceiling_Light"), MeshClass::Default);
        assert_eq!(classify(""), MeshClass::Default);
        let m = default_material();
        assert!((m.roughness - 0.6).abs() < 1e-6);
    }

    #[test]
    fn glass_presets_are_transparent() {
        let oven = GlassKind::Oven.material();
        assert!(oven.transparent);
        assert_eq!(oven.render_order, 1);
        let window = GlassKind::Window.material();
        assert!(window.transmission > oven.transmission);
        assert!(window.opacity < oven.opacity);
    }

    #[test]
    fn stools_keep_authored_look() {
        let authored = AuthoredMaterial {
            color: Vec4::new(0.2, 0.3, 0.4, 1.0),
            roughness: 0.7,
            metalness: 0.1,
            texture: None,
        };
        assert!(FixedKind::Stools.keeps_authored());
        let m = FixedKind::Stools.material(&authored);
        assert_eq!(m.color, Vec3::new(0.2, 0.3, 0.4));
        assert!(!m.transparent);
        assert_eq!(FixedKind::Stools.baked_slot(), None);
    }

    #[test]
    fn translucent_authored_color_stays_translucent() {
        let authored = AuthoredMaterial {
            color: Vec4::new(0.5, 0.5, 0.5, 0.4),
            ..AuthoredMaterial::default()
        };
        let m = FixedKind::WorktopSupport.material(&authored);
        assert_eq!(m.color, Vec3::splat(0.5));
        assert_eq!(m.opacity, 0.4);
        assert!(m.transparent);
    }
}
