//! What the host's variant picker should show.

use crate::catalog::{Catalog, Category};
use crate::util::color::to_hex;

/// Message shown for a category with no variants.
pub const EMPTY_MESSAGE: &str = "No textures available yet.";

/// One selectable card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerCard {
    /// Variant index within its category.
    pub index: usize,
    /// Variant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Thumbnail location.
    pub thumbnail: String,
    /// Product page, when the variant links one.
    pub product_url: Option<String>,
    /// Whether this variant is currently bound.
    pub active: bool,
}

/// Picker contents for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerContent {
    /// Texture cards.
    Variants(Vec<PickerCard>),
    /// Color input seeded with the current `#rrggbb` value.
    ColorPicker {
        /// Current color.
        hex: String,
    },
    /// Nothing to choose from.
    Empty {
        /// Placeholder text.
        message: String,
    },
}

impl PickerContent {
    /// Build the picker for `category`.
    pub(crate) fn build(
        category: Category,
        catalog: &Catalog,
        active: Option<usize>,
        cupboard_color: glam::Vec3,
    ) -> Self {
        if category == Category::Cupboards {
            return Self::ColorPicker {
                hex: to_hex(cupboard_color),
            };
        }
        let variants = catalog.variants(category);
        if variants.is_empty() {
            return Self::Empty {
                message: EMPTY_MESSAGE.to_owned(),
            };
        }
        Self::Variants(
            variants
                .iter()
                .enumerate()
                .map(|(index, v)| PickerCard {
                    index,
                    id: v.id.clone(),
                    name: v.display_name.clone(),
                    thumbnail: v.thumbnail_path.clone(),
                    product_url: v.product_ref.clone(),
                    active: active == Some(index),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use glam::Vec3;

    use super::*;
    use crate::catalog::{kitchen, RoomModel};

    #[test]
    fn floor_cards_mark_the_active_variant() {
        let catalog = kitchen::catalog();
        let PickerContent::Variants(cards) =
            PickerContent::build(Category::Floor, &catalog, Some(2), Vec3::ONE)
        else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 17);
        assert_eq!(cards.iter().filter(|c| c.active).count(), 1);
        assert!(cards[2].active);
    }

    #[test]
    fn cupboards_get_a_color_picker() {
        let catalog = kitchen::catalog();
        let content = PickerContent::build(
            Category::Cupboards,
            &catalog,
            None,
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(
            content,
            PickerContent::ColorPicker {
                hex: "#ff0000".to_owned()
            }
        );
    }

    #[test]
    fn empty_category_has_a_placeholder() {
        let room = RoomModel {
            name: "Empty".to_owned(),
            slug: "empty".to_owned(),
            model_path: "/m.glb".to_owned(),
            environment_path: None,
            default_camera: None,
            allowed_categories: Category::ALL.to_vec(),
            baked: BTreeMap::new(),
        };
        let catalog = Catalog::new(room, Vec::new());
        let content =
            PickerContent::build(Category::Walls, &catalog, None, Vec3::ONE);
        assert_eq!(
            content,
            PickerContent::Empty {
                message: EMPTY_MESSAGE.to_owned()
            }
        );
    }
}
