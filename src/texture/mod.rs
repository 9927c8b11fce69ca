//! Lazily fetched, session-cached variant textures.
//!
//! Every catalog variant has one [`TextureSlot`]. Nothing is fetched until
//! a variant is first bound; afterwards the GPU texture stays cached for
//! the rest of the session, so switching back to an earlier choice is
//! immediate. Entries are never evicted.

use std::collections::BTreeMap;

use crate::catalog::{BakedSlot, Catalog, Category};
use crate::gpu::backend::TextureId;
use crate::loading::{AssetKind, LoadingManager, RequestId};

/// Load state of one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureSlot {
    /// Never requested.
    #[default]
    Unrequested,
    /// Fetch in flight.
    Loading(RequestId),
    /// Uploaded and cached.
    Ready(TextureId),
    /// Fetch or decode failed; the next request retries.
    Failed,
}

impl TextureSlot {
    /// The cached texture, if ready.
    #[must_use]
    pub fn texture(self) -> Option<TextureId> {
        match self {
            Self::Ready(id) => Some(id),
            _ => None,
        }
    }
}

/// Per-category variant textures plus baked textures for fixed meshes.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    variants: BTreeMap<Category, Vec<TextureSlot>>,
    active: BTreeMap<Category, usize>,
    baked: BTreeMap<BakedSlot, TextureSlot>,
}

impl TextureRegistry {
    /// Empty registry sized for `catalog`, with each category's default
    /// variant selected.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let mut registry = Self::default();
        for category in Category::TEXTURED {
            let count = catalog.variants(category).len();
            if count == 0 {
                continue;
            }
            let _ = registry
                .variants
                .insert(category, vec![TextureSlot::Unrequested; count]);
            let _ = registry
                .active
                .insert(category, catalog.default_index(category));
        }
        registry
    }

    /// Slot for a variant, fetching it on first use.
    pub fn get(
        &mut self,
        category: Category,
        index: usize,
        catalog: &Catalog,
        loader: &mut LoadingManager,
    ) -> Option<TextureSlot> {
        let variant = catalog.variant(category, index)?;
        let slot = self.variants.get_mut(&category)?.get_mut(index)?;
        match *slot {
            TextureSlot::Unrequested | TextureSlot::Failed => {
                let id = loader.request(
                    AssetKind::Variant { category, index },
                    &variant.source_path,
                );
                *slot = TextureSlot::Loading(id);
            }
            TextureSlot::Ready(_) => {
                log::debug!("{category} `{}` served from cache", variant.id);
            }
            TextureSlot::Loading(_) => {}
        }
        Some(*slot)
    }

    /// Current slot for a variant without fetching.
    #[must_use]
    pub fn peek(&self, category: Category, index: usize) -> Option<TextureSlot> {
        self.variants.get(&category)?.get(index).copied()
    }

    /// Make `index` the active variant of `category` and fetch it if needed.
    /// Returns `None` for an out-of-range index, leaving the selection
    /// unchanged.
    pub fn select(
        &mut self,
        category: Category,
        index: usize,
        catalog: &Catalog,
        loader: &mut LoadingManager,
    ) -> Option<TextureSlot> {
        let slot = self.get(category, index, catalog, loader)?;
        let _ = self.active.insert(category, index);
        Some(slot)
    }

    /// Active variant index.
    #[must_use]
    pub fn active_index(&self, category: Category) -> Option<usize> {
        self.active.get(&category).copied()
    }

    /// Record the outcome of a variant fetch.
    pub fn resolve(
        &mut self,
        category: Category,
        index: usize,
        texture: Option<TextureId>,
    ) {
        if let Some(slot) =
            self.variants.get_mut(&category).and_then(|v| v.get_mut(index))
        {
            *slot = texture.map_or(TextureSlot::Failed, TextureSlot::Ready);
        }
    }

    /// Fetch a baked texture.
    pub fn request_baked(
        &mut self,
        slot: BakedSlot,
        path: &str,
        loader: &mut LoadingManager,
    ) {
        let id = loader.request(AssetKind::Baked(slot), path);
        let _ = self.baked.insert(slot, TextureSlot::Loading(id));
    }

    /// Record the outcome of a baked fetch.
    pub fn resolve_baked(&mut self, slot: BakedSlot, texture: Option<TextureId>) {
        let _ = self
            .baked
            .insert(slot, texture.map_or(TextureSlot::Failed, TextureSlot::Ready));
    }

    /// Baked texture, if ready.
    #[must_use]
    pub fn baked(&self, slot: BakedSlot) -> Option<TextureId> {
        self.baked.get(&slot).and_then(|s| s.texture())
    }

    /// Number of cached (ready) variant textures.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.variants
            .values()
            .flatten()
            .filter(|s| matches!(s, TextureSlot::Ready(_)))
            .count()
    }

    /// Thumbnail paths for a category, available without any fetch.
    #[must_use]
    pub fn thumbnails<'a>(
        &self,
        category: Category,
        catalog: &'a Catalog,
    ) -> Vec<&'a str> {
        catalog
            .variants(category)
            .iter()
            .map(|v| v.thumbnail_path.as_str())
            .collect()
    }

    /// Forget every slot.
    pub fn clear(&mut self) {
        self.variants.clear();
        self.active.clear();
        self.baked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kitchen;
    use crate::headless::MemorySource;
    use crate::options::LoadingOptions;

    fn setup() -> (TextureRegistry, Catalog, LoadingManager, MemorySource) {
        let catalog = kitchen::catalog();
        let source = MemorySource::new();
        let loader = LoadingManager::new(
            Box::new(source.clone()),
            &LoadingOptions::default(),
        );
        (TextureRegistry::new(&catalog), catalog, loader, source)
    }

    #[test]
    fn nothing_fetched_until_first_use() {
        let (registry, catalog, _loader, source) = setup();
        assert_eq!(registry.peek(Category::Floor, 3), Some(TextureSlot::Unrequested));
        assert_eq!(registry.thumbnails(Category::Floor, &catalog).len(), 17);
        assert!(source.fetched().is_empty());
    }

    #[test]
    fn cached_variant_is_not_refetched() {
        let (mut registry, catalog, mut loader, source) = setup();
        let slot = registry.select(Category::Floor, 2, &catalog, &mut loader);
        assert!(matches!(slot, Some(TextureSlot::Loading(_))));
        registry.resolve(Category::Floor, 2, Some(TextureId::from_raw(9)));
        let _ = registry.select(Category::Floor, 5, &catalog, &mut loader);
        let again = registry.select(Category::Floor, 2, &catalog, &mut loader);
        assert_eq!(again, Some(TextureSlot::Ready(TextureId::from_raw(9))));
        assert_eq!(source.fetched().len(), 2);
        assert_eq!(registry.active_index(Category::Floor), Some(2));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let (mut registry, catalog, mut loader, _source) = setup();
        assert!(registry.select(Category::Worktop, 99, &catalog, &mut loader).is_none());
        assert_eq!(registry.active_index(Category::Worktop), Some(0));
        assert!(registry.select(Category::Cupboards, 0, &catalog, &mut loader).is_none());
    }

    #[test]
    fn failed_variant_retries_on_next_use() {
        let (mut registry, catalog, mut loader, source) = setup();
        let _ = registry.get(Category::Walls, 0, &catalog, &mut loader);
        registry.resolve(Category::Walls, 0, None);
        assert_eq!(registry.peek(Category::Walls, 0), Some(TextureSlot::Failed));
        let _ = registry.get(Category::Walls, 0, &catalog, &mut loader);
        assert_eq!(source.fetched().len(), 2);
    }
}
