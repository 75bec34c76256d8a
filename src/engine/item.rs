//! Collectible memes: pool, exclusion-aware selection and pixel-space bounds.

use std::fmt;

use bevy::log::{debug, warn};
use bevy::math::{Rect, Vec2};

use super::{
    Catalog, Category, GameError, GameResult, GridPosition, RandomSource, normalize,
};

/// Opaque token naming the asset an item came from (the meme's file stem).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog key, see [`normalize`].
    pub fn key(&self) -> &str {
        normalize(&self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One spawnable asset and the width / height ratio of its image.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSource {
    pub id: SourceId,
    pub aspect_ratio: f32,
}

impl ItemSource {
    pub fn new(id: impl Into<String>, aspect_ratio: f32) -> Self {
        Self {
            id: SourceId::new(id),
            aspect_ratio,
        }
    }
}

/// Non-empty, read-only set of spawnable assets.
#[derive(Debug, Clone)]
pub struct ItemPool {
    sources: Vec<ItemSource>,
}

impl ItemPool {
    pub fn new(sources: Vec<ItemSource>) -> GameResult<Self> {
        if sources.is_empty() {
            return Err(GameError::EmptyItemPool);
        }
        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemSource> {
        self.sources.iter()
    }

    /// Uniform choice among sources not in `excluded`.
    ///
    /// When the exclusion covers the whole pool the choice widens to every source.
    pub fn choose<R: RandomSource + ?Sized>(
        &self,
        excluded: &[SourceId],
        rng: &mut R,
    ) -> &ItemSource {
        let candidates: Vec<&ItemSource> = self
            .sources
            .iter()
            .filter(|source| !excluded.contains(&source.id))
            .collect();

        if candidates.is_empty() {
            warn!(
                "All {} item sources are excluded, choosing from the full pool",
                self.sources.len()
            );
            return &self.sources[rng.next(0..self.sources.len())];
        }
        candidates[rng.next(0..candidates.len())]
    }
}

/// Pixel metrics shared by items and the train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelLayout {
    pub cell_size: f32,
    pub item_width: f32,
}

impl PixelLayout {
    /// Top-left pixel of a cell; also the anchor used for pickups.
    pub fn anchor(&self, position: GridPosition) -> Vec2 {
        Vec2::new(
            position.col as f32 * self.cell_size,
            position.row as f32 * self.cell_size,
        )
    }
}

/// Height of an image scaled to `width`, keeping its aspect ratio.
pub fn scaled_height(width: f32, aspect_ratio: f32) -> f32 {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        (width / aspect_ratio).floor()
    } else {
        width
    }
}

/// Pixel size of `source` drawn at the layout's item width.
pub fn footprint(layout: &PixelLayout, source: &ItemSource) -> Vec2 {
    Vec2::new(
        layout.item_width,
        scaled_height(layout.item_width, source.aspect_ratio),
    )
}

/// Rectangle of an item drawn at `position`, in pixel space with y growing down.
pub fn bounding_box(layout: &PixelLayout, position: GridPosition, size: Vec2) -> Rect {
    let origin = layout.anchor(position);
    Rect::from_corners(origin, origin + size)
}

/// A meme currently on the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    source: SourceId,
    category: Option<Category>,
    position: GridPosition,
    size: Vec2,
    bounds: Rect,
}

impl Item {
    pub fn new(
        source: &ItemSource,
        position: GridPosition,
        catalog: &Catalog,
        layout: &PixelLayout,
    ) -> Self {
        let size = footprint(layout, source);
        let category = catalog.category_for(source.id.key()).cloned();
        if category.is_none() {
            debug!("No team found for meme {}", source.id);
        }

        Self {
            source: source.id.clone(),
            category,
            position,
            size,
            bounds: bounding_box(layout, position, size),
        }
    }

    /// Picks a source from `pool` minus `excluded` and places it at `position`.
    pub fn spawn<R: RandomSource + ?Sized>(
        pool: &ItemPool,
        excluded: &[SourceId],
        position: GridPosition,
        catalog: &Catalog,
        layout: &PixelLayout,
        rng: &mut R,
    ) -> Self {
        Self::spawn_with(pool, excluded, catalog, layout, rng, |_, _| position)
    }

    /// Like [`Item::spawn`], but the cell is chosen by `place` once the
    /// source and therefore the item's pixel size are known.
    pub fn spawn_with<R, P>(
        pool: &ItemPool,
        excluded: &[SourceId],
        catalog: &Catalog,
        layout: &PixelLayout,
        rng: &mut R,
        place: P,
    ) -> Self
    where
        R: RandomSource + ?Sized,
        P: FnOnce(Vec2, &mut R) -> GridPosition,
    {
        let source = pool.choose(excluded, rng);
        let position = place(footprint(layout, source), rng);
        let item = Self::new(source, position, catalog, layout);
        debug!(
            "Spawned meme {} ({}) at {:?}, {}x{} px",
            item.source,
            item.category
                .as_ref()
                .map_or("no team", |category| category.as_str()),
            item.position,
            item.size.x,
            item.size.y
        );
        item
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Driver key, used to pick the item's cue.
    pub fn key(&self) -> &str {
        self.source.key()
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random::ScriptedRandom;

    fn layout() -> PixelLayout {
        PixelLayout {
            cell_size: 60.0,
            item_width: 150.0,
        }
    }

    fn pool() -> ItemPool {
        ItemPool::new(vec![
            ItemSource::new("verstappen1", 1.5),
            ItemSource::new("norris1", 1.0),
            ItemSource::new("toto2", 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(
            ItemPool::new(Vec::new()),
            Err(GameError::EmptyItemPool)
        ));
    }

    #[test]
    fn test_choose_skips_excluded() {
        let pool = pool();
        let excluded = [SourceId::new("verstappen1")];
        for offset in 0..6 {
            let mut rng = ScriptedRandom::new([offset]);
            assert_ne!(pool.choose(&excluded, &mut rng).id, excluded[0]);
        }
    }

    #[test]
    fn test_choose_widens_when_everything_excluded() {
        let pool = pool();
        let excluded: Vec<SourceId> = pool.iter().map(|source| source.id.clone()).collect();
        let mut rng = ScriptedRandom::new([2]);
        assert_eq!(pool.choose(&excluded, &mut rng).id, SourceId::new("toto2"));
    }

    #[test]
    fn test_category_from_catalog() {
        let catalog = Catalog::from_entries([("verstappen", "redbull")]);
        let item = Item::new(
            &ItemSource::new("verstappen4", 1.5),
            GridPosition::new(1, 1),
            &catalog,
            &layout(),
        );
        assert_eq!(item.key(), "verstappen");
        assert_eq!(item.category(), Some(&Category::new("redbull")));
    }

    #[test]
    fn test_unknown_driver_has_no_category() {
        let catalog = Catalog::from_entries([("verstappen", "redbull")]);
        let item = Item::new(
            &ItemSource::new("toto2", 2.0),
            GridPosition::new(1, 1),
            &catalog,
            &layout(),
        );
        assert_eq!(item.category(), None);
    }

    #[test]
    fn test_bounding_box_keeps_aspect_ratio() {
        let item = Item::new(
            &ItemSource::new("norris1", 1.6),
            GridPosition::new(3, 2),
            &Catalog::default(),
            &layout(),
        );
        let bounds = item.bounds();
        assert_eq!(bounds.min, Vec2::new(180.0, 120.0));
        assert_eq!(bounds.width(), 150.0);
        // 150 / 1.6 = 93.75, truncated like a pixel height
        assert_eq!(bounds.height(), 93.0);
    }

    #[test]
    fn test_spawn_with_places_after_choosing() {
        let pool = pool();
        let excluded = [SourceId::new("verstappen1"), SourceId::new("norris1")];
        let mut rng = ScriptedRandom::new([0]);
        let item = Item::spawn_with(
            &pool,
            &excluded,
            &Catalog::default(),
            &layout(),
            &mut rng,
            |size, _| {
                // toto2 is twice as wide as it is tall
                assert_eq!(size, Vec2::new(150.0, 75.0));
                GridPosition::new(4, 3)
            },
        );
        assert_eq!(item.source(), &SourceId::new("toto2"));
        assert_eq!(item.position(), GridPosition::new(4, 3));
        assert_eq!(item.size(), Vec2::new(150.0, 75.0));
    }

    #[test]
    fn test_degenerate_aspect_ratio() {
        assert_eq!(scaled_height(150.0, 0.0), 150.0);
        assert_eq!(scaled_height(150.0, f32::NAN), 150.0);
    }
}
