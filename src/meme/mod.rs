//! Meme plugin - loads the catalog, meme images and sounds, builds the
//! session once everything is in memory, and draws the current meme.

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext, LoadState, LoadedFolder, UntypedHandle};
use bevy::prelude::*;

use crate::engine::{
    Catalog, GameError, GameSession, Grid, ItemPool, ItemSource, PixelLayout, SessionConfig,
    SourceId,
};
use crate::game::{
    AudioCue, BONUS_CUE, BONUS_DRIVER, CATALOG_PATH, CELL_SIZE, CRASH_CUE, CatalogAsset,
    CueLibrary, FrameRendered, LoadingAssets, MEME_WIDTH, MEMES_FOLDER, MENU_CUE, MemeImages,
    MemePulse, MemeSprite, SOUNDS_FOLDER, SPAWN_MARGIN, Session, WIN_CUE, WINDOW_HEIGHT,
    WINDOW_WIDTH, Z_ITEM,
};
use crate::rendering::item_center;

/// Plugin for meme loading and drawing.
pub struct MemePlugin;

impl Plugin for MemePlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<CatalogAsset>()
            .register_asset_loader(CatalogLoader)
            .add_systems(Startup, load_assets)
            .add_systems(
            Update,
            (
                finish_loading.run_if(resource_exists::<LoadingAssets>),
                sync_meme,
                meme_pulse_animation,
            )
                .chain(),
        );
    }
}

/// Reads `drivers.json` through the asset server, so it resolves against the
/// same root as the images and sounds.
#[derive(Default, TypePath)]
struct CatalogLoader;

impl AssetLoader for CatalogLoader {
    type Asset = CatalogAsset;
    type Settings = ();
    type Error = GameError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<CatalogAsset, GameError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|source| GameError::CatalogIo {
                path: CATALOG_PATH.to_string(),
                source,
            })?;
        Ok(CatalogAsset(Catalog::from_json(&bytes)?))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Startup system requesting the catalog and the asset folders.
fn load_assets(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(LoadingAssets {
        catalog: asset_server.load(CATALOG_PATH),
        memes: asset_server.load_folder(MEMES_FOLDER),
        sounds: asset_server.load_folder(SOUNDS_FOLDER),
    });
}

/// Session tunables for the shipped field, meme size and sound set.
fn session_config() -> SessionConfig {
    SessionConfig {
        layout: PixelLayout {
            cell_size: CELL_SIZE as f32,
            item_width: MEME_WIDTH,
        },
        spawn_margin: SPAWN_MARGIN,
        bonus_key: Some(BONUS_DRIVER.to_string()),
        menu_cue: MENU_CUE.to_string(),
        crash_cue: CRASH_CUE.to_string(),
        win_cue: WIN_CUE.to_string(),
        bonus_cue: BONUS_CUE.to_string(),
    }
}

/// File stem of a loaded asset, used as its token.
fn file_stem(handle: &UntypedHandle) -> Option<String> {
    handle
        .path()?
        .path()
        .file_stem()?
        .to_str()
        .map(str::to_owned)
}

/// System to build the item pool and the session once the catalog and both
/// folders are loaded.
fn finish_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    loading: Res<LoadingAssets>,
    folders: Res<Assets<LoadedFolder>>,
    catalogs: Res<Assets<CatalogAsset>>,
    images: Res<Assets<Image>>,
    mut cues: MessageWriter<AudioCue>,
) -> Result {
    let requested = [
        (CATALOG_PATH, loading.catalog.id().untyped()),
        (MEMES_FOLDER, loading.memes.id().untyped()),
        (SOUNDS_FOLDER, loading.sounds.id().untyped()),
    ];
    for (name, id) in &requested {
        if let Some(LoadState::Failed(error)) = asset_server.get_load_state(*id) {
            return Err(GameError::AssetLoad {
                asset: name.to_string(),
                reason: error.to_string(),
            }
            .into());
        }
    }
    if !requested
        .iter()
        .all(|(_, id)| asset_server.is_loaded_with_dependencies(*id))
    {
        return Ok(());
    }

    let (Some(CatalogAsset(catalog)), Some(memes), Some(sounds)) = (
        catalogs.get(&loading.catalog),
        folders.get(&loading.memes),
        folders.get(&loading.sounds),
    ) else {
        return Ok(());
    };
    info!(
        "Loaded {} drivers in {} teams from {CATALOG_PATH}",
        catalog.len(),
        catalog.categories().len()
    );

    let mut meme_images = MemeImages::default();
    let mut sources = Vec::new();
    for handle in &memes.handles {
        let (Some(stem), Ok(image_handle)) = (file_stem(handle), handle.clone().try_typed::<Image>())
        else {
            continue;
        };
        let Some(image) = images.get(&image_handle) else {
            continue;
        };
        let aspect_ratio = image.width() as f32 / image.height().max(1) as f32;
        sources.push(ItemSource::new(stem.clone(), aspect_ratio));
        meme_images.images.insert(SourceId::new(stem), image_handle);
    }
    let pool = ItemPool::new(sources)?;

    let mut library = CueLibrary::default();
    for handle in &sounds.handles {
        if let (Some(stem), Ok(sound)) = (file_stem(handle), handle.clone().try_typed::<AudioSource>())
        {
            library.cues.insert(stem, sound);
        }
    }
    info!(
        "Loaded {} memes and {} sounds",
        pool.len(),
        library.cues.len()
    );

    let session = GameSession::new(
        Grid::from_pixels(WINDOW_WIDTH, WINDOW_HEIGHT, CELL_SIZE),
        catalog.clone(),
        pool,
        session_config(),
    );
    session.play_menu_theme(&mut cues);

    commands.insert_resource(Session(session));
    commands.insert_resource(meme_images);
    commands.insert_resource(library);
    commands.remove_resource::<LoadingAssets>();
    Ok(())
}

/// System to redraw the meme when the rendered frame shows a different one.
fn sync_meme(
    mut commands: Commands,
    mut frames: MessageReader<FrameRendered>,
    meme_images: Option<Res<MemeImages>>,
    memes: Query<(Entity, &MemeSprite)>,
) {
    let Some(FrameRendered(frame)) = frames.read().last() else {
        return;
    };
    let item = &frame.item;

    let unchanged = memes.iter().any(|(_, sprite)| {
        sprite.source == *item.source() && sprite.position == item.position()
    });
    if unchanged {
        return;
    }
    for (entity, _) in memes.iter() {
        commands.entity(entity).despawn();
    }

    let Some(image) = meme_images
        .as_ref()
        .and_then(|meme_images| meme_images.images.get(item.source()))
    else {
        warn!("No image loaded for meme {}", item.source());
        return;
    };

    commands.spawn((
        Sprite {
            image: image.clone(),
            custom_size: Some(item.size()),
            ..default()
        },
        Transform::from_translation(item_center(item).extend(Z_ITEM)),
        MemeSprite {
            source: item.source().clone(),
            position: item.position(),
        },
        MemePulse::for_background(frame.background),
    ));
}

/// System to animate the meme with a pulsing effect.
fn meme_pulse_animation(time: Res<Time>, mut memes: Query<(&mut Transform, &mut MemePulse)>) {
    for (mut transform, mut pulse) in &mut memes {
        pulse.timer.tick(time.delta());
        transform.scale = Vec3::splat(pulse.scale());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_catalog_parses() {
        let catalog = Catalog::from_json(include_str!("../../assets/drivers.json")).unwrap();
        assert_eq!(catalog.categories().len(), 5);
        assert!(catalog.category_for(BONUS_DRIVER).is_some());
    }

    #[test]
    fn test_session_config_matches_field() {
        let config = session_config();
        assert_eq!(config.layout.cell_size, CELL_SIZE as f32);
        assert_eq!(config.layout.item_width, MEME_WIDTH);
        assert_eq!(config.bonus_key.as_deref(), Some(BONUS_DRIVER));
    }

    #[test]
    fn test_catalog_path_is_under_asset_root() {
        // Relative to the asset server root, like the meme and sound folders.
        assert!(!CATALOG_PATH.starts_with("assets/"));
        assert!(CatalogLoader.extensions().iter().any(|ext| CATALOG_PATH.ends_with(*ext)));
    }
}
