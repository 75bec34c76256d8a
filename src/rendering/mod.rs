//! Rendering plugin - pixel/world conversion, bonus backdrop, pickup flash,
//! camera shake and clearing the field when the menu returns.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;

use crate::engine::{Background, FrameSink, FrameSnapshot, GameState, GridPosition, Item};
use crate::game::{
    BONUS_BACKDROP_IMAGE, BonusBackdrop, CELL_SIZE, CameraShake, FrameRendered, MemeCollected,
    MemeSprite, PICKUP_FLASH_COLOR, PhaseChanged, PulseEffect, TrainCar, WINDOW_HEIGHT,
    WINDOW_WIDTH, Z_BACKDROP, Z_EFFECT,
};

/// Plugin for rendering and visual effects.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_backdrop).add_systems(
            Update,
            (
                update_backdrop,
                clear_field_on_menu,
                spawn_pickup_flash,
                pulse_effect_system,
                trigger_camera_shake_on_crash,
                camera_shake_system,
            )
                .chain(),
        );
    }
}

impl FrameSink for MessageWriter<'_, FrameRendered> {
    fn render(&mut self, frame: FrameSnapshot) {
        self.write(FrameRendered(frame));
    }
}

/// Converts a window pixel (origin top-left, y down) to world space
/// (origin at the window center, y up).
pub fn pixel_to_world(pixel: Vec2) -> Vec2 {
    Vec2::new(
        pixel.x - WINDOW_WIDTH as f32 / 2.0,
        WINDOW_HEIGHT as f32 / 2.0 - pixel.y,
    )
}

/// World-space center of a grid cell.
pub fn cell_center(position: GridPosition) -> Vec2 {
    let cell = CELL_SIZE as f32;
    pixel_to_world(Vec2::new(
        (position.col as f32 + 0.5) * cell,
        (position.row as f32 + 0.5) * cell,
    ))
}

/// World-space center of an item's bounding box.
pub fn item_center(item: &Item) -> Vec2 {
    pixel_to_world(item.bounds().center())
}

/// Startup system spawning the hidden bonus backdrop.
fn setup_backdrop(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Sprite {
            image: asset_server.load(BONUS_BACKDROP_IMAGE),
            custom_size: Some(Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_BACKDROP),
        Visibility::Hidden,
        BonusBackdrop,
    ));
}

/// System to show the backdrop while the frame is in bonus mode.
fn update_backdrop(
    mut frames: MessageReader<FrameRendered>,
    mut backdrops: Query<&mut Visibility, With<BonusBackdrop>>,
) {
    let Some(FrameRendered(frame)) = frames.read().last() else {
        return;
    };

    let visibility = match frame.background {
        Background::Bonus => Visibility::Visible,
        Background::Normal => Visibility::Hidden,
    };
    for mut backdrop in backdrops.iter_mut() {
        *backdrop = visibility;
    }
}

/// System to clear the train, the meme and the backdrop when the menu returns.
fn clear_field_on_menu(
    mut commands: Commands,
    mut phases: MessageReader<PhaseChanged>,
    field: Query<Entity, Or<(With<TrainCar>, With<MemeSprite>)>>,
    mut backdrops: Query<&mut Visibility, With<BonusBackdrop>>,
) {
    if !phases
        .read()
        .any(|PhaseChanged(state)| *state == GameState::Menu)
    {
        return;
    }

    for entity in field.iter() {
        commands.entity(entity).despawn();
    }
    for mut backdrop in backdrops.iter_mut() {
        *backdrop = Visibility::Hidden;
    }
}

/// System to spawn visual effect when a meme is collected.
fn spawn_pickup_flash(mut commands: Commands, mut collected: MessageReader<MemeCollected>) {
    for MemeCollected { item } in collected.read() {
        let center = item_center(item);
        commands.spawn((
            ShapeBundle::circle(
                &ShapeConfig {
                    color: PICKUP_FLASH_COLOR,
                    alpha_mode: ShapeAlphaMode::Add,
                    transform: Transform::from_translation(center.extend(Z_EFFECT)),
                    ..ShapeConfig::default_2d()
                },
                item.size().x / 2.0,
            ),
            PulseEffect {
                timer: Timer::from_seconds(0.3, TimerMode::Once),
                start_scale: 1.0,
                end_scale: 1.8,
            },
        ));
    }
}

/// System to handle pulse effects (for the pickup flash).
fn pulse_effect_system(
    mut commands: Commands,
    time: Res<Time>,
    mut effects: Query<(Entity, &mut Transform, &mut PulseEffect)>,
) {
    for (entity, mut transform, mut effect) in effects.iter_mut() {
        effect.timer.tick(time.delta());

        if effect.timer.is_finished() {
            commands.entity(entity).despawn();
        } else {
            let progress = effect.timer.fraction();
            let scale = effect.start_scale + (effect.end_scale - effect.start_scale) * progress;
            transform.scale = Vec3::splat(scale);
        }
    }
}

/// System to trigger camera shake when the train crashes.
fn trigger_camera_shake_on_crash(
    mut phases: MessageReader<PhaseChanged>,
    mut camera_shake: ResMut<CameraShake>,
) {
    if phases
        .read()
        .any(|PhaseChanged(state)| *state == GameState::GameOver)
    {
        camera_shake.start(0.5, 12.0);
    }
}

/// System to apply camera shake effect.
fn camera_shake_system(
    time: Res<Time>,
    mut camera_shake: ResMut<CameraShake>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Some(offset) = camera_shake.advance(time.delta(), &mut rand::rng()) else {
        return;
    };
    for mut transform in &mut cameras {
        transform.translation.x = offset.x;
        transform.translation.y = offset.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Catalog, ItemSource, PixelLayout};

    #[test]
    fn test_pixel_to_world_corners() {
        assert_eq!(pixel_to_world(Vec2::ZERO), Vec2::new(-600.0, 400.0));
        assert_eq!(
            pixel_to_world(Vec2::new(1200.0, 800.0)),
            Vec2::new(600.0, -400.0)
        );
    }

    #[test]
    fn test_cell_center() {
        assert_eq!(
            cell_center(GridPosition::new(0, 0)),
            Vec2::new(-570.0, 370.0)
        );
        assert_eq!(
            cell_center(GridPosition::new(10, 6)),
            Vec2::new(30.0, 10.0)
        );
    }

    #[test]
    fn test_item_center() {
        let item = Item::new(
            &ItemSource::new("norris1", 1.5),
            GridPosition::new(2, 1),
            &Catalog::default(),
            &PixelLayout {
                cell_size: 60.0,
                item_width: 150.0,
            },
        );
        // Box spans (120, 60) to (270, 160).
        assert_eq!(item_center(&item), Vec2::new(-405.0, 290.0));
    }
}
