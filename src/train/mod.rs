//! Train plugin - feeds input to the session on the tick clock, waits for
//! acknowledgment after a finish, and draws the cars.

use bevy::{prelude::*, window::WindowCloseRequested};
use bevy_vector_shapes::prelude::*;

use crate::engine::{FrameOutcome, GameState, InputEvent, Key, Livery};
use crate::game::{
    AudioCue, CAR_SIZE, CARS_FOLDER, FrameRendered, InputQueue, MemeCollected, PhaseChanged,
    SAFETY_CAR_IMAGE, Session, TickTimer, TrainCar, UNMARKED_CAR_COLOR, Z_CAR,
};
use crate::rendering::cell_center;

/// Plugin for session-driving and train systems.
pub struct TrainPlugin;

impl Plugin for TrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (capture_input, advance_session, poll_session, sync_train).chain(),
        );
    }
}

/// Maps a keyboard key to the session's key vocabulary.
pub fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Key::Up,
        KeyCode::ArrowDown | KeyCode::KeyS => Key::Down,
        KeyCode::ArrowLeft | KeyCode::KeyA => Key::Left,
        KeyCode::ArrowRight | KeyCode::KeyD => Key::Right,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        _ => Key::Other,
    }
}

/// System to queue key presses and window close requests for the session.
fn capture_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut close_requests: MessageReader<WindowCloseRequested>,
    mut queue: ResMut<InputQueue>,
    session: Option<Res<Session>>,
) {
    if close_requests.read().next().is_some() {
        queue.push(InputEvent::Quit);
    }

    // The menu reads the keyboard itself.
    let Some(session) = session else {
        return;
    };
    if session.state() == GameState::Menu {
        return;
    }

    for code in keyboard_input.get_just_pressed() {
        queue.push(InputEvent::KeyDown(key_from_code(*code)));
    }
}

/// System to run one simulation tick whenever the tick clock fires.
#[allow(clippy::too_many_arguments)]
fn advance_session(
    time: Res<Time>,
    mut timer: ResMut<TickTimer>,
    session: Option<ResMut<Session>>,
    mut queue: ResMut<InputQueue>,
    mut cues: MessageWriter<AudioCue>,
    mut frames: MessageWriter<FrameRendered>,
    mut collected: MessageWriter<MemeCollected>,
    mut phases: MessageWriter<PhaseChanged>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.state() != GameState::Playing {
        return;
    }

    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let mut rng = rand::rng();
    let outcome = session.update(queue.drain(), &mut rng, &mut cues, &mut frames);
    report_outcome(outcome, &mut collected, &mut phases, &mut exit);
}

/// System to poll the session outside of play: the crash and win screens
/// wait here for the acknowledgment key, and a close request always quits.
#[allow(clippy::too_many_arguments)]
fn poll_session(
    session: Option<ResMut<Session>>,
    mut queue: ResMut<InputQueue>,
    mut cues: MessageWriter<AudioCue>,
    mut frames: MessageWriter<FrameRendered>,
    mut collected: MessageWriter<MemeCollected>,
    mut phases: MessageWriter<PhaseChanged>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(mut session) = session else {
        // Still loading.
        if queue.drain().contains(&InputEvent::Quit) {
            exit.write(AppExit::Success);
        }
        return;
    };
    if session.state() == GameState::Playing || queue.is_empty() {
        return;
    }

    let mut rng = rand::rng();
    let outcome = session.update(queue.drain(), &mut rng, &mut cues, &mut frames);
    report_outcome(outcome, &mut collected, &mut phases, &mut exit);
}

/// Turns a session outcome into messages for the other plugins.
fn report_outcome(
    outcome: FrameOutcome,
    collected: &mut MessageWriter<MemeCollected>,
    phases: &mut MessageWriter<PhaseChanged>,
    exit: &mut MessageWriter<AppExit>,
) {
    match outcome {
        FrameOutcome::Idle | FrameOutcome::Moved => {}
        FrameOutcome::Picked(item) => {
            collected.write(MemeCollected { item });
        }
        FrameOutcome::Won(item) => {
            collected.write(MemeCollected { item });
            phases.write(PhaseChanged(GameState::Win));
        }
        FrameOutcome::Crashed => {
            phases.write(PhaseChanged(GameState::GameOver));
        }
        FrameOutcome::ExitedToMenu | FrameOutcome::Acknowledged => {
            phases.write(PhaseChanged(GameState::Menu));
        }
        FrameOutcome::Quit => {
            info!("Quit requested");
            exit.write(AppExit::Success);
        }
    }
}

/// System to redraw the train from the latest rendered frame.
fn sync_train(
    mut commands: Commands,
    mut frames: MessageReader<FrameRendered>,
    asset_server: Res<AssetServer>,
    cars: Query<Entity, With<TrainCar>>,
) {
    let Some(FrameRendered(frame)) = frames.read().last() else {
        return;
    };

    for entity in cars.iter() {
        commands.entity(entity).despawn();
    }

    let cars = frame
        .segments
        .iter()
        .zip(&frame.orientations)
        .zip(&frame.liveries)
        .enumerate();
    for (index, ((position, facing), livery)) in cars {
        let transform = Transform::from_translation(cell_center(*position).extend(Z_CAR))
            .with_rotation(Quat::from_rotation_z(facing.angle_degrees().to_radians()));

        match livery {
            Livery::SafetyCar => {
                commands.spawn((
                    Sprite {
                        image: asset_server.load(SAFETY_CAR_IMAGE),
                        custom_size: Some(CAR_SIZE),
                        ..default()
                    },
                    transform,
                    TrainCar { index },
                ));
            }
            Livery::Team(team) => {
                commands.spawn((
                    Sprite {
                        image: asset_server.load(format!("{CARS_FOLDER}/{team}.png")),
                        custom_size: Some(CAR_SIZE),
                        ..default()
                    },
                    transform,
                    TrainCar { index },
                ));
            }
            Livery::Unmarked => {
                commands.spawn((
                    ShapeBundle::rect(
                        &ShapeConfig {
                            color: UNMARKED_CAR_COLOR,
                            corner_radii: Vec4::splat(0.3),
                            transform,
                            ..ShapeConfig::default_2d()
                        },
                        CAR_SIZE,
                    ),
                    TrainCar { index },
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_and_wasd_steer() {
        assert_eq!(key_from_code(KeyCode::ArrowUp), Key::Up);
        assert_eq!(key_from_code(KeyCode::KeyW), Key::Up);
        assert_eq!(key_from_code(KeyCode::KeyA), Key::Left);
        assert_eq!(key_from_code(KeyCode::ArrowRight), Key::Right);
        assert_eq!(key_from_code(KeyCode::KeyS), Key::Down);
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(key_from_code(KeyCode::Escape), Key::Escape);
        assert_eq!(key_from_code(KeyCode::Space), Key::Space);
        assert_eq!(key_from_code(KeyCode::KeyQ), Key::Other);
    }
}
