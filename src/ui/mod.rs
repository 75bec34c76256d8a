//! UI plugin - camera, start menu with the speed selector, team tally and
//! the crash and win screens.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;

use crate::engine::{Difficulty, GameState, PICKUPS_PER_CATEGORY};
use crate::game::{
    ALERT_COLOR, ARENA_BORDER_COLOR, AudioCue, CELL_SIZE, CRASH_IMAGE, DifficultySelection, FONT,
    FinishUI, FrameRendered, InputQueue, MENU_ACCENT_COLOR, MenuUI, OVERLAY_IMAGE_WIDTH,
    PhaseChanged, Session, SpeedText, TITLE_COLOR, TallyText, TickTimer, WIN_IMAGE, WINDOW_HEIGHT,
    WINDOW_WIDTH,
};

/// Plugin for UI and game flow systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_system).add_systems(
            Update,
            (
                spawn_menu_when_idle,
                menu_input,
                despawn_stale_screens,
                spawn_finish_screen,
                update_tally_text,
            )
                .chain(),
        );
    }
}

/// Initial setup system - camera, field border, tally text.
fn setup_system(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn(Camera2d);

    // Outline of the play field, which is the window trimmed to whole cells.
    let field_width = (WINDOW_WIDTH / CELL_SIZE * CELL_SIZE) as f32;
    let field_height = (WINDOW_HEIGHT / CELL_SIZE * CELL_SIZE) as f32;
    commands.spawn(ShapeBundle::rect(
        &ShapeConfig {
            color: ARENA_BORDER_COLOR,
            hollow: true,
            thickness: 2.0,
            transform: Transform::from_xyz(
                field_width / 2.0 - WINDOW_WIDTH as f32 / 2.0,
                WINDOW_HEIGHT as f32 / 2.0 - field_height / 2.0,
                0.1,
            ),
            ..ShapeConfig::default_2d()
        },
        Vec2::new(field_width, field_height),
    ));

    commands.spawn((
        Text::default(),
        TextFont {
            font: asset_server.load(FONT),
            font_size: 18.0,
            ..default()
        },
        TextColor(TITLE_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        TallyText,
    ));
}

fn speed_label(difficulty: Difficulty) -> String {
    format!("Speed :  < {} >", difficulty.label())
}

/// Spawns the start menu UI.
fn spawn_start_menu(
    commands: &mut Commands,
    asset_server: &Res<AssetServer>,
    difficulty: Difficulty,
) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            MenuUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::from("F1 MemeTrain"),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 64.0,
                    ..default()
                },
                TextColor(TITLE_COLOR),
                BackgroundColor(Color::srgba(0.02, 0.18, 0.49, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    padding: UiRect::axes(Val::Px(20.0), Val::Px(6.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from(speed_label(difficulty)),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 28.0,
                    ..default()
                },
                TextColor(MENU_ACCENT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(15.0)),
                    ..default()
                },
                SpeedText,
            ));

            parent.spawn((
                Text::from("Left / Right to pick a team's pace"),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(10.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from(format!(
                    "Collect every team {PICKUPS_PER_CATEGORY} times. Don't hit your own train!"
                )),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from("Press SPACE to play, ESC to quit"),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 24.0,
                    ..default()
                },
                TextColor(MENU_ACCENT_COLOR),
            ));
        });
}

/// Spawns the crash or win screen UI.
fn spawn_finish_overlay(commands: &mut Commands, asset_server: &Res<AssetServer>, won: bool) {
    let (image, headline) = if won {
        (WIN_IMAGE, "You collected all the things!  Nice!")
    } else {
        (CRASH_IMAGE, "No Mikey! No!")
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            FinishUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                ImageNode::new(asset_server.load(image)),
                Node {
                    width: Val::Px(OVERLAY_IMAGE_WIDTH),
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from(headline),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 36.0,
                    ..default()
                },
                TextColor(ALERT_COLOR),
                BackgroundColor(Color::BLACK),
                Node {
                    margin: UiRect::bottom(Val::Px(10.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::from("Press space key to exit"),
                TextFont {
                    font: asset_server.load(FONT),
                    font_size: 36.0,
                    ..default()
                },
                TextColor(ALERT_COLOR),
                BackgroundColor(Color::BLACK),
            ));
        });
}

/// System to show the start menu whenever the session sits in the menu.
fn spawn_menu_when_idle(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    session: Option<Res<Session>>,
    selection: Res<DifficultySelection>,
    menu_ui: Query<Entity, With<MenuUI>>,
) {
    let Some(session) = session else {
        return;
    };
    if session.state() == GameState::Menu && menu_ui.is_empty() {
        spawn_start_menu(&mut commands, &asset_server, **selection);
    }
}

/// System to drive the start menu: pick a speed, start, or quit.
#[allow(clippy::too_many_arguments)]
fn menu_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    session: Option<ResMut<Session>>,
    mut selection: ResMut<DifficultySelection>,
    mut timer: ResMut<TickTimer>,
    mut queue: ResMut<InputQueue>,
    mut phases: ParamSet<(MessageReader<PhaseChanged>, MessageWriter<PhaseChanged>)>,
    mut cues: MessageWriter<AudioCue>,
    mut frames: MessageWriter<FrameRendered>,
    mut exit: MessageWriter<AppExit>,
    mut speed_text: Query<&mut Text, With<SpeedText>>,
) -> Result {
    // Keys that ended the previous phase must not also act on the menu.
    if phases.p0().read().count() > 0 {
        return Ok(());
    }
    let Some(mut session) = session else {
        return Ok(());
    };
    if session.state() != GameState::Menu {
        return Ok(());
    }

    if keyboard_input.just_pressed(KeyCode::Escape) {
        info!("Quit from the menu");
        exit.write(AppExit::Success);
        return Ok(());
    }

    let previous = **selection;
    if keyboard_input.just_pressed(KeyCode::ArrowLeft) {
        **selection = selection.previous();
    }
    if keyboard_input.just_pressed(KeyCode::ArrowRight) {
        **selection = selection.next();
    }
    if **selection != previous {
        debug!("Difficulty set to {}", selection.label());
        for mut text in speed_text.iter_mut() {
            *text = Text::from(speed_label(**selection));
        }
    }

    if keyboard_input.just_pressed(KeyCode::Space) || keyboard_input.just_pressed(KeyCode::Enter)
    {
        let mut rng = rand::rng();
        session.start(**selection, &mut rng, &mut cues)?;

        *timer = TickTimer::for_difficulty(**selection);
        queue.clear();
        phases.p1().write(PhaseChanged(GameState::Playing));
        if let Some(frame) = session.snapshot() {
            frames.write(FrameRendered(frame));
        }
    }
    Ok(())
}

/// System to remove the menu once play starts and the finish screen once the
/// menu returns.
fn despawn_stale_screens(
    mut commands: Commands,
    mut phases: MessageReader<PhaseChanged>,
    menu_ui: Query<Entity, With<MenuUI>>,
    finish_ui: Query<Entity, With<FinishUI>>,
) {
    for PhaseChanged(state) in phases.read() {
        let stale: Vec<Entity> = match state {
            GameState::Playing => menu_ui.iter().collect(),
            GameState::Menu => finish_ui.iter().collect(),
            GameState::GameOver | GameState::Win => continue,
        };
        for entity in stale {
            commands.entity(entity).despawn_children();
            commands.entity(entity).despawn();
        }
    }
}

/// System to spawn the crash or win screen when the session finishes.
fn spawn_finish_screen(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut phases: MessageReader<PhaseChanged>,
    finish_ui: Query<Entity, With<FinishUI>>,
) {
    for PhaseChanged(state) in phases.read() {
        let won = match state {
            GameState::Win => true,
            GameState::GameOver => false,
            GameState::Menu | GameState::Playing => continue,
        };
        if finish_ui.is_empty() {
            spawn_finish_overlay(&mut commands, &asset_server, won);
        }
    }
}

/// System to update the collected-team tally.
fn update_tally_text(
    session: Option<Res<Session>>,
    mut query: Query<&mut Text, With<TallyText>>,
) {
    let Some(session) = session else {
        return;
    };
    if !session.is_changed() {
        return;
    }

    let text = if session.state() == GameState::Menu {
        String::new()
    } else {
        tally_line(&session)
    };
    if let Ok(mut tally) = query.single_mut() {
        *tally = Text::from(text);
    }
}

/// "team n/2" for every team in the catalog.
fn tally_line(session: &Session) -> String {
    session
        .catalog()
        .categories()
        .iter()
        .map(|team| {
            let count = session.progress().count(team).min(PICKUPS_PER_CATEGORY);
            format!("{team} {count}/{PICKUPS_PER_CATEGORY}")
        })
        .collect::<Vec<_>>()
        .join("   ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_label() {
        assert_eq!(speed_label(Difficulty::RedBull), "Speed :  < Red Bull >");
    }
}
