use bevy::{prelude::*, window::WindowResolution};
use bevy_vector_shapes::prelude::*;

use meme_train::audio::CuePlugin;
use meme_train::game::{
    AudioCue, BACKGROUND_COLOR, CameraShake, DifficultySelection, FrameRendered, InputQueue,
    MemeCollected, PhaseChanged, TickTimer, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use meme_train::meme::MemePlugin;
use meme_train::rendering::RenderingPlugin;
use meme_train::train::TrainPlugin;
use meme_train::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                    title: "Choo choo...all aboard the meme train.".to_string(),
                    resizable: false,
                    ..default()
                }),
                // The session decides when a close request ends the game.
                close_when_requested: false,
                ..default()
            }),
            Shape2dPlugin::default(),
        ))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .init_resource::<InputQueue>()
        .init_resource::<TickTimer>()
        .init_resource::<DifficultySelection>()
        .init_resource::<CameraShake>()
        .add_message::<AudioCue>()
        .add_message::<FrameRendered>()
        .add_message::<MemeCollected>()
        .add_message::<PhaseChanged>()
        .add_plugins((
            MemePlugin,
            TrainPlugin,
            CuePlugin,
            RenderingPlugin,
            UiPlugin,
        ))
        .run();
}
