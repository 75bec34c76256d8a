//! Cue plugin - plays, loops and stops the session's audio cues.

use bevy::prelude::*;

use crate::engine::AudioSink;
use crate::game::{AudioCue, CueLibrary, CuePlayback, FALLBACK_CUE};

/// Plugin for audio cue playback.
pub struct CuePlugin;

impl Plugin for CuePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, play_cues);
    }
}

impl AudioSink for MessageWriter<'_, AudioCue> {
    fn play_cue(&mut self, token: &str) {
        self.write(AudioCue::Play(token.to_string()));
    }

    fn play_looping_cue(&mut self, token: &str) {
        self.write(AudioCue::Loop(token.to_string()));
    }

    fn stop_cue(&mut self) {
        self.write(AudioCue::Stop);
    }
}

/// System to turn cue messages into audio entities.
fn play_cues(
    mut commands: Commands,
    mut cues: MessageReader<AudioCue>,
    library: Option<Res<CueLibrary>>,
    playing: Query<Entity, With<CuePlayback>>,
) {
    // Leave the messages unread until the sounds have loaded.
    let Some(library) = library else {
        return;
    };

    let mut stopped = false;
    let mut started = Vec::new();
    for cue in cues.read() {
        let (token, settings) = match cue {
            AudioCue::Stop => {
                if !stopped {
                    for entity in playing.iter() {
                        commands.entity(entity).despawn();
                    }
                    stopped = true;
                }
                for entity in started.drain(..) {
                    commands.entity(entity).despawn();
                }
                continue;
            }
            AudioCue::Play(token) => (token, PlaybackSettings::DESPAWN),
            AudioCue::Loop(token) => (token, PlaybackSettings::LOOP),
        };

        let Some(sound) = library.resolve(token, FALLBACK_CUE) else {
            warn!("No sound found for cue {token}");
            continue;
        };
        debug!("Playing cue {token}");
        started.push(
            commands
                .spawn((AudioPlayer::new(sound), settings, CuePlayback))
                .id(),
        );
    }
}
