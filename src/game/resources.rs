//! Game resources (singleton state).

use std::collections::HashMap;
use std::time::Duration;

use bevy::asset::LoadedFolder;
use bevy::prelude::*;
use rand::Rng;

use crate::engine::{Catalog, Difficulty, GameSession, InputEvent, SourceId};

/// The running session. Inserted once every asset has loaded.
#[derive(Resource, Deref, DerefMut)]
pub struct Session(pub GameSession);

/// Input events waiting for the next session update.
#[derive(Resource, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Simulation clock; its period follows the chosen difficulty.
#[derive(Resource)]
pub struct TickTimer(pub Timer);

impl Default for TickTimer {
    fn default() -> Self {
        TickTimer::for_difficulty(Difficulty::default())
    }
}

impl TickTimer {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        TickTimer(Timer::new(difficulty.tick_interval(), TimerMode::Repeating))
    }
}

/// Speed tier highlighted in the menu.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct DifficultySelection(pub Difficulty);

/// `drivers.json`, parsed by the meme plugin's loader.
#[derive(Asset, TypePath, Debug)]
pub struct CatalogAsset(pub Catalog);

/// Catalog and asset folders requested at startup.
#[derive(Resource)]
pub struct LoadingAssets {
    pub catalog: Handle<CatalogAsset>,
    pub memes: Handle<LoadedFolder>,
    pub sounds: Handle<LoadedFolder>,
}

/// Meme image for every pool entry.
#[derive(Resource, Default)]
pub struct MemeImages {
    pub images: HashMap<SourceId, Handle<Image>>,
}

/// Sound for every cue token, keyed by file stem.
#[derive(Resource, Default)]
pub struct CueLibrary {
    pub cues: HashMap<String, Handle<AudioSource>>,
}

impl CueLibrary {
    /// Sound for `token`, or for `fallback` when the token has none.
    pub fn resolve(&self, token: &str, fallback: &str) -> Option<Handle<AudioSource>> {
        self.cues
            .get(token)
            .or_else(|| self.cues.get(fallback))
            .cloned()
    }
}

/// Resource for camera shake effect.
#[derive(Resource)]
pub struct CameraShake {
    pub timer: Timer,
    pub intensity: f32,
}

impl CameraShake {
    pub fn start(&mut self, seconds: f32, intensity: f32) {
        self.timer = Timer::from_seconds(seconds, TimerMode::Once);
        self.intensity = intensity;
    }

    /// Advances the shake and returns the camera offset for this frame.
    ///
    /// The offset decays linearly and is `Vec2::ZERO` on the frame the shake
    /// settles; `None` once it has settled.
    pub fn advance(&mut self, delta: Duration, rng: &mut impl Rng) -> Option<Vec2> {
        if self.timer.is_finished() {
            return None;
        }
        self.timer.tick(delta);
        if self.timer.is_finished() {
            return Some(Vec2::ZERO);
        }
        let reach = self.intensity * (1.0 - self.timer.fraction());
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
        Some(jitter * reach)
    }
}

impl Default for CameraShake {
    fn default() -> Self {
        CameraShake {
            timer: Timer::from_seconds(0.0, TimerMode::Once),
            intensity: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Key;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_input_queue_drains_in_order() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::KeyDown(Key::Left));
        queue.push(InputEvent::Quit);

        assert_eq!(
            queue.drain(),
            vec![InputEvent::KeyDown(Key::Left), InputEvent::Quit]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tick_timer_follows_difficulty() {
        let timer = TickTimer::for_difficulty(Difficulty::McLaren);
        assert_eq!(timer.0.duration(), Difficulty::McLaren.tick_interval());
    }

    #[test]
    fn test_cue_library_falls_back() {
        let mut library = CueLibrary::default();
        let radio = Handle::<AudioSource>::default();
        library.cues.insert("f1-radio".to_string(), radio.clone());

        assert_eq!(library.resolve("norris", "f1-radio"), Some(radio));
        assert_eq!(CueLibrary::default().resolve("norris", "f1-radio"), None);
    }

    #[test]
    fn test_camera_shake_decays_and_settles() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shake = CameraShake::default();
        shake.start(0.5, 12.0);

        for _ in 0..4 {
            let offset = shake.advance(Duration::from_millis(100), &mut rng).unwrap();
            assert!(offset.x.abs() <= 6.0 && offset.y.abs() <= 6.0);
        }
        assert_eq!(
            shake.advance(Duration::from_millis(100), &mut rng),
            Some(Vec2::ZERO)
        );
        assert_eq!(shake.advance(Duration::from_millis(100), &mut rng), None);
    }
}
