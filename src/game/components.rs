//! ECS components for the meme train.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::engine::{Background, GridPosition, SourceId};

/// One car of the train, by index from the safety car.
#[derive(Component)]
pub struct TrainCar {
    pub index: usize,
}

/// The meme currently on the field.
#[derive(Component)]
pub struct MemeSprite {
    pub source: SourceId,
    pub position: GridPosition,
}

/// Breathing scale of the meme on the field. Bonus memes swing wider.
#[derive(Component)]
pub struct MemePulse {
    pub timer: Timer,
    pub amplitude: f32,
}

impl MemePulse {
    pub fn for_background(background: Background) -> Self {
        let amplitude = match background {
            Background::Normal => 0.05,
            Background::Bonus => 0.12,
        };
        Self {
            timer: Timer::from_seconds(0.8, TimerMode::Repeating),
            amplitude,
        }
    }

    /// Scale at the current point of the cycle.
    pub fn scale(&self) -> f32 {
        1.0 + (self.timer.fraction() * TAU).sin() * self.amplitude
    }
}

/// Component for entities that should flash/pulse.
#[derive(Component)]
pub struct PulseEffect {
    pub timer: Timer,
    pub start_scale: f32,
    pub end_scale: f32,
}

/// Full-window backdrop shown in bonus mode.
#[derive(Component)]
pub struct BonusBackdrop;

/// An audio entity started from a cue.
#[derive(Component)]
pub struct CuePlayback;

/// Component to mark the team tally UI element.
#[derive(Component)]
pub struct TallyText;

/// Component to mark the speed selector line of the menu.
#[derive(Component)]
pub struct SpeedText;

/// Component to mark the start menu UI.
#[derive(Component)]
pub struct MenuUI;

/// Component to mark the crash or win overlay UI.
#[derive(Component)]
pub struct FinishUI;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pulse_peaks_a_quarter_in() {
        let mut pulse = MemePulse::for_background(Background::Bonus);
        assert_eq!(pulse.scale(), 1.0);

        pulse.timer.tick(Duration::from_millis(200));
        assert!((pulse.scale() - 1.12).abs() < 1e-4);
    }

    #[test]
    fn test_bonus_pulse_is_wider() {
        let normal = MemePulse::for_background(Background::Normal);
        let bonus = MemePulse::for_background(Background::Bonus);
        assert!(bonus.amplitude > normal.amplitude);
    }
}
