//! Game events (messages).

use bevy::prelude::*;

use crate::engine::{FrameSnapshot, GameState, Item};

/// A frame the session asked to be drawn.
#[derive(Message, Clone)]
pub struct FrameRendered(pub FrameSnapshot);

/// Audio trigger emitted by the session.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub enum AudioCue {
    Play(String),
    Loop(String),
    Stop,
}

/// Message triggered when a meme is picked up (for visual effects).
#[derive(Message, Clone)]
pub struct MemeCollected {
    pub item: Item,
}

/// Message triggered whenever the session changes state.
#[derive(Message, Clone, Copy, Debug)]
pub struct PhaseChanged(pub GameState);
