//! F1 MemeTrain: steer a train of race cars around a wrapping grid and
//! collect every team's memes twice without running into your own cars.

pub mod audio;
pub mod engine;
pub mod game;
pub mod meme;
pub mod rendering;
pub mod train;
pub mod ui;
