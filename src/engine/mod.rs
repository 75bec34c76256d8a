//! Game-state engine: grid, memes, train, collisions, progress and the
//! session automaton. Nothing here touches the ECS; the plugins drive it.

mod catalog;
mod collision;
mod direction;
mod error;
mod grid;
mod item;
mod progress;
pub(crate) mod random;
mod session;
mod snake;

pub use catalog::{Catalog, Category, normalize};
pub use collision::{pickup_detected, self_collision_detected};
pub use direction::Direction;
pub use error::{GameError, GameResult};
pub use grid::{Grid, GridPosition};
pub use item::{Item, ItemPool, ItemSource, PixelLayout, SourceId, bounding_box, scaled_height};
pub use progress::{PICKUPS_PER_CATEGORY, ProgressTracker};
pub use random::RandomSource;
pub use session::{
    AudioSink, Background, Difficulty, FrameOutcome, FrameSink, FrameSnapshot, GameSession,
    GameState, InputEvent, Key, Livery, SessionConfig,
};
pub use snake::Snake;
