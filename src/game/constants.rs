//! Game constants for window size, pixel metrics, cue names, asset paths and
//! rendering layers.

use bevy::prelude::*;

// Window and grid
pub const WINDOW_WIDTH: u32 = 1200;
pub const WINDOW_HEIGHT: u32 = 800;
pub const CELL_SIZE: u32 = 60;

// Pixel sizes
pub const MEME_WIDTH: f32 = 150.0;
pub const CAR_SIZE: Vec2 = Vec2::new(20.0, 50.0);
pub const OVERLAY_IMAGE_WIDTH: f32 = 500.0;

// Spawning
pub const SPAWN_MARGIN: u32 = 2;
pub const BONUS_DRIVER: &str = "verstappen";

// Cues (file stems under `sound/`)
pub const MENU_CUE: &str = "menu";
pub const CRASH_CUE: &str = "exit";
pub const WIN_CUE: &str = "win";
pub const BONUS_CUE: &str = "super-max";
pub const FALLBACK_CUE: &str = "f1-radio";

// Assets
pub const CATALOG_PATH: &str = "drivers.json";
pub const MEMES_FOLDER: &str = "memes";
pub const SOUNDS_FOLDER: &str = "sound";
pub const CARS_FOLDER: &str = "cars";
pub const SAFETY_CAR_IMAGE: &str = "cars/safetycar.png";
pub const BONUS_BACKDROP_IMAGE: &str = "Netherlands.png";
pub const CRASH_IMAGE: &str = "memes/toto2.png";
pub const WIN_IMAGE: &str = "win.jpg";
pub const FONT: &str = "fonts/FiraSans-Bold.ttf";

// Colors
pub const BACKGROUND_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 1.0);
pub const ARENA_BORDER_COLOR: Color = Color::srgba(0.02, 0.18, 0.49, 1.0);
pub const UNMARKED_CAR_COLOR: Color = Color::srgba(0.55, 0.55, 0.55, 1.0);
pub const PICKUP_FLASH_COLOR: Color = Color::srgba(1.0, 0.67, 0.0, 0.8);
pub const TITLE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 1.0);
pub const MENU_ACCENT_COLOR: Color = Color::srgba(1.0, 0.67, 0.0, 1.0);
pub const ALERT_COLOR: Color = Color::srgba(1.0, 0.0, 0.0, 1.0);

// Z-index constants for rendering layers
pub const Z_BACKDROP: f32 = 0.0;
pub const Z_ITEM: f32 = 1.0;
pub const Z_CAR: f32 = 2.0;
pub const Z_EFFECT: f32 = 3.0;
