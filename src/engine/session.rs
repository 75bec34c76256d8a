//! The per-session automaton: Menu -> Playing -> {GameOver, Win} -> Menu.

use std::slice;
use std::time::Duration;

use bevy::log::{debug, info, warn};
use bevy::math::Rect;

use super::{
    Catalog, Category, Direction, GameError, GameResult, Grid, GridPosition, Item, ItemPool,
    PixelLayout, ProgressTracker, RandomSource, Snake, SourceId, bounding_box, pickup_detected,
    self_collision_detected,
};

/// Lifecycle of one play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
    Win,
}

/// Speed tiers offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Difficulty {
    #[default]
    Haas,
    McLaren,
    RedBull,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Haas, Difficulty::McLaren, Difficulty::RedBull];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Haas => "Haas",
            Difficulty::McLaren => "McLaren",
            Difficulty::RedBull => "Red Bull",
        }
    }

    pub fn ticks_per_second(self) -> u32 {
        match self {
            Difficulty::Haas => 4,
            Difficulty::McLaren => 7,
            Difficulty::RedBull => 9,
        }
    }

    pub fn tick_interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.ticks_per_second()))
    }

    /// Next tier, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Previous tier, wrapping around.
    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Keys the session understands; everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Space,
    Other,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// Paint job of one car in the train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Livery {
    SafetyCar,
    Team(Category),
    /// Picked up a meme whose driver has no team.
    Unmarked,
}

impl Livery {
    fn for_category(category: Option<&Category>) -> Self {
        category.map_or(Livery::Unmarked, |category| Livery::Team(category.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Normal,
    Bonus,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub segments: Vec<GridPosition>,
    pub orientations: Vec<Direction>,
    pub liveries: Vec<Livery>,
    pub item: Item,
    pub background: Background,
}

/// Fire-and-forget audio triggers.
pub trait AudioSink {
    fn play_cue(&mut self, token: &str);
    fn play_looping_cue(&mut self, token: &str);
    fn stop_cue(&mut self);
}

pub trait FrameSink {
    fn render(&mut self, frame: FrameSnapshot);
}

/// What a call to [`GameSession::update`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Nothing to do in the current state.
    Idle,
    Moved,
    Picked(Item),
    Won(Item),
    Crashed,
    ExitedToMenu,
    Acknowledged,
    Quit,
}

/// Tunables of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub layout: PixelLayout,
    /// Cells kept free between a spawned item and the field edge.
    pub spawn_margin: u32,
    /// Driver key whose memes switch on bonus mode.
    pub bonus_key: Option<String>,
    pub menu_cue: String,
    pub crash_cue: String,
    pub win_cue: String,
    pub bonus_cue: String,
}

/// Owns the train, the current item and the progress of one player.
#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    catalog: Catalog,
    pool: ItemPool,
    config: SessionConfig,
    state: GameState,
    difficulty: Difficulty,
    snake: Snake,
    liveries: Vec<Livery>,
    item: Option<Item>,
    progress: ProgressTracker,
    background: Background,
}

impl GameSession {
    pub fn new(grid: Grid, catalog: Catalog, pool: ItemPool, config: SessionConfig) -> Self {
        for category in catalog.categories() {
            let reachable = pool
                .iter()
                .any(|source| catalog.category_for(source.id.key()) == Some(category));
            if !reachable {
                warn!("Team {category} has no meme in the pool, the game cannot be won");
            }
        }
        info!(
            "Session ready: {}x{} grid, {} memes, {} teams",
            grid.width(),
            grid.height(),
            pool.len(),
            catalog.categories().len()
        );

        Self {
            snake: Snake::new(grid.center(), Direction::Down),
            grid,
            catalog,
            pool,
            config,
            state: GameState::Menu,
            difficulty: Difficulty::default(),
            liveries: vec![Livery::SafetyCar],
            item: None,
            progress: ProgressTracker::default(),
            background: Background::Normal,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn tick_interval(&self) -> Duration {
        self.difficulty.tick_interval()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn liveries(&self) -> &[Livery] {
        &self.liveries
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn background(&self) -> Background {
        self.background
    }

    /// Plays the menu theme; used once the host has shown the first menu.
    pub fn play_menu_theme<A: AudioSink>(&self, audio: &mut A) {
        if self.state == GameState::Menu {
            audio.play_cue(&self.config.menu_cue);
        }
    }

    /// Resets the train and progress and enters `Playing`.
    pub fn start<R, A>(&mut self, difficulty: Difficulty, rng: &mut R, audio: &mut A) -> GameResult<()>
    where
        R: RandomSource + ?Sized,
        A: AudioSink,
    {
        if self.state != GameState::Menu {
            return Err(GameError::InvalidTransition {
                from: self.state,
                action: "start a session",
            });
        }

        self.difficulty = difficulty;
        self.snake = Snake::new(self.grid.center(), Direction::Down);
        self.liveries = vec![Livery::SafetyCar];
        self.progress.reset();

        // The opening meme is never a bonus one.
        let excluded: Vec<SourceId> = match &self.config.bonus_key {
            Some(bonus) => self
                .pool
                .iter()
                .filter(|source| source.id.key() == bonus.as_str())
                .map(|source| source.id.clone())
                .collect(),
            None => Vec::new(),
        };
        self.place_item(&excluded, None, rng);

        self.state = GameState::Playing;
        info!(
            "Game started at {} ({} ticks/s)",
            difficulty.label(),
            difficulty.ticks_per_second()
        );
        self.announce_item(audio);
        Ok(())
    }

    /// Frame image of the current session, if an item has been placed.
    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        let item = self.item.clone()?;
        Some(FrameSnapshot {
            segments: self.snake.segments().iter().copied().collect(),
            orientations: self.snake.orientations(&self.grid),
            liveries: self.liveries.clone(),
            item,
            background: self.background,
        })
    }

    /// Feeds pending input to the session.
    ///
    /// While `Playing` this is one simulation tick; in `GameOver` and `Win`
    /// it waits for the acknowledgment key; in `Menu` only `Quit` matters.
    pub fn update<R, A, F>(
        &mut self,
        inputs: impl IntoIterator<Item = InputEvent>,
        rng: &mut R,
        audio: &mut A,
        frames: &mut F,
    ) -> FrameOutcome
    where
        R: RandomSource + ?Sized,
        A: AudioSink,
        F: FrameSink,
    {
        match self.state {
            GameState::Playing => self.tick(inputs, rng, audio, frames),
            GameState::GameOver | GameState::Win => self.await_acknowledgment(inputs, audio),
            GameState::Menu => {
                if inputs.into_iter().any(|event| event == InputEvent::Quit) {
                    FrameOutcome::Quit
                } else {
                    FrameOutcome::Idle
                }
            }
        }
    }

    fn tick<R, A, F>(
        &mut self,
        inputs: impl IntoIterator<Item = InputEvent>,
        rng: &mut R,
        audio: &mut A,
        frames: &mut F,
    ) -> FrameOutcome
    where
        R: RandomSource + ?Sized,
        A: AudioSink,
        F: FrameSink,
    {
        for event in inputs {
            match event {
                InputEvent::Quit => return FrameOutcome::Quit,
                InputEvent::KeyDown(Key::Escape) => {
                    info!("Exited to menu");
                    self.return_to_menu(audio);
                    return FrameOutcome::ExitedToMenu;
                }
                InputEvent::KeyDown(key) => {
                    if let Some(direction) = key.direction()
                        && !self.snake.set_direction(direction)
                    {
                        debug!("Ignored turn {direction}, heading {}", self.snake.direction());
                    }
                }
            }
        }

        let head = self.snake.advance(&self.grid);
        let anchor = self.config.layout.anchor(head);
        let picked = self
            .item
            .as_ref()
            .is_some_and(|item| pickup_detected(anchor, item.bounds()));

        let mut outcome = FrameOutcome::Moved;
        if picked && let Some(collected) = self.item.take() {
            self.liveries.push(Livery::for_category(collected.category()));
            self.progress.record_pickup(collected.category());
            info!(
                "Collected {} ({}), {} teams logged",
                collected.source(),
                collected
                    .category()
                    .map_or("no team", |category| category.as_str()),
                self.progress.total()
            );

            if self.progress.is_won(self.catalog.categories()) {
                self.item = Some(collected.clone());
                self.finish(GameState::Win, audio);
                return FrameOutcome::Won(collected);
            }

            self.spawn_replacement(&collected, rng);
            self.announce_item(audio);
            outcome = FrameOutcome::Picked(collected);
        } else {
            self.snake.pop_tail();
        }

        if self_collision_detected(self.snake.segments()) {
            debug!("Train {:?} ran into itself", self.snake.segments());
            self.finish(GameState::GameOver, audio);
            return FrameOutcome::Crashed;
        }

        if let Some(frame) = self.snapshot() {
            frames.render(frame);
        }
        outcome
    }

    /// Replaces the collected item with a different source.
    fn spawn_replacement<R: RandomSource + ?Sized>(&mut self, collected: &Item, rng: &mut R) {
        self.place_item(slice::from_ref(collected.source()), Some(collected.bounds()), rng);
    }

    /// Spawns an item whose box covers neither the head nor the cell the
    /// train enters next, anchored outside `vacated`.
    fn place_item<R: RandomSource + ?Sized>(
        &mut self,
        excluded: &[SourceId],
        vacated: Option<Rect>,
        rng: &mut R,
    ) {
        let layout = self.config.layout;
        let margin = self.config.spawn_margin;
        let head = self.snake.head();
        let guarded = [
            layout.anchor(head),
            layout.anchor(self.grid.wrap(head, self.snake.direction().delta())),
        ];
        let grid = &self.grid;
        let item = Item::spawn_with(
            &self.pool,
            excluded,
            &self.catalog,
            &layout,
            rng,
            |size, rng| {
                grid.random_position_where(margin, rng, |position| {
                    let bounds = bounding_box(&layout, position, size);
                    !guarded.iter().any(|&anchor| pickup_detected(anchor, bounds))
                        && vacated.is_none_or(|vacated| !vacated.contains(layout.anchor(position)))
                })
            },
        );
        self.item = Some(item);
    }

    fn is_bonus(&self, item: &Item) -> bool {
        self.config
            .bonus_key
            .as_deref()
            .is_some_and(|bonus| item.key() == bonus)
    }

    /// Switches bonus mode for the current item and starts its cue.
    fn announce_item<A: AudioSink>(&mut self, audio: &mut A) {
        let Some(item) = &self.item else {
            return;
        };
        audio.stop_cue();
        if self.is_bonus(item) {
            self.background = Background::Bonus;
            audio.play_looping_cue(&self.config.bonus_cue);
        } else {
            self.background = Background::Normal;
            audio.play_cue(item.key());
        }
    }

    fn finish<A: AudioSink>(&mut self, state: GameState, audio: &mut A) {
        audio.stop_cue();
        match state {
            GameState::Win => {
                info!("All teams collected twice, the player wins");
                audio.play_cue(&self.config.win_cue);
            }
            _ => {
                info!("Crashed with {} cars", self.snake.len());
                audio.play_cue(&self.config.crash_cue);
            }
        }
        self.state = state;
    }

    fn await_acknowledgment<A: AudioSink>(
        &mut self,
        inputs: impl IntoIterator<Item = InputEvent>,
        audio: &mut A,
    ) -> FrameOutcome {
        for event in inputs {
            match event {
                InputEvent::Quit => return FrameOutcome::Quit,
                InputEvent::KeyDown(Key::Space) => {
                    self.return_to_menu(audio);
                    return FrameOutcome::Acknowledged;
                }
                InputEvent::KeyDown(_) => {}
            }
        }
        FrameOutcome::Idle
    }

    fn return_to_menu<A: AudioSink>(&mut self, audio: &mut A) {
        audio.stop_cue();
        self.background = Background::Normal;
        self.state = GameState::Menu;
        audio.play_cue(&self.config.menu_cue);
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, snake: Snake, item: Item) {
        self.liveries = vec![Livery::SafetyCar; snake.len()];
        self.snake = snake;
        self.item = Some(item);
    }
}
