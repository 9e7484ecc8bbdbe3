use serde::{Deserialize, Serialize};

use crate::input::InputSnapshot;
use crate::render::RenderSurface;

/// Core trait a single-player arcade game implements.
///
/// The driver owns pacing, input sampling and the render target; the game
/// only advances its simulation and emits draw requests.
pub trait ArcadeGame {
    /// Game metadata for the title bar and logs.
    fn metadata(&self) -> GameMetadata;

    /// Advance exactly one tick with the input sampled for it.
    /// Returns the notable things that happened during the tick.
    fn update(&mut self, input: &InputSnapshot) -> Vec<GameEvent>;

    /// Emit the current frame. Called every tick, including the tick that ends
    /// the match.
    fn render(&self, surface: &mut dyn RenderSurface);

    /// Read-only values for HUD text.
    fn hud(&self) -> Hud;

    /// Whether the match has reached its terminal state.
    fn is_over(&self) -> bool;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Screen and timing context handed to a game at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub screen_width: f32,
    pub screen_height: f32,
    pub tick_rate_hz: f32,
}

impl Default for GameContext {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            tick_rate_hz: 60.0,
        }
    }
}

/// HUD telemetry exposed for external text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub health: u32,
    pub max_health: u32,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player took damage; `health` is what remains.
    PlayerHit { health: u32 },
    /// The shared scroll speed increased.
    SpeedIncreased { speed: f32 },
    /// A background transition toward `stage` began.
    StageTransition { stage: usize },
    /// Terminal event; no further events follow.
    GameOver { score: u64 },
}
