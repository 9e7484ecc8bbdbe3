use serde::{Deserialize, Serialize};

use jumper_core::game_trait::GameContext;
use jumper_core::input::KeyBindings;

use crate::background::STAGE_COUNT;

/// Accepted simulation rates. The driver's timer resolution is 1 ms.
pub const MIN_TICK_RATE_HZ: f32 = 1.0;
pub const MAX_TICK_RATE_HZ: f32 = 1000.0;

/// Screen and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
    pub tick_rate_hz: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            tick_rate_hz: 60.0,
        }
    }
}

/// Player physics. Velocities are pixels per tick, y grows downward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_strength: f32,
    /// Vertical velocity forced each tick while the jetpack thrusts.
    pub flight_velocity: f32,
    /// Distance of the ground line above the bottom screen edge.
    pub ground_margin: f32,
    /// Velocity left after landing so the ground check fires again next tick.
    pub landing_velocity: f32,
    pub jetpack_duration_ticks: u32,
    pub double_jump_enabled: bool,
    pub max_health: u32,
    pub player_width: f32,
    pub player_height: f32,
    pub spawn_center_x: f32,
    pub animation_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_strength: -20.0,
            flight_velocity: -5.0,
            ground_margin: 20.0,
            landing_velocity: 1.0,
            jetpack_duration_ticks: 300,
            double_jump_enabled: true,
            max_health: 3,
            player_width: 72.0,
            player_height: 97.0,
            spawn_center_x: 100.0,
            animation_step: 0.1,
        }
    }
}

/// Obstacle spawning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub spawn_interval_ticks: u32,
    /// Spawn x offset past the right edge is drawn from `[0, spawn_jitter)`.
    pub spawn_jitter: u32,
    /// Fixed RNG seed; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ticks: 120,
            spawn_jitter: 200,
            seed: None,
        }
    }
}

/// Game speed progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub initial: f32,
    pub ramp_every: u64,
    pub ramp_step: f32,
    /// Background scroll speed as a fraction of game speed.
    pub background_factor: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial: 5.0,
            ramp_every: 500,
            ramp_step: 0.5,
            background_factor: 0.2,
        }
    }
}

/// Background stages and cross-fade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Progress removed from the 255-step fade per tick.
    pub fade_speed: u32,
    /// Score at which each stage after the first begins.
    pub stage_thresholds: Vec<u64>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            fade_speed: 5,
            stage_thresholds: vec![1000, 2000, 3000, 4000],
        }
    }
}

/// Top-level runner configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub obstacles: ObstacleConfig,
    pub speed: SpeedConfig,
    pub background: BackgroundConfig,
    /// Key bindings for a windowed frontend. The headless driver plays with
    /// the autopilot and does not read them.
    pub controls: KeyBindings,
}

/// Configuration failures.
#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(m) => write!(f, "config parse error: {m}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RunnerConfig {
    /// Load config from `$JUMPER_CONFIG` or `config/runner.toml`. Falls back to
    /// defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("JUMPER_CONFIG").unwrap_or_else(|_| "config/runner.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "Loaded runner configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                RunnerConfig::default()
            },
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |m: &str| Err(ConfigError::Invalid(m.to_string()));

        if let Some(name) = self.non_finite_field() {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            return invalid("screen.width and screen.height must be > 0");
        }
        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.screen.tick_rate_hz) {
            return Err(ConfigError::Invalid(format!(
                "screen.tick_rate_hz must be in [{MIN_TICK_RATE_HZ}, {MAX_TICK_RATE_HZ}]"
            )));
        }
        if !(self.physics.player_width > 0.0 && self.physics.player_height > 0.0) {
            return invalid("physics.player_width and physics.player_height must be > 0");
        }
        if self.physics.max_health == 0 {
            return invalid("physics.max_health must be > 0");
        }
        if self.physics.jetpack_duration_ticks == 0 {
            return invalid("physics.jetpack_duration_ticks must be > 0");
        }
        if !(self.physics.animation_step > 0.0) {
            return invalid("physics.animation_step must be > 0");
        }
        if self.obstacles.spawn_interval_ticks == 0 {
            return invalid("obstacles.spawn_interval_ticks must be > 0");
        }
        if self.speed.ramp_every == 0 {
            return invalid("speed.ramp_every must be > 0");
        }
        if self.background.fade_speed == 0 {
            return invalid("background.fade_speed must be > 0");
        }
        let thresholds = &self.background.stage_thresholds;
        if thresholds.len() != STAGE_COUNT - 1 {
            return Err(ConfigError::Invalid(format!(
                "background.stage_thresholds must list {} scores, got {}",
                STAGE_COUNT - 1,
                thresholds.len()
            )));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("background.stage_thresholds must be strictly ascending");
        }
        Ok(())
    }

    /// First float setting that is NaN or infinite, by its TOML key.
    fn non_finite_field(&self) -> Option<&'static str> {
        let fields = [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("screen.tick_rate_hz", self.screen.tick_rate_hz),
            ("physics.gravity", self.physics.gravity),
            ("physics.jump_strength", self.physics.jump_strength),
            ("physics.flight_velocity", self.physics.flight_velocity),
            ("physics.ground_margin", self.physics.ground_margin),
            ("physics.landing_velocity", self.physics.landing_velocity),
            ("physics.player_width", self.physics.player_width),
            ("physics.player_height", self.physics.player_height),
            ("physics.spawn_center_x", self.physics.spawn_center_x),
            ("physics.animation_step", self.physics.animation_step),
            ("speed.initial", self.speed.initial),
            ("speed.ramp_step", self.speed.ramp_step),
            ("speed.background_factor", self.speed.background_factor),
        ];
        fields
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
    }

    pub fn context(&self) -> GameContext {
        GameContext {
            screen_width: self.screen.width,
            screen_height: self.screen.height,
            tick_rate_hz: self.screen.tick_rate_hz,
        }
    }
}
