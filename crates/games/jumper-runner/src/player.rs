use serde::{Deserialize, Serialize};

use jumper_core::game_trait::GameContext;
use jumper_core::geometry::Aabb;
use jumper_core::input::{InputAction, InputSnapshot};
use jumper_core::render::{ImageKey, OPAQUE, RenderSurface};
use jumper_core::timer::Countdown;

use crate::config::PhysicsConfig;

/// Jetpack pack sprite size and offset from the player's top-left corner.
const JETPACK_SIZE: f32 = 150.0;
const JETPACK_OFFSET_X: f32 = -30.0;
const JETPACK_OFFSET_Y: f32 = 15.0;
/// Flame sprite size; anchored to the player's left edge and bottom.
const FLAME_SIZE: f32 = 80.0;
const FLAME_OFFSET_X: f32 = 7.0;
const FLAME_RISE: f32 = 70.0;

const IDLE_FRAMES: &[ImageKey] = &["p2_walk"];
const RUN_FRAMES: &[ImageKey] = &["p2_walk"];
const JUMP_FRAMES: &[ImageKey] = &["p2_jump"];
const FLY_FRAMES: &[ImageKey] = &["p2_jump"];

pub const JETPACK_IMAGE: ImageKey = "jetpack";
pub const FLAME_IMAGE: ImageKey = "flame";

/// Display state derived at the end of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
    Flying,
}

impl PlayerState {
    /// Animation frames for this state, cycled by the animation cursor.
    pub fn frames(self) -> &'static [ImageKey] {
        match self {
            PlayerState::Idle => IDLE_FRAMES,
            PlayerState::Running => RUN_FRAMES,
            PlayerState::Jumping => JUMP_FRAMES,
            PlayerState::Flying => FLY_FRAMES,
        }
    }
}

/// The runner: position, vertical motion, jetpack, health and animation.
#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) x: f32,
    pub(crate) y: f32,
    width: f32,
    height: f32,
    pub(crate) velocity_y: f32,
    health: u32,
    max_health: u32,
    state: PlayerState,
    pub(crate) grounded: bool,
    jetpack: Option<Countdown>,
    is_flying: bool,
    double_jump_available: bool,
    double_jump_used: bool,
    anim_cursor: f32,
    ground_line: f32,
    physics: PhysicsConfig,
}

impl Player {
    /// Spawn at full health, centred vertically on the screen.
    pub fn new(physics: &PhysicsConfig, ctx: &GameContext) -> Self {
        let bounds = Aabb::from_center(
            physics.spawn_center_x,
            ctx.screen_height / 2.0,
            physics.player_width,
            physics.player_height,
        );
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            velocity_y: 0.0,
            health: physics.max_health,
            max_health: physics.max_health,
            state: PlayerState::Idle,
            grounded: false,
            jetpack: None,
            is_flying: false,
            double_jump_available: physics.double_jump_enabled,
            double_jump_used: false,
            anim_cursor: 0.0,
            ground_line: ctx.screen_height - physics.ground_margin,
            physics: physics.clone(),
        }
    }

    /// Start (or restart) the jetpack for `duration_ticks`. Zero is ignored.
    pub fn activate_jetpack(&mut self, duration_ticks: u32) {
        if duration_ticks == 0 {
            return;
        }
        self.jetpack = Some(Countdown::new(duration_ticks));
        tracing::debug!(duration_ticks, "Jetpack activated");
    }

    /// Advance one tick of physics, jetpack timing and animation.
    pub fn update(&mut self, input: &InputSnapshot) {
        if input.is_held(InputAction::ActivateJetpack) && self.jetpack.is_none() {
            self.activate_jetpack(self.physics.jetpack_duration_ticks);
        }

        // Thrust replaces vertical velocity; gravity still applies below.
        if self.jetpack.is_some() && input.is_held(InputAction::SustainFlight) {
            self.velocity_y = self.physics.flight_velocity;
            self.is_flying = true;
        } else {
            self.is_flying = false;
        }

        if self.jetpack.is_none() && input.is_held(InputAction::Jump) {
            if self.grounded {
                self.velocity_y = self.physics.jump_strength;
                self.grounded = false;
                self.double_jump_used = false;
            } else if self.double_jump_available && !self.double_jump_used {
                self.velocity_y = self.physics.jump_strength;
                self.double_jump_used = true;
            }
        }

        self.velocity_y += self.physics.gravity;
        self.y += self.velocity_y;

        if self.y + self.height >= self.ground_line {
            self.y = self.ground_line - self.height;
            self.velocity_y = self.physics.landing_velocity;
            self.grounded = true;
            self.double_jump_used = false;
        }
        if self.y <= 0.0 {
            self.y = 0.0;
            self.velocity_y = 0.0;
        }

        let expired = self.jetpack.as_mut().is_some_and(Countdown::tick);
        if expired {
            self.jetpack = None;
            tracing::debug!("Jetpack expired");
        }

        self.state = if self.jetpack.is_some() && self.is_flying {
            PlayerState::Flying
        } else if !self.grounded {
            PlayerState::Jumping
        } else if input.is_held(InputAction::MoveRight) {
            PlayerState::Running
        } else {
            PlayerState::Idle
        };

        self.animate();
    }

    fn animate(&mut self) {
        let frame_count = self.state.frames().len() as f32;
        self.anim_cursor += self.physics.animation_step;
        if self.anim_cursor >= frame_count {
            self.anim_cursor = 0.0;
        }
    }

    /// Lose one health point. Returns the health left.
    pub fn take_hit(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    /// Collision box. Cosmetic decorations are not part of it.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn current_frame(&self) -> ImageKey {
        let frames = self.state.frames();
        frames[(self.anim_cursor as usize).min(frames.len() - 1)]
    }

    /// Draw the jetpack pack, the flame while thrusting, then the body.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        let body = self.bounds();
        surface.image(
            JETPACK_IMAGE,
            Aabb::new(
                body.left() + JETPACK_OFFSET_X,
                body.top() + JETPACK_OFFSET_Y,
                JETPACK_SIZE,
                JETPACK_SIZE,
            ),
            OPAQUE,
        );
        if self.jetpack.is_some() && self.is_flying {
            surface.image(
                FLAME_IMAGE,
                Aabb::new(
                    body.left() + FLAME_OFFSET_X,
                    body.bottom() - FLAME_RISE,
                    FLAME_SIZE,
                    FLAME_SIZE,
                ),
                OPAQUE,
            );
        }
        surface.image(self.current_frame(), body, OPAQUE);
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_flying(&self) -> bool {
        self.is_flying
    }

    pub fn jetpack_active(&self) -> bool {
        self.jetpack.is_some()
    }

    pub fn jetpack_remaining_ticks(&self) -> u32 {
        self.jetpack.map_or(0, |j| j.remaining())
    }

    pub fn double_jump_used(&self) -> bool {
        self.double_jump_used
    }

    pub fn ground_line(&self) -> f32 {
        self.ground_line
    }
}
