use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use jumper_core::geometry::Aabb;
use jumper_core::render::{ImageKey, OPAQUE, RenderSurface};

use crate::config::ObstacleConfig;

/// Barrel sprite edge length.
const BARREL_SIZE: f32 = 64.0;
/// Barrels sink this far below the bottom screen edge.
const BARREL_SINK: f32 = 10.0;
const BEAM_WIDTH: f32 = 32.0;
const BEAM_HEIGHT: f32 = 200.0;
/// Ceiling beams start this far above the top edge.
const CEILING_BEAM_TOP: f32 = -60.0;
/// Floor beams extend this far below the bottom edge.
const FLOOR_BEAM_OVERHANG: f32 = 38.0;

/// Obstacle variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    GroundBarrel,
    CeilingBeam,
    FloorBeam,
}

impl ObstacleKind {
    pub fn image(self) -> ImageKey {
        match self {
            ObstacleKind::GroundBarrel => "toxic_barrel",
            ObstacleKind::CeilingBeam => "laser_vertical",
            ObstacleKind::FloorBeam => "laser_vertical_flipped",
        }
    }

    /// Spawn box for this kind with its left edge at `x`.
    pub fn spawn_bounds(self, x: f32, screen_height: f32) -> Aabb {
        match self {
            ObstacleKind::GroundBarrel => Aabb::new(
                x,
                screen_height - BARREL_SIZE + BARREL_SINK,
                BARREL_SIZE,
                BARREL_SIZE,
            ),
            ObstacleKind::CeilingBeam => {
                Aabb::new(x, CEILING_BEAM_TOP, BEAM_WIDTH, BEAM_HEIGHT)
            },
            ObstacleKind::FloorBeam => Aabb::new(
                x,
                screen_height + FLOOR_BEAM_OVERHANG - BEAM_HEIGHT,
                BEAM_WIDTH,
                BEAM_HEIGHT,
            ),
        }
    }
}

/// Which family the next spawn draws from. Alternates every spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnCategory {
    Barrel,
    Laser,
}

impl SpawnCategory {
    fn next(self) -> Self {
        match self {
            SpawnCategory::Barrel => SpawnCategory::Laser,
            SpawnCategory::Laser => SpawnCategory::Barrel,
        }
    }
}

/// A live obstacle. Moves left at the shared game speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, screen_height: f32) -> Self {
        Self {
            kind,
            bounds: kind.spawn_bounds(x, screen_height),
        }
    }
}

/// Owns the obstacle field: timed spawning, scrolling and collision queries.
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    spawn_timer: u32,
    spawn_interval: u32,
    spawn_jitter: u32,
    next_category: SpawnCategory,
    rng: StdRng,
    screen_width: f32,
    screen_height: f32,
}

impl ObstacleManager {
    pub fn new(config: &ObstacleConfig, seed: u64, screen_width: f32, screen_height: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_timer: 0,
            spawn_interval: config.spawn_interval_ticks,
            spawn_jitter: config.spawn_jitter,
            next_category: SpawnCategory::Barrel,
            rng: StdRng::seed_from_u64(seed),
            screen_width,
            screen_height,
        }
    }

    /// Scroll every obstacle left by `game_speed`, drop the ones fully past
    /// the left edge, then run the spawn timer. Returns the kind spawned this
    /// tick, if any.
    pub fn tick(&mut self, game_speed: f32) -> Option<ObstacleKind> {
        for obstacle in &mut self.obstacles {
            obstacle.bounds.x -= game_speed;
        }
        self.obstacles.retain(|o| o.bounds.right() >= 0.0);

        self.spawn_timer += 1;
        if self.spawn_timer <= self.spawn_interval {
            return None;
        }

        let offset = if self.spawn_jitter > 0 {
            self.rng.random_range(0..self.spawn_jitter)
        } else {
            0
        };
        let x = self.screen_width + offset as f32;
        let kind = match self.next_category {
            SpawnCategory::Barrel => ObstacleKind::GroundBarrel,
            SpawnCategory::Laser => {
                if self.rng.random_bool(0.5) {
                    ObstacleKind::CeilingBeam
                } else {
                    ObstacleKind::FloorBeam
                }
            },
        };
        self.obstacles.push(Obstacle::new(kind, x, self.screen_height));
        self.spawn_timer = 0;
        self.next_category = self.next_category.next();
        tracing::debug!(?kind, x, "Obstacle spawned");
        Some(kind)
    }

    /// Whether `bounds` overlaps any live obstacle.
    pub fn collides_with(&self, bounds: &Aabb) -> bool {
        self.obstacles.iter().any(|o| o.bounds.intersects(bounds))
    }

    /// Remove every obstacle.
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        for obstacle in &self.obstacles {
            surface.image(obstacle.kind.image(), obstacle.bounds, OPAQUE);
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    pub fn next_category(&self) -> SpawnCategory {
        self.next_category
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}
