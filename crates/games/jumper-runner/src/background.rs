use serde::{Deserialize, Serialize};

use jumper_core::geometry::Aabb;
use jumper_core::render::{ImageKey, OPAQUE, RenderSurface};

/// Cross-fade progress at the start of a fade (fully showing the old stage).
pub const FADE_START: u32 = 255;

/// Themed background stages, in score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    City,
    DarkOak,
    Dry,
    Nuclear,
    Moon,
}

pub const STAGES: [Stage; 5] = [
    Stage::City,
    Stage::DarkOak,
    Stage::Dry,
    Stage::Nuclear,
    Stage::Moon,
];

pub const STAGE_COUNT: usize = STAGES.len();

impl Stage {
    pub fn image(self) -> ImageKey {
        match self {
            Stage::City => "bg0",
            Stage::DarkOak => "bg1",
            Stage::Dry => "bg2",
            Stage::Nuclear => "bg3",
            Stage::Moon => "bg4",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::City => "City",
            Stage::DarkOak => "Dark Oak",
            Stage::Dry => "Dry",
            Stage::Nuclear => "Nuclear",
            Stage::Moon => "Moon",
        }
    }
}

/// Two-copy tiled parallax layer that cross-fades between stages.
///
/// Each stage image spans twice the screen width. `fade_progress` counts down
/// from 255; the incoming stage is drawn with alpha `255 - fade_progress`.
#[derive(Debug, Clone)]
pub struct BackgroundAnimator {
    layers: Vec<Stage>,
    current: usize,
    pending: usize,
    scroll_x: f32,
    scroll_speed: f32,
    fade_progress: u32,
    fade_speed: u32,
    screen_width: f32,
    screen_height: f32,
}

impl BackgroundAnimator {
    pub fn new(layers: Vec<Stage>, screen_width: f32, screen_height: f32, fade_speed: u32) -> Self {
        Self {
            layers,
            current: 0,
            pending: 0,
            scroll_x: 0.0,
            scroll_speed: 1.0,
            fade_progress: FADE_START,
            fade_speed,
            screen_width,
            screen_height,
        }
    }

    /// Begin a cross-fade toward `index`. Returns `false` (no-op) when the
    /// index is out of range, already current, or already fading in.
    pub fn set_background(&mut self, index: usize) -> bool {
        if index >= self.layers.len() || index == self.current {
            return false;
        }
        if self.is_fading() && index == self.pending {
            return false;
        }
        self.pending = index;
        self.fade_progress = FADE_START;
        tracing::info!(
            from = self.layers[self.current].name(),
            to = self.layers[index].name(),
            "Background transition started"
        );
        true
    }

    pub fn set_scroll_speed(&mut self, speed: f32) {
        self.scroll_speed = speed;
    }

    /// Scroll one tick and advance any running cross-fade.
    pub fn update(&mut self) {
        self.scroll_x -= self.scroll_speed;
        if self.scroll_x <= -self.screen_width {
            self.scroll_x = 0.0;
        }

        if self.is_fading() {
            self.fade_progress = self.fade_progress.saturating_sub(self.fade_speed);
            if self.fade_progress == 0 {
                self.fade_progress = FADE_START;
                self.current = self.pending;
                tracing::debug!(stage = self.layers[self.current].name(), "Fade complete");
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        let Some(current) = self.layers.get(self.current) else {
            return;
        };
        self.draw_tiled(surface, current.image(), OPAQUE);

        if self.is_fading()
            && let Some(incoming) = self.layers.get(self.pending)
        {
            let alpha = (FADE_START - self.fade_progress).min(u32::from(OPAQUE)) as u8;
            self.draw_tiled(surface, incoming.image(), alpha);
        }
    }

    fn draw_tiled(&self, surface: &mut dyn RenderSurface, key: ImageKey, alpha: u8) {
        let width = self.screen_width * 2.0;
        for x in [self.scroll_x, self.scroll_x + width] {
            surface.image(key, Aabb::new(x, 0.0, width, self.screen_height), alpha);
        }
    }

    pub fn is_fading(&self) -> bool {
        self.pending != self.current
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn pending_index(&self) -> usize {
        self.pending
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.layers.get(self.current).copied()
    }

    pub fn fade_progress(&self) -> u32 {
        self.fade_progress
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumper_core::render::FrameRecorder;

    fn animator() -> BackgroundAnimator {
        BackgroundAnimator::new(STAGES.to_vec(), 1280.0, 720.0, 5)
    }

    #[test]
    fn starts_on_first_stage_without_fade() {
        let bg = animator();
        assert_eq!(bg.current_stage(), Some(Stage::City));
        assert!(!bg.is_fading());
        assert_eq!(bg.fade_progress(), FADE_START);
    }

    #[test]
    fn set_current_or_out_of_range_is_noop() {
        let mut bg = animator();
        assert!(!bg.set_background(0));
        assert!(!bg.set_background(5));
        assert!(!bg.set_background(usize::MAX));
        assert!(!bg.is_fading());
    }

    #[test]
    fn cross_fade_completes_after_51_updates() {
        let mut bg = animator();
        assert!(bg.set_background(3));
        assert_eq!(bg.fade_progress(), 255);
        for _ in 0..50 {
            bg.update();
            assert!(bg.is_fading());
        }
        assert_eq!(bg.fade_progress(), 5);
        bg.update();
        assert!(!bg.is_fading());
        assert_eq!(bg.current_index(), 3);
        assert_eq!(bg.fade_progress(), 255);
    }

    #[test]
    fn repeating_pending_target_does_not_restart_fade() {
        let mut bg = animator();
        bg.set_background(1);
        for _ in 0..10 {
            bg.update();
        }
        assert!(!bg.set_background(1));
        assert_eq!(bg.fade_progress(), 205);
    }

    #[test]
    fn new_target_mid_fade_retargets() {
        let mut bg = animator();
        bg.set_background(1);
        for _ in 0..10 {
            bg.update();
        }
        assert!(bg.set_background(2));
        assert_eq!(bg.pending_index(), 2);
        assert_eq!(bg.fade_progress(), 255);
    }

    #[test]
    fn scroll_wraps_at_screen_width() {
        let mut bg = animator();
        bg.set_scroll_speed(640.0);
        bg.update();
        assert_eq!(bg.scroll_x(), -640.0);
        bg.update();
        assert_eq!(bg.scroll_x(), 0.0, "reaching -screen_width wraps to 0");
    }

    #[test]
    fn scroll_follows_speed() {
        let mut bg = animator();
        bg.set_scroll_speed(1.0);
        for _ in 0..3 {
            bg.update();
        }
        assert_eq!(bg.scroll_x(), -3.0);
        assert_eq!(bg.scroll_speed(), 1.0);
    }

    #[test]
    fn draw_tiles_current_stage_twice() {
        let mut bg = animator();
        bg.set_scroll_speed(10.0);
        bg.update();
        let mut rec = FrameRecorder::new();
        bg.draw(&mut rec);
        let draws = rec.images_of("bg0");
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].0.x, -10.0);
        assert_eq!(draws[1].0.x, -10.0 + 2560.0);
        assert_eq!(draws[0].0.width, 2560.0);
        assert!(draws.iter().all(|(_, a)| *a == OPAQUE));
    }

    #[test]
    fn draw_fades_incoming_stage_in() {
        let mut bg = animator();
        bg.set_background(4);
        for _ in 0..20 {
            bg.update();
        }
        let mut rec = FrameRecorder::new();
        bg.draw(&mut rec);
        let incoming = rec.images_of("bg4");
        assert_eq!(incoming.len(), 2);
        assert!(incoming.iter().all(|(_, a)| *a == 100));
        assert_eq!(rec.commands().len(), 4);
    }

    #[test]
    fn fade_speed_not_dividing_255_still_finishes() {
        let mut bg = BackgroundAnimator::new(STAGES.to_vec(), 1280.0, 720.0, 100);
        bg.set_background(1);
        bg.update();
        bg.update();
        assert!(bg.is_fading());
        bg.update();
        assert!(!bg.is_fading());
        assert_eq!(bg.current_index(), 1);
    }
}
