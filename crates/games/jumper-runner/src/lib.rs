pub mod background;
pub mod bot;
pub mod config;
pub mod obstacles;
pub mod player;
pub mod scoring;

use rand::Rng;
use serde::{Deserialize, Serialize};

use jumper_core::game_trait::{ArcadeGame, GameContext, GameEvent, GameMetadata, Hud};
use jumper_core::input::InputSnapshot;
use jumper_core::render::{Color, RenderSurface};

use background::{BackgroundAnimator, STAGES};
use config::RunnerConfig;
use obstacles::ObstacleManager;
use player::Player;
use scoring::{ramp_crossings, stage_for_score};

/// HUD text anchors.
const SCORE_TEXT_POS: (f32, f32) = (10.0, 10.0);
const HEALTH_TEXT_POS: (f32, f32) = (10.0, 40.0);

/// Match lifecycle. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Running,
    GameOver,
}

/// The Cyber Runner game.
pub struct CyberRunner {
    config: RunnerConfig,
    ctx: GameContext,
    player: Player,
    obstacles: ObstacleManager,
    background: BackgroundAnimator,
    score: u64,
    game_speed: f32,
    /// Last stage requested from the background, so a request fires once per change.
    target_stage: usize,
    phase: MatchPhase,
    seed: u64,
}

impl CyberRunner {
    /// Build a match from `config`. Uses the configured obstacle seed, or a
    /// random one when none is set.
    pub fn new(config: RunnerConfig) -> Self {
        let seed = config
            .obstacles
            .seed
            .unwrap_or_else(|| rand::rng().random());
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: RunnerConfig, seed: u64) -> Self {
        let ctx = config.context();
        let player = Player::new(&config.physics, &ctx);
        let obstacles =
            ObstacleManager::new(&config.obstacles, seed, ctx.screen_width, ctx.screen_height);
        let background = BackgroundAnimator::new(
            STAGES.to_vec(),
            ctx.screen_width,
            ctx.screen_height,
            config.background.fade_speed,
        );
        tracing::debug!(seed, "Cyber Runner match created");
        Self {
            game_speed: config.speed.initial,
            config,
            ctx,
            player,
            obstacles,
            background,
            score: 0,
            target_stage: 0,
            phase: MatchPhase::Running,
            seed,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn background(&self) -> &BackgroundAnimator {
        &self.background
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn game_speed(&self) -> f32 {
        self.game_speed
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut ObstacleManager {
        &mut self.obstacles
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    fn apply_speed_ramp(&mut self, previous_score: u64, events: &mut Vec<GameEvent>) {
        let ramps = ramp_crossings(previous_score, self.score, self.config.speed.ramp_every);
        if ramps == 0 {
            return;
        }
        self.game_speed += ramps as f32 * self.config.speed.ramp_step;
        tracing::info!(speed = self.game_speed, score = self.score, "Speed increased");
        events.push(GameEvent::SpeedIncreased {
            speed: self.game_speed,
        });
    }

    fn update_stage_target(&mut self, events: &mut Vec<GameEvent>) {
        let target = stage_for_score(
            self.score,
            &self.config.background.stage_thresholds,
            self.background.layer_count(),
        );
        if target == self.target_stage {
            return;
        }
        self.target_stage = target;
        if self.background.set_background(target) {
            events.push(GameEvent::StageTransition { stage: target });
        }
    }

    fn resolve_collision(&mut self, events: &mut Vec<GameEvent>) {
        if !self.obstacles.collides_with(&self.player.bounds()) {
            return;
        }
        let health = self.player.take_hit();
        self.obstacles.clear();
        tracing::info!(health, score = self.score, "Player hit");
        events.push(GameEvent::PlayerHit { health });

        if health == 0 {
            self.phase = MatchPhase::GameOver;
            tracing::info!(score = self.score, "Game over");
            events.push(GameEvent::GameOver { score: self.score });
        }
    }
}

impl Default for CyberRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl ArcadeGame for CyberRunner {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Cyber Runner".to_string(),
            description: "Run, jump and jetpack past barrels and laser beams".to_string(),
        }
    }

    fn tick_rate(&self) -> f32 {
        self.ctx.tick_rate_hz
    }

    fn update(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        if self.phase == MatchPhase::GameOver {
            return Vec::new();
        }
        let mut events = Vec::new();

        self.player.update(input);
        self.obstacles.tick(self.game_speed);

        let previous_score = self.score;
        self.score += 1;
        self.apply_speed_ramp(previous_score, &mut events);

        self.background
            .set_scroll_speed(self.game_speed * self.config.speed.background_factor);
        self.update_stage_target(&mut events);
        self.background.update();

        self.resolve_collision(&mut events);
        events
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        surface.clear(Color::BLACK);
        self.background.draw(surface);
        self.player.draw(surface);
        self.obstacles.draw(surface);

        let hud = self.hud();
        surface.text(
            format!("Score: {}", hud.score),
            SCORE_TEXT_POS.0,
            SCORE_TEXT_POS.1,
            Color::WHITE,
        );
        surface.text(
            format!("Health: {}", hud.health),
            HEALTH_TEXT_POS.0,
            HEALTH_TEXT_POS.1,
            Color::WHITE,
        );
    }

    fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            health: self.player.health(),
            max_health: self.player.max_health(),
        }
    }

    fn is_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumper_core::geometry::Aabb;
    use jumper_core::input::InputAction;
    use jumper_core::render::DrawCommand;
    use jumper_core::test_helpers::*;

    use crate::obstacles::{Obstacle, ObstacleKind};

    fn runner() -> CyberRunner {
        CyberRunner::with_seed(RunnerConfig::default(), 42)
    }

    /// Drop a barrel straight onto the player.
    fn place_barrel_on_player(game: &mut CyberRunner) {
        let body = game.player().bounds();
        let h = game.context().screen_height;
        let mut barrel = Obstacle::new(ObstacleKind::GroundBarrel, 0.0, h);
        // The tick shifts obstacles left by game speed before the collision test.
        barrel.bounds = Aabb::new(
            body.x + game.game_speed(),
            body.y,
            barrel.bounds.width,
            barrel.bounds.height,
        );
        game.obstacles_mut().push(barrel);
    }

    fn hit_once(game: &mut CyberRunner) -> Vec<GameEvent> {
        // Freeze the player so the placed box is where the collision test sees it.
        let gravity = game.config().physics.gravity;
        game.player_mut().velocity_y = -gravity;
        place_barrel_on_player(game);
        game.update(&InputSnapshot::new())
    }

    #[test]
    fn new_match_starts_running_at_full_health() {
        let game = runner();
        assert_eq!(game.phase(), MatchPhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.hud().health, 3);
        assert_eq!(game.game_speed(), 5.0);
        assert_eq!(game.background().current_index(), 0);
    }

    #[test]
    fn configured_seed_is_used() {
        let mut cfg = RunnerConfig::default();
        cfg.obstacles.seed = Some(1234);
        assert_eq!(CyberRunner::new(cfg).seed(), 1234);
    }

    #[test]
    fn score_counts_ticks() {
        let mut game = runner();
        run_game_ticks(&mut game, 10, &InputSnapshot::new());
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn speed_ramps_every_500_ticks() {
        let mut game = runner();
        game.obstacles_mut().clear();
        let mut ramp_events = Vec::new();
        for _ in 0..500 {
            game.obstacles_mut().clear();
            let events = game.update(&InputSnapshot::new());
            ramp_events.extend(
                events
                    .into_iter()
                    .filter(|e| matches!(e, GameEvent::SpeedIncreased { .. })),
            );
        }
        assert_eq!(game.game_speed(), 5.5);
        assert_eq!(ramp_events, vec![GameEvent::SpeedIncreased { speed: 5.5 }]);
        assert_eq!(game.background().scroll_speed(), 5.5 * 0.2);
    }

    #[test]
    fn stage_transition_starts_at_1000() {
        let mut game = runner();
        let mut transitions = Vec::new();
        for _ in 0..1000 {
            game.obstacles_mut().clear();
            for e in game.update(&InputSnapshot::new()) {
                if let GameEvent::StageTransition { stage } = e {
                    transitions.push(stage);
                }
            }
        }
        assert_eq!(transitions, vec![1]);
        assert!(game.background().is_fading());
        assert_eq!(game.background().pending_index(), 1);

        // 255 / 5 = 51 updates; the tick at 1000 already ran one.
        for _ in 0..50 {
            game.obstacles_mut().clear();
            game.update(&InputSnapshot::new());
        }
        assert!(!game.background().is_fading());
        assert_eq!(game.background().current_index(), 1);
    }

    #[test]
    fn collision_costs_health_and_clears_field() {
        let mut game = runner();
        game.obstacles_mut()
            .push(Obstacle::new(ObstacleKind::FloorBeam, 900.0, 720.0));
        let events = hit_once(&mut game);
        assert!(events.contains(&GameEvent::PlayerHit { health: 2 }));
        assert!(game.obstacles().is_empty());
        assert_eq!(game.hud().health, 2);
        assert_eq!(game.phase(), MatchPhase::Running);
    }

    #[test]
    fn three_separated_hits_end_the_match() {
        let mut game = runner();
        let mut all = Vec::new();
        for _ in 0..3 {
            all.extend(hit_once(&mut game));
            all.extend(run_game_ticks(&mut game, 5, &InputSnapshot::new()));
        }
        assert!(game.is_over());
        assert_eq!(game.hud().health, 0);
        let score_at_end = game.score();
        assert_eq!(all.last(), Some(&GameEvent::GameOver { score: score_at_end }));
        let hits = all
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 3);
    }

    #[test]
    fn fatal_tick_still_renders() {
        let mut game = runner();
        for _ in 0..3 {
            hit_once(&mut game);
        }
        assert!(game.is_over());
        let rec = render_frame(&game);
        assert!(rec.texts().contains(&"Health: 0"));
    }

    #[test]
    fn render_order_background_player_obstacles_hud() {
        let mut game = runner();
        game.obstacles_mut()
            .push(Obstacle::new(ObstacleKind::GroundBarrel, 600.0, 720.0));
        let rec = render_frame(&game);
        let cmds = rec.commands();
        assert_eq!(cmds[0], DrawCommand::Clear(Color::BLACK));

        let pos = |key: &str| {
            cmds.iter()
                .position(|c| matches!(c, DrawCommand::Image { key: k, .. } if *k == key))
                .unwrap()
        };
        assert!(pos("bg0") < pos(player::JETPACK_IMAGE));
        assert!(pos(player::JETPACK_IMAGE) < pos("toxic_barrel"));
        assert!(matches!(cmds.last(), Some(DrawCommand::Text { .. })));
        assert_eq!(rec.texts(), vec!["Score: 0", "Health: 3"]);
    }

    #[test]
    fn hud_text_positions_and_colour() {
        let game = runner();
        let rec = render_frame(&game);
        let texts: Vec<_> = rec
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, color, .. } => Some((*x, *y, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![(10.0, 10.0, Color::WHITE), (10.0, 40.0, Color::WHITE)]
        );
    }

    #[test]
    fn jetpack_key_starts_jetpack() {
        let mut game = runner();
        game.update(&held(&[InputAction::ActivateJetpack]));
        assert!(game.player().jetpack_active());
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================

    #[test]
    fn contract_update_advances() {
        let mut game = runner();
        contract_update_advances_score(&mut game);
    }

    #[test]
    fn contract_render_frame() {
        let game = runner();
        contract_render_emits_frame(&game);
    }

    #[test]
    fn contract_hud() {
        let mut game = runner();
        contract_hud_in_range(&game);
        hit_once(&mut game);
        contract_hud_in_range(&game);
    }

    #[test]
    fn contract_game_over_terminal() {
        let mut game = runner();
        for _ in 0..3 {
            hit_once(&mut game);
        }
        contract_game_over_is_terminal(&mut game);
    }
}
