pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod render;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{ArcadeGame, GameEvent};
    use crate::input::{InputAction, InputSnapshot};
    use crate::render::{DrawCommand, FrameRecorder};

    /// Snapshot holding exactly `actions`.
    pub fn held(actions: &[InputAction]) -> InputSnapshot {
        InputSnapshot::from_actions(actions)
    }

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_game_ticks(
        game: &mut dyn ArcadeGame,
        n: usize,
        input: &InputSnapshot,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(input));
        }
        all_events
    }

    /// Render one frame into a fresh recorder.
    pub fn render_frame(game: &dyn ArcadeGame) -> FrameRecorder {
        let mut rec = FrameRecorder::new();
        game.render(&mut rec);
        rec
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every ArcadeGame implementation must pass. Game crates
    // call them from their own test modules with a fresh game instance.

    /// A running game's score must advance on update.
    pub fn contract_update_advances_score(game: &mut dyn ArcadeGame) {
        let before = game.hud().score;
        game.update(&InputSnapshot::new());
        assert!(
            game.hud().score > before,
            "update() must advance the score while running"
        );
    }

    /// Every frame starts with a clear and carries HUD text.
    pub fn contract_render_emits_frame(game: &dyn ArcadeGame) {
        let rec = render_frame(game);
        assert!(
            matches!(rec.commands().first(), Some(DrawCommand::Clear(_))),
            "frame must start with a clear"
        );
        assert!(!rec.texts().is_empty(), "frame must carry HUD text");
    }

    /// HUD health must never exceed its maximum.
    pub fn contract_hud_in_range(game: &dyn ArcadeGame) {
        let hud = game.hud();
        assert!(
            hud.health <= hud.max_health,
            "health {} exceeds max {}",
            hud.health,
            hud.max_health
        );
    }

    /// Once over, update() must be a no-op that emits nothing.
    pub fn contract_game_over_is_terminal(game: &mut dyn ArcadeGame) {
        assert!(game.is_over(), "contract requires a finished game");
        let before = game.hud();
        let events = game.update(&InputSnapshot::new());
        assert!(events.is_empty(), "finished game must not emit events");
        assert_eq!(before, game.hud(), "finished game must not change");
    }
}
