//! Full-match smoke tests: drive `CyberRunner` tick by tick the way the
//! driver does (sample input, update, render) and check end-to-end outcomes.

use jumper_core::game_trait::{ArcadeGame, GameEvent};
use jumper_core::input::InputSnapshot;
use jumper_core::render::FrameRecorder;
use jumper_core::test_helpers::render_frame;

use jumper_runner::bot::generate_bot_input;
use jumper_runner::config::RunnerConfig;
use jumper_runner::{CyberRunner, MatchPhase};

/// Run until the match ends or `max_ticks` pass, rendering every tick.
/// Returns all events and the number of ticks run.
fn play(
    game: &mut CyberRunner,
    max_ticks: u64,
    mut input: impl FnMut(&CyberRunner) -> InputSnapshot,
) -> (Vec<GameEvent>, u64) {
    let mut events = Vec::new();
    let mut ticks = 0;
    let mut rec = FrameRecorder::new();
    while ticks < max_ticks && !game.is_over() {
        let snapshot = input(game);
        events.extend(game.update(&snapshot));
        game.render(&mut rec);
        assert!(!rec.take().is_empty(), "every tick renders a frame");
        ticks += 1;
    }
    (events, ticks)
}

#[test]
fn idle_player_eventually_loses() {
    let mut game = CyberRunner::with_seed(RunnerConfig::default(), 42);
    let (events, ticks) = play(&mut game, 10_000, |_| InputSnapshot::new());

    assert!(game.is_over(), "idle player survived {ticks} ticks");
    assert_eq!(game.phase(), MatchPhase::GameOver);

    let hits: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PlayerHit { health } => Some(*health),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![2, 1, 0]);
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver { score: ticks })
    );

    // The final frame still shows the HUD.
    let frame = render_frame(&game);
    assert!(frame.texts().contains(&"Health: 0"));
}

#[test]
fn autopilot_survives_early_stages() {
    for seed in [1, 42, 7] {
        let mut game = CyberRunner::with_seed(RunnerConfig::default(), seed);
        let (events, ticks) = play(&mut game, 3000, generate_bot_input);

        assert_eq!(ticks, 3000, "seed {seed}: match ended early");
        assert_eq!(game.hud().health, game.hud().max_health, "seed {seed}");
        assert_eq!(game.game_speed(), 8.0);
        assert!(game.background().current_index() >= 2);

        let stages: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StageTransition { stage } => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![1, 2, 3]);
    }
}

#[test]
fn same_seed_same_match() {
    let mut a = CyberRunner::with_seed(RunnerConfig::default(), 99);
    let mut b = CyberRunner::with_seed(RunnerConfig::default(), 99);
    let (events_a, ticks_a) = play(&mut a, 4000, |_| InputSnapshot::new());
    let (events_b, ticks_b) = play(&mut b, 4000, |_| InputSnapshot::new());
    assert_eq!(ticks_a, ticks_b);
    assert_eq!(events_a, events_b);
    assert_eq!(a.obstacles().obstacles(), b.obstacles().obstacles());
}

#[test]
fn config_from_toml_drives_match() {
    let cfg = RunnerConfig::from_toml_str(
        r#"
        [obstacles]
        seed = 3

        [physics]
        max_health = 1
        "#,
    )
    .unwrap();
    cfg.validate().unwrap();

    let mut game = CyberRunner::new(cfg);
    assert_eq!(game.seed(), 3);
    let (events, _) = play(&mut game, 10_000, |_| InputSnapshot::new());
    assert!(game.is_over());
    let hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
        .count();
    assert_eq!(hits, 1);
}
