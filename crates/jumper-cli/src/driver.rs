use std::future::Future;
use std::time::Duration;

use jumper_core::game_trait::{ArcadeGame, GameEvent};
use jumper_core::input::InputSnapshot;
use jumper_core::render::RenderSurface;

const DEFAULT_TICK_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Why a paced run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    GameOver,
    Quit,
    TickLimit,
}

/// Outcome of a paced run, logged at exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSummary {
    pub ticks: u64,
    pub score: u64,
    pub health: u32,
    pub reason: EndReason,
}

#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Stop after this many ticks even if the match is still running.
    pub max_ticks: Option<u64>,
}

/// Drive `game` at its own tick rate until it ends, the tick limit is hit,
/// or `quit` resolves.
///
/// Each tick samples input once, updates, then renders, so the tick that ends
/// the match is still drawn. The quit signal is checked between ticks.
pub async fn run_paced<G, F>(
    game: &mut G,
    mut sample_input: F,
    surface: &mut dyn RenderSurface,
    opts: &DriverOptions,
    quit: impl Future<Output = ()>,
) -> MatchSummary
where
    G: ArcadeGame + ?Sized,
    F: FnMut(&G) -> InputSnapshot,
{
    let tick_interval = tick_period(game.tick_rate());
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tokio::pin!(quit);

    let mut ticks: u64 = 0;
    let reason = loop {
        tokio::select! {
            biased;
            _ = &mut quit => {
                tracing::info!(ticks, "Quit requested");
                break EndReason::Quit;
            }
            _ = interval.tick() => {
                let input = sample_input(&*game);
                for event in game.update(&input) {
                    log_event(ticks, &event);
                }
                game.render(surface);
                ticks += 1;

                if game.is_over() {
                    break EndReason::GameOver;
                }
                if opts.max_ticks.is_some_and(|max| ticks >= max) {
                    break EndReason::TickLimit;
                }
            }
        }
    };

    let hud = game.hud();
    MatchSummary {
        ticks,
        score: hud.score,
        health: hud.health,
        reason,
    }
}

/// Period for `tick_rate` Hz. Rates with no usable period fall back to 60 Hz.
fn tick_period(tick_rate: f32) -> Duration {
    match Duration::try_from_secs_f32(1.0 / tick_rate) {
        Ok(period) if !period.is_zero() => period,
        _ => {
            tracing::warn!(tick_rate, "Unusable tick rate, pacing at 60 Hz");
            DEFAULT_TICK_PERIOD
        },
    }
}

fn log_event(tick: u64, event: &GameEvent) {
    match event {
        GameEvent::GameOver { score } => tracing::info!(tick, score, "Match over"),
        other => tracing::debug!(tick, event = ?other, "Game event"),
    }
}
