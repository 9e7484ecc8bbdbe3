mod driver;
mod surface;

use tracing_subscriber::EnvFilter;

use jumper_core::game_trait::ArcadeGame;
use jumper_runner::CyberRunner;
use jumper_runner::bot::generate_bot_input;
use jumper_runner::config::RunnerConfig;

use driver::{DriverOptions, run_paced};
use surface::TraceSurface;

/// Command-line overrides.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    seed: Option<u64>,
    max_ticks: Option<u64>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            if let Some(v) = arg.strip_prefix("--seed=") {
                match v.parse::<u64>() {
                    Ok(seed) => parsed.seed = Some(seed),
                    Err(_) => tracing::warn!("Ignoring invalid --seed value: {v}"),
                }
            } else if let Some(v) = arg.strip_prefix("--max-ticks=") {
                match v.parse::<u64>() {
                    Ok(n) => parsed.max_ticks = Some(n),
                    Err(_) => tracing::warn!("Ignoring invalid --max-ticks value: {v}"),
                }
            } else {
                tracing::warn!("Ignoring unknown argument: {arg}");
            }
        }
        parsed
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse(std::env::args().skip(1));

    let mut config = RunnerConfig::load();
    if let Some(seed) = args.seed {
        config.obstacles.seed = Some(seed);
    }
    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        std::process::exit(1);
    }

    tracing::debug!("Headless driver ignores [controls]; input comes from the autopilot");

    let mut game = CyberRunner::new(config);
    let meta = game.metadata();
    tracing::info!(
        game = %meta.name,
        seed = game.seed(),
        tick_rate = game.tick_rate(),
        "Starting match"
    );

    let mut surface = TraceSurface::new(game.tick_rate().round() as u64);
    let opts = DriverOptions {
        max_ticks: args.max_ticks,
    };
    let quit = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    let summary = run_paced(&mut game, generate_bot_input, &mut surface, &opts, quit).await;
    surface.flush();

    tracing::info!(
        ticks = summary.ticks,
        frames = surface.frames(),
        score = summary.score,
        health = summary.health,
        reason = ?summary.reason,
        "Match finished"
    );
}
