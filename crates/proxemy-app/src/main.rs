use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use proxemy_app::control;
use proxemy_app::pilot::ScriptedPilot;
use proxemy_app::state::AppState;
use proxemy_core::config::GameConfig;
use proxemy_core::enums::GamePhase;
use proxemy_core::state::GameStateSnapshot;
use proxemy_sim::SimulationEngine;

#[derive(Parser, Debug)]
#[command(name = "proxemy")]
#[command(about = "Run a Proxemy battle with a scripted pilot")]
struct Args {
    /// JSON scenario file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the scenario's RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to run before giving up
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Run on the game loop thread at wall-clock speed
    #[arg(long)]
    realtime: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, tick_rate = config.tick_rate, "starting battle");

    let snapshot = if args.realtime {
        run_realtime(config, args.seconds)?
    } else {
        run_headless(config, args.seconds)
    };

    match &snapshot {
        Some(snap) => info!(
            phase = ?snap.phase,
            score = snap.score,
            seconds = snap.time.elapsed_secs,
            life = snap.ship.as_ref().map_or(0.0, |ship| ship.life),
            "battle over"
        ),
        None => info!("no snapshot produced"),
    }
    if args.dump {
        if let Some(snap) = snapshot {
            println!("{}", serde_json::to_string_pretty(&snap)?);
        }
    }
    Ok(())
}

fn is_over(phase: GamePhase) -> bool {
    matches!(phase, GamePhase::Won | GamePhase::Lost)
}

/// Step the engine directly, as fast as possible.
fn run_headless(config: GameConfig, seconds: f64) -> Option<GameStateSnapshot> {
    let steps = (seconds * f64::from(config.tick_rate)).ceil() as u64;
    let pilot = ScriptedPilot::default();
    let mut engine = SimulationEngine::new(config);

    let mut last = None;
    for step in 0..steps {
        engine.queue_commands(pilot.commands(step));
        let snap = engine.tick();
        let over = is_over(snap.phase);
        last = Some(snap);
        if over {
            break;
        }
    }
    last
}

/// Drive the game loop thread through its control surface.
fn run_realtime(config: GameConfig, seconds: f64) -> anyhow::Result<Option<GameStateSnapshot>> {
    let pilot = ScriptedPilot::default();
    let state = AppState::new();
    control::start_simulation(&state, config)?;

    let deadline = Instant::now() + Duration::from_secs_f64(seconds.max(0.0));
    let mut next_step = 0;
    while Instant::now() < deadline {
        let snap = control::get_snapshot(&state);
        let tick = snap.as_ref().map_or(0, |s| s.time.tick);
        if snap.as_ref().is_some_and(|s| is_over(s.phase)) {
            break;
        }
        // Commands for every step the loop has passed since the last poll.
        while next_step <= tick {
            for command in pilot.commands(next_step) {
                control::send_command(&state, command)?;
            }
            next_step += 1;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    let snapshot = control::get_snapshot(&state);
    control::stop_simulation(&state)?;
    Ok(snapshot)
}
