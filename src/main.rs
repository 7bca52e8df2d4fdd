//! RouteWalk - GPS-guided fitness walks
//!
//! Command line entry point. Lists the route catalog or replays a recorded
//! track through a walking session in the terminal.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use routewalk::location::{LocationEvent, ReplaySource};
use routewalk::route::{Difficulty, DurationChoice};
use routewalk::session::SessionError;
use routewalk::storage::config::{load_config, load_config_from};
use routewalk::ui::{ConsoleUi, Screen};
use routewalk::WalkSession;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "routewalk", version, about = "GPS-guided fitness walks")]
struct Cli {
    /// Configuration file (defaults to the platform data directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the routes in the catalog
    Routes,
    /// Replay a recorded track through a walking session
    Simulate {
        /// Session length in minutes (10, 20, 30) or short/medium/long
        #[arg(short, long, default_value = "10")]
        duration: DurationChoice,
        /// Challenge difficulty (easy, medium, hard)
        #[arg(short = 'l', long, default_value = "medium")]
        difficulty: Difficulty,
        /// JSON array of {latitude, longitude, accuracy_meters} points
        #[arg(short, long)]
        track: PathBuf,
        /// Delay between replayed fixes in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval_ms: u64,
        /// Print every map and timer update
        #[arg(short, long)]
        verbose: bool,
    },
}

enum Tick {
    Location(Option<LocationEvent>),
    Timer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RouteWalk v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    let catalog = config.catalog().context("Failed to load route catalog")?;

    match cli.command {
        Command::Routes => {
            for route in catalog.routes() {
                println!("{} ({}, {} stops)", route.name, route.duration, route.len());
                for (i, waypoint) in route.waypoints().iter().enumerate() {
                    println!("  {:>2}. {} [{}]", i + 1, waypoint.name, waypoint.coordinate);
                }
            }
            Ok(())
        }
        Command::Simulate {
            duration,
            difficulty,
            track,
            interval_ms,
            verbose,
        } => {
            let content = std::fs::read_to_string(&track)
                .with_context(|| format!("Failed to read track {}", track.display()))?;
            let mut source = ReplaySource::from_json(&content, Duration::from_millis(interval_ms))
                .context("Failed to parse track")?;

            let mut session = WalkSession::new(
                &config,
                catalog,
                ConsoleUi::new(verbose),
                ConsoleUi::new(verbose),
            );
            session.start(duration, difficulty, &mut source)?;
            let mut ticks = session.timer().subscribe();

            loop {
                let tick = tokio::select! {
                    event = session.next_location_event() => Tick::Location(event),
                    _ = ticks.changed() => Tick::Timer,
                };

                match tick {
                    Tick::Timer => session.on_timer_tick(),
                    Tick::Location(None) => break,
                    Tick::Location(Some(event)) => {
                        session.handle_location_event(event);
                        walk_through_challenges(&mut session)?;
                    }
                }

                if session.screen() == Screen::Final {
                    break;
                }
            }

            if let Some(prompt) = session.prompt() {
                bail!("Location tracking failed: {}", prompt.error);
            }

            if session.screen() != Screen::Final {
                let summary = session.tracker().map(|t| t.summary());
                if let Some(summary) = summary {
                    println!("Track ended with {} waypoints visited", summary);
                }
            }
            Ok(())
        }
    }
}

/// Press "Arrived" and "Done" whenever the simulated walker can.
fn walk_through_challenges(
    session: &mut WalkSession<ConsoleUi, ConsoleUi>,
) -> anyhow::Result<()> {
    loop {
        match session.screen() {
            Screen::Challenge => {
                session.done()?;
            }
            Screen::Map => {
                let in_range = session.tracker().is_some_and(|t| t.is_target_in_range());
                if !in_range {
                    return Ok(());
                }
                match session.arrived() {
                    Ok(_) => {}
                    Err(SessionError::NotArrived { .. })
                    | Err(SessionError::NoFix)
                    | Err(SessionError::NoTarget) => {
                        return Ok(())
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Screen::Start | Screen::Final => return Ok(()),
        }
    }
}
