use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use daycycle::{
    clock::{Clock, LocalClock},
    config::{Config, ConfigLoader},
    logging,
    render::render_card,
    rng::RngManager,
    simulator::DayCycle,
    theme::Theme,
    ticker::Ticker,
    web::{self, WebServerConfig},
};

const WEATHER_STREAM: &str = "weather";

#[derive(Debug, Parser)]
#[command(author, version, about = "Live day-progress clock with simulated weather")]
struct Cli {
    /// Path to a YAML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the weather generator
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Theme preference: light or dark
    #[arg(long, global = true)]
    theme: Option<Theme>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Redraw the day card in the terminal every tick until Ctrl+C
    Run,
    /// Serve the day card as a live web page
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the frame for a single time of day
    Show {
        /// Local time as HH:MM:SS
        #[arg(long)]
        at: NaiveTime,
        /// Calendar date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Draw new weather before rendering
        #[arg(long)]
        refresh: bool,
        /// Emit the frame as JSON instead of the card
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(".")
            .load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    logging::init(&config.logging.level);

    let mut rng_manager = match config.seed {
        Some(seed) => RngManager::new(seed),
        None => RngManager::from_entropy(),
    };
    info!(seed = rng_manager.seed(), theme = %config.theme, "configuration loaded");

    match cli.command {
        Command::Run => {
            config.validate()?;
            run_terminal(&config, &mut rng_manager).await
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }
            config.validate()?;
            let mut cycle = DayCycle::with_weather(LocalClock.now(), config.initial_weather);
            cycle.set_theme(config.theme);
            web::run(WebServerConfig {
                addr: config.web.socket_addr()?,
                cycle,
                rng: rng_manager.take_stream(WEATHER_STREAM),
            })
            .await
        }
        Command::Show {
            at,
            date,
            refresh,
            json,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let now = date.and_time(at);
            let mut cycle = DayCycle::with_weather(now, config.initial_weather);
            cycle.set_theme(config.theme);
            let mut rng = rng_manager.stream(WEATHER_STREAM);
            if refresh {
                cycle.refresh_weather(&mut rng);
            }
            let frame = cycle.tick(now, &mut rng);
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("{}", render_card(&frame));
            }
            Ok(())
        }
    }
}

async fn run_terminal(config: &Config, rng_manager: &mut RngManager) -> Result<()> {
    let mut cycle = DayCycle::with_weather(LocalClock.now(), config.initial_weather);
    cycle.set_theme(config.theme);

    // Draw once before the ticker's first aligned tick.
    let mut stdout = std::io::stdout();
    writeln!(stdout, "\x1b[2J\x1b[H{}", render_card(&cycle.frame()))?;
    stdout.flush()?;

    let (frames_tx, mut frames_rx) = broadcast::channel(16);
    let (_theme_tx, theme_rx) = watch::channel(config.theme);
    let ticker = Ticker::new(cycle, LocalClock, rng_manager.take_stream(WEATHER_STREAM))
        .spawn(theme_rx, frames_tx);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            received = frames_rx.recv() => match received {
                Ok(frame) => {
                    writeln!(stdout, "\x1b[2J\x1b[H{}", render_card(&frame))?;
                    stdout.flush()?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "terminal fell behind the ticker");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    let cycle = ticker.stop().await.context("ticker task failed")?;
    info!(weather = %cycle.weather().kind, "stopped");
    Ok(())
}
