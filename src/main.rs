//! racedash CLI - pick a track and a racer, then race from the terminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use racedash::app::RaceApp;
use racedash::catalog::DisplayNames;
use racedash::client::{ClientConfig, RaceClient, DEFAULT_SERVER};
use racedash::error::RaceError;
use racedash::race::{Accelerator, RaceConfig, RaceIdPolicy, RaceOutcome};
use racedash::view::TerminalSurface;

type App = RaceApp<RaceClient, TerminalSurface>;

#[derive(Parser)]
#[command(name = "racedash")]
#[command(author, version, about = "Terminal client for the racing game service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Base URL of the race service
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Extra attempts for a failed race poll
    #[arg(long, default_value = "0")]
    poll_retries: u32,

    /// Give up a race after this many failed polls in a row
    #[arg(long)]
    max_poll_failures: Option<u32>,

    /// Use the created race id as-is instead of the server's id - 1
    #[arg(long)]
    verbatim_race_id: bool,

    /// Show the names the server reports instead of the built-in ones
    #[arg(long)]
    server_names: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tracks
    Tracks,

    /// List available racers
    Racers,

    /// Run a single race
    Race {
        /// Track id
        #[arg(short, long)]
        track: u32,

        /// Racer id
        #[arg(short, long)]
        racer: u32,

        /// Press the gas automatically every N milliseconds
        #[arg(long)]
        auto_accelerate: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    println!(
        "{}",
        format!("racedash v{}", env!("CARGO_PKG_VERSION")).cyan().bold()
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    // First Ctrl-C cancels the current load or race, a second one exits
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    rt.spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        ctrl_c.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let mut app = build_app(&cli)?.with_cancellation(cancel);
    load_catalog(&rt, &mut app, &cli.server)?;

    if cli.interactive {
        return run_interactive(&rt, &mut app);
    }

    match cli.command {
        Some(Commands::Tracks) => list_tracks(&app),
        Some(Commands::Racers) => list_racers(&app),
        Some(Commands::Race {
            track,
            racer,
            auto_accelerate,
        }) => run_race(&rt, &mut app, track, racer, auto_accelerate),
        None => run_interactive(&rt, &mut app),
    }
}

fn build_app(cli: &Cli) -> Result<App> {
    let client = RaceClient::new(ClientConfig {
        base_url: cli.server.clone(),
        timeout_secs: cli.timeout,
        poll_retries: cli.poll_retries,
        ..Default::default()
    })
    .context("Failed to create HTTP client")?;

    let config = RaceConfig {
        race_id_policy: if cli.verbatim_race_id {
            RaceIdPolicy::Verbatim
        } else {
            RaceIdPolicy::ServerOffset
        },
        max_poll_failures: cli.max_poll_failures,
        ..Default::default()
    };

    let names = if cli.server_names {
        DisplayNames::server()
    } else {
        DisplayNames::builtin()
    };

    Ok(RaceApp::new(
        Arc::new(client),
        Arc::new(TerminalSurface::race_only()),
        config,
        names,
    ))
}

fn load_catalog(rt: &Runtime, app: &mut App, server: &str) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Loading tracks and racers from {}...", server));

    let result = rt.block_on(app.load()).map(|_| ());
    pb.finish_and_clear();

    result.with_context(|| format!("Failed to load tracks and racers from {}", server))
}

fn list_tracks(app: &App) -> Result<()> {
    println!("{}", "Tracks:".yellow().bold());
    println!("{}", "-".repeat(40));
    for track in &app.catalog().tracks {
        println!("  {:2}: {}", track.id, track.name);
    }
    Ok(())
}

fn list_racers(app: &App) -> Result<()> {
    println!("{}", "Racers:".yellow().bold());
    println!(
        "  {:>2}  {:<28} {:>6} {:>6} {:>6}",
        "ID", "Name", "Speed", "Accel", "Hndl"
    );
    println!("{}", "-".repeat(56));
    for racer in &app.catalog().racers {
        println!(
            "  {:2}  {:<28} {:>6} {:>6} {:>6}",
            racer.id,
            truncate_name(&racer.driver_name, 28),
            racer.top_speed,
            racer.acceleration,
            racer.handling
        );
    }
    Ok(())
}

fn run_race(
    rt: &Runtime,
    app: &mut App,
    track: u32,
    racer: u32,
    auto_accelerate: Option<u64>,
) -> Result<()> {
    rt.block_on(async {
        app.select_track(track).await?;
        app.select_racer(racer).await
    })?;

    let pedal = auto_accelerate.map(|ms| {
        let accelerator = app.accelerator();
        rt.spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(ms.max(1)));
            loop {
                ticker.tick().await;
                accelerator.press();
            }
        })
    });

    let result = rt.block_on(app.create_race());
    if let Some(pedal) = pedal {
        pedal.abort();
    }

    let outcome = result.context("Race failed")?;
    print_outcome(&outcome, racer);
    Ok(())
}

/// Sends one accelerate request per line read from stdin
struct Pedal {
    stop: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl Pedal {
    fn attach(accelerator: Accelerator<RaceClient>, handle: Handle) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);

        let reader = std::thread::spawn(move || {
            let _runtime = handle.enter();
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if line.is_err() || stopped.load(Ordering::Relaxed) {
                    break;
                }
                accelerator.press();
            }
        });

        Self { stop, reader }
    }

    /// Blocks until the reader has consumed one more line
    fn release(self) {
        self.stop.store(true, Ordering::Relaxed);
        println!("{}", "Press Enter to continue".dimmed());
        if self.reader.join().is_err() {
            tracing::warn!("Pedal reader panicked");
        }
    }
}

fn run_interactive(rt: &Runtime, app: &mut App) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());

    if app.catalog().tracks.is_empty() || app.catalog().racers.is_empty() {
        anyhow::bail!("The server offered no tracks or no racers");
    }

    let theme = ColorfulTheme::default();

    loop {
        let track_labels: Vec<String> = app.catalog().tracks.iter().map(|t| t.name.clone()).collect();
        let track_idx = Select::with_theme(&theme)
            .with_prompt("Select a track")
            .items(&track_labels)
            .default(0)
            .interact()?;

        let racer_labels: Vec<String> = app
            .catalog()
            .racers
            .iter()
            .map(|r| {
                format!(
                    "{} (speed {}, acceleration {}, handling {})",
                    r.driver_name, r.top_speed, r.acceleration, r.handling
                )
            })
            .collect();
        let racer_idx = Select::with_theme(&theme)
            .with_prompt("Select a racer")
            .items(&racer_labels)
            .default(0)
            .interact()?;

        let track_id = app.catalog().tracks[track_idx].id;
        let racer_id = app.catalog().racers[racer_idx].id;
        rt.block_on(async {
            app.select_track(track_id).await?;
            app.select_racer(racer_id).await
        })?;

        println!(
            "\n{}",
            "Press Enter as fast as you can to make your racer go faster!".yellow()
        );
        let pedal = Pedal::attach(app.accelerator(), rt.handle().clone());
        let result = rt.block_on(app.create_race());
        pedal.release();

        match result {
            Ok(outcome) => print_outcome(&outcome, racer_id),
            Err(RaceError::Cancelled) => {
                println!("{}", "Race cancelled".red());
                break;
            }
            Err(e) => println!("{}: {}", "Race failed".red(), e),
        }

        let next = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&["Start a new race", "Quit"])
            .default(0)
            .interact()?;
        if next == 1 {
            println!("Goodbye!");
            break;
        }
    }

    Ok(())
}

fn print_outcome(outcome: &RaceOutcome, racer_id: u32) {
    println!();
    match outcome.placing(racer_id) {
        Some(1) => println!("{}", "You won!".green().bold()),
        Some(place) => println!("You finished {}", ordinal(place).yellow().bold()),
        None => println!("{}", "No final placing reported".dimmed()),
    }
    println!(
        "Race {} finished at {} after {} polls",
        outcome.race_id,
        outcome.finished_at.format("%H:%M:%S"),
        outcome.polls
    );
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
