//! `freetime`: compute shared free time from recurring weekly schedules.
//!
//! Reads a JSON request (file or stdin), writes a JSON report to stdout.
//! Logs go to stderr; set `RUST_LOG` or pass `--verbose` to see them.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use freetime_engine::{EngineConfig, FreeTimeEngine, FreeTimeRequest};

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Find shared free time across recurring weekly timetables"
)]
struct Cli {
    /// Log engine decisions (dropped records, suppressed dates) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute shared free time for a request
    Compute {
        /// Request JSON file (use '-' for stdin)
        #[arg(short, long, default_value = "-")]
        request: String,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target term-week, overriding the request
        #[arg(short, long, conflicts_with = "today")]
        week: Option<u32>,

        /// Derive the target week from this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Pretty-print the JSON report
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print the current term-week
    CurrentWeek {
        /// Date to evaluate (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the date range and weekday dates of a term-week
    WeekDates {
        /// Term-week number
        #[arg(short, long)]
        week: u32,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Compute {
            request,
            config,
            week,
            today,
            pretty,
        } => {
            let engine = load_engine(config.as_deref())?;
            let input = read_input(&request)?;
            let mut request: FreeTimeRequest =
                serde_json::from_str(&input).context("Failed to parse request JSON")?;

            if let Some(week) = week {
                request.week = week;
            } else if let Some(today) = today {
                request.week = engine.current_week(today);
            }

            let report = engine.compute(&request)?;
            let output = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{output}");
        }
        Commands::CurrentWeek { today, config } => {
            let engine = load_engine(config.as_deref())?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            println!("{}", engine.current_week(today));
        }
        Commands::WeekDates { week, config } => {
            let engine = load_engine(config.as_deref())?;
            let dates = engine.week_dates(week)?;
            let (first_day, last_day) = engine
                .anchor()
                .week_bounds(week)
                .with_context(|| format!("Week {week} is outside the calendar range"))?;
            let output = serde_json::json!({
                "week": week,
                "first_day": first_day,
                "last_day": last_day,
                "dates": dates,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn load_engine(path: Option<&Path>) -> Result<FreeTimeEngine> {
    let config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(FreeTimeEngine::new(&config)?)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
    }
}
