//! `freetime` CLI: compute shared free time from participants' calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Windows when everyone in the file is free
//! freetime shared -i participants.json --start 2025-10-04T09:00:00 --end 2025-10-04T17:00:00
//!
//! # Only some participants, with per-block participant counts
//! freetime shared -i participants.json -p alice -p bob --privacy full \
//!   --start 2025-10-04T09:00:00Z --end 2025-10-04T17:00:00Z
//!
//! # One participant's own free time
//! freetime user -i participants.json --participant alice --start ... --end ...
//!
//! # Merged busy timeline, unbounded
//! freetime busy -i participants.json
//!
//! # Which provider settings are configured (no secrets printed)
//! freetime health --config availability.toml
//! ```
//!
//! The participants file is a JSON array of `{"id": ..., "events": [...]}`
//! where events use the calendar provider's `start`/`end` marker shape.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use availability_engine::availability::{merged_busy_timeline, ParticipantEvents};
use availability_engine::{
    AvailabilityError, AvailabilityService, EngineConfig, Participant, PrivacyLevel,
    StaticEventSource, TimeRange,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Shared free-time calculator for calendar participants"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (environment variables are used when omitted)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Free windows shared by all selected participants
    Shared {
        /// Participants file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Range start, ISO 8601 (naive values use the configured timezone)
        #[arg(long)]
        start: String,
        /// Range end, ISO 8601
        #[arg(long)]
        end: String,
        /// Restrict to these participant ids (repeatable; default is everyone)
        #[arg(short = 'p', long = "participant")]
        participants: Vec<String>,
        /// Override the configured privacy level
        #[arg(long, value_enum)]
        privacy: Option<PrivacyArg>,
        /// Drop free windows shorter than this many minutes (defaults to the
        /// configured `min_window_minutes`)
        #[arg(long)]
        min_minutes: Option<i64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Free windows of a single participant
    User {
        /// Participants file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Participant id
        #[arg(long)]
        participant: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Merged busy timeline across every participant in the file
    Busy {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report which provider settings are present
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrivacyArg {
    Full,
    Opaque,
}

impl From<PrivacyArg> for PrivacyLevel {
    fn from(arg: PrivacyArg) -> Self {
        match arg {
            PrivacyArg::Full => PrivacyLevel::Full,
            PrivacyArg::Opaque => PrivacyLevel::Opaque,
        }
    }
}

/// Structured failure printed to stderr for engine errors.
#[derive(Serialize)]
struct ErrorReport<'a> {
    kind: &'a str,
    detail: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Shared {
            input,
            start,
            end,
            participants,
            privacy,
            min_minutes,
            output,
        } => {
            if let Some(privacy) = privacy {
                config.privacy = privacy.into();
            }
            let range = TimeRange::parse(&start, &end, config.timezone()?)?;
            let source: StaticEventSource = read_participants(input.as_deref())?
                .into_iter()
                .collect();
            let service = AvailabilityService::new(config, source)?;

            let ids = if participants.is_empty() {
                service.source().participant_ids()
            } else {
                participants
            };
            let selected: Vec<Participant> = ids.into_iter().map(Participant::anonymous).collect();
            debug!(participants = selected.len(), "computing shared free time");

            let mut result = service.shared_free_time(&range, &selected).await?;
            let min = min_minutes.unwrap_or(service.config().min_window_minutes);
            result.shared_free_time = result.shared_free_time.at_least(min);

            write_json(output.as_deref(), &result)?;
        }
        Commands::User {
            input,
            participant,
            start,
            end,
            output,
        } => {
            let range = TimeRange::parse(&start, &end, config.timezone()?)?;
            let source: StaticEventSource = read_participants(input.as_deref())?
                .into_iter()
                .collect();
            let service = AvailabilityService::new(config, source)?;
            let free = service
                .participant_free_time(&range, &Participant::anonymous(participant))
                .await?;

            write_json(output.as_deref(), &serde_json::json!({ "free_time": free }))?;
        }
        Commands::Busy { input, output } => {
            let file = read_participants(input.as_deref())?;
            let timeline = merged_busy_timeline(&file, config.timezone()?)?;

            write_json(output.as_deref(), &serde_json::json!({ "busy": timeline }))?;
        }
        Commands::Health => {
            write_json(None, &config.health())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Engine errors become a JSON `{kind, detail}` object and exit status 2;
/// anything else (I/O, bad JSON) is printed plainly with status 1.
fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(engine) = err.downcast_ref::<AvailabilityError>() {
        let report = ErrorReport {
            kind: engine.kind().as_str(),
            detail: engine.to_string(),
        };
        match serde_json::to_string(&report) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{}: {}", report.kind, report.detail),
        }
        return ExitCode::from(2);
    }
    eprintln!("Error: {err:#}");
    ExitCode::FAILURE
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::from_env_vars(std::env::vars())
            .context("Failed to read configuration from environment")?,
    };
    Ok(config)
}

fn read_participants(path: Option<&str>) -> Result<Vec<ParticipantEvents>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse participants JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", json);
        }
    }
    Ok(())
}
