//! `slots` CLI — compute and export consultant availability from the command line.
//!
//! Every subcommand reads one JSON request (consultant, weekly schedule, slot
//! config, blocked dates, optional date range) from a file or stdin.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for the request's range (or its advance booking window)
//! slots compute -i request.json
//!
//! # Override the range
//! slots compute -i request.json --from 2026-03-16 --to 2026-03-22
//!
//! # Export as CSV / JSON / iCalendar
//! slots export -i request.json --format ical -o availability.ics
//!
//! # Rewrite a weekly template from a preset
//! slots pattern weekdays-only -i schedule.json
//!
//! # Report invalid weekday entries
//! slots validate -i request.json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use slot_engine::{
    apply_pattern, compute_slots, export, AvailabilityRequest, DateSpan, RecurringPattern,
    WeeklySchedule,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Consultant availability slot computation and export"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
struct RangeArgs {
    /// Request JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// First date (YYYY-MM-DD); overrides the request's range
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last date, inclusive (YYYY-MM-DD); overrides the request's range
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Reference date for the advance booking window (defaults to the local date)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the computed slots as a JSON array
    Compute {
        #[command(flatten)]
        range: RangeArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Export availability as json, csv or ical
    Export {
        #[command(flatten)]
        range: RangeArgs,
        /// Export format: json, csv or ical
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Export timestamp (RFC 3339); defaults to now
        #[arg(long)]
        exported_at: Option<DateTime<Utc>>,
    },
    /// Apply a recurring preset (weekdays-only, weekend-only, daily) to a weekly schedule
    Pattern {
        /// Preset name
        preset: String,
        /// Weekly schedule JSON file (starts from an all-disabled week if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check a request and report weekday entries that will produce no slots
    Validate {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compute { range, output } => {
            let (request, span) = load_request(&range)?;
            let slots = compute_slots(
                span.start,
                span.end,
                &request.weekly_schedule,
                &request.time_slot_config,
                &request.blocked_dates,
                &request.consultant.id,
            )
            .context("Failed to compute availability")?;
            info!(slots = slots.len(), "computed slots");
            let json = serde_json::to_string_pretty(&slots)?;
            write_output(output.as_deref(), json.as_bytes())?;
        }
        Commands::Export {
            range,
            format,
            output,
            exported_at,
        } => {
            let (request, span) = load_request(&range)?;
            let payload = request
                .into_payload(span)
                .context("Failed to compute availability")?;
            let exported_at = exported_at.unwrap_or_else(Utc::now);
            let bytes = export(&payload, &format, exported_at)
                .with_context(|| format!("Failed to export as '{}'", format))?;
            write_output(output.as_deref(), &bytes)?;
        }
        Commands::Pattern {
            preset,
            input,
            output,
        } => {
            let pattern: RecurringPattern = preset
                .parse()
                .context("Available presets: weekdays-only, weekend-only, daily")?;
            let current = match input.as_deref() {
                Some(path) => {
                    let json = read_input(Some(path))?;
                    serde_json::from_str::<WeeklySchedule>(&json)
                        .context("Failed to parse weekly schedule")?
                }
                None => WeeklySchedule::default(),
            };
            let updated = apply_pattern(pattern, &current);
            let json = serde_json::to_string_pretty(&updated)?;
            write_output(output.as_deref(), json.as_bytes())?;
        }
        Commands::Validate { input } => {
            let json = read_input(input.as_deref())?;
            let request =
                AvailabilityRequest::from_json(&json).context("Failed to parse request")?;
            let issues = request.weekly_schedule.validation_issues();
            if !issues.is_empty() {
                for issue in &issues {
                    eprintln!("{}", issue);
                }
                anyhow::bail!("{} invalid weekday entries", issues.len());
            }
            let enabled = request.weekly_schedule.iter().filter(|e| e.enabled).count();
            println!(
                "OK: {} enabled day(s), {} blocked date(s)",
                enabled,
                request.blocked_dates.len()
            );
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read and validate the request, then settle the date range: explicit flags,
/// then the request's own range, then the advance booking window.
fn load_request(args: &RangeArgs) -> Result<(AvailabilityRequest, DateSpan)> {
    let json = read_input(args.input.as_deref())?;
    let request = AvailabilityRequest::from_json(&json).context("Failed to parse request")?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let resolved = request.resolve_range(today);
    let span = DateSpan {
        start: args.from.unwrap_or(resolved.start),
        end: args.to.unwrap_or(resolved.end),
    };
    debug!(start = %span.start, end = %span.end, "resolved date range");
    Ok((request, span))
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

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
