//! weekshare CLI: build, inspect and view shareable weekly availability tokens.

mod logging;
mod render;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use weekshare::civil::Instant;
use weekshare::codec::{self, TimeRange};
use weekshare::labels::describe_range;
use weekshare::zone::{search_time_zones, supported_time_zones, TimeZoneId, DEFAULT_ZONE};
use weekshare::{segment, RangeId, Schedule, ScheduleOptions, Selection, TimeFormat};

use logging::StderrLogger;

#[derive(Parser)]
#[command(name = "weekshare", version)]
#[command(about = "Share weekly availability as a link that reads right in every timezone")]
struct Cli {
    /// IANA zone to edit or view in. Defaults to the system zone.
    #[arg(long, global = true, env = "WEEKSHARE_TZ")]
    tz: Option<String>,

    /// JSON file with schedule options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Clock style for labels: 12 or 24
    #[arg(long, global = true)]
    format: Option<TimeFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode ranges given as JSON into a share token
    Encode {
        /// JSON file with `[{"start": ms, "end": ms}, ...]`, or `-` for stdin
        #[arg(long, default_value = "-")]
        ranges: String,

        /// Print a full share URL on this base instead of the bare token
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show what a token contains
    Decode {
        /// Share token or share URL
        token: String,

        /// Print the decoded state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a shared schedule in your own timezone
    View {
        /// Share token or share URL
        token: String,

        /// Draw the week as a half-hour grid
        #[arg(long)]
        grid: bool,
    },

    /// Add a grid selection and print the updated token
    Add {
        /// Existing token or URL. Starts an empty schedule when omitted.
        token: Option<String>,

        /// Day column, 0 = Monday
        #[arg(long)]
        day: u8,

        /// First half-hour slot, 0-47
        #[arg(long)]
        from: u8,

        /// Last half-hour slot, 0-47 (inclusive)
        #[arg(long)]
        to: u8,

        /// Print a full share URL on this base instead of the bare token
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Remove a range by id and print the updated token
    Remove {
        /// Share token or share URL
        token: String,

        /// 1-based position of the range in the token
        id: u64,
    },

    /// Split an instant range into per-local-day segments
    Segment {
        /// Start instant, milliseconds since the Unix epoch
        #[arg(long)]
        start: i64,

        /// End instant, milliseconds since the Unix epoch
        #[arg(long)]
        end: i64,
    },

    /// List supported timezones, optionally filtered
    Zones {
        /// Case-insensitive substring to match
        query: Option<String>,
    },
}

fn main() -> Result<()> {
    StderrLogger::init();
    let cli = Cli::parse();

    let mut options = load_options(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        options.time_format = format;
    }
    let tz = cli.tz.unwrap_or_else(system_zone);

    match cli.command {
        Command::Encode { ranges, base_url } => {
            let ranges = read_ranges(&ranges)?;
            let mut schedule = Schedule::new(&tz, options);
            for (index, range) in ranges.into_iter().enumerate() {
                schedule
                    .add_range(range)
                    .with_context(|| format!("range {index} ({range}) was rejected"))?;
            }
            print_token(&schedule, base_url.as_deref());
        }
        Command::Decode { token, json } => {
            let shared = codec::decode(codec::token_from_url(&token))
                .context("could not decode share token")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&shared)?);
            } else {
                let owner = TimeZoneId::resolve_or(&shared.timezone, &options.fallback_timezone);
                println!("timezone: {}", shared.timezone);
                println!("ranges: {}", shared.ranges.len());
                for range in &shared.ranges {
                    println!(
                        "  {}  ({range})",
                        describe_range(range, owner, options.time_format)
                    );
                }
            }
        }
        Command::View { token, grid } => {
            let mut schedule = load_schedule(&token, options)?;
            let owner = schedule.timezone();
            schedule.set_timezone(&tz);
            println!(
                "Availability shared from {owner}, shown in {}",
                schedule.timezone()
            );
            if grid {
                print!("{}", render::week_grid(&schedule)?);
            } else if schedule.is_empty() {
                println!("No availability shared.");
            } else {
                for line in schedule.describe() {
                    println!("  {line}");
                }
            }
        }
        Command::Add {
            token,
            day,
            from,
            to,
            base_url,
        } => {
            let mut schedule = match token {
                Some(token) => load_schedule(&token, options)?,
                None => Schedule::new(&tz, options),
            };
            let id = schedule
                .add_selection(&Selection::new(day, from, to))
                .context("selection was rejected")?;
            debug!(%id, zone = %schedule.timezone(), "added range");
            print_token(&schedule, base_url.as_deref());
        }
        Command::Remove { token, id } => {
            let mut schedule = load_schedule(&token, options)?;
            if !schedule.remove(RangeId::new(id)) {
                bail!("no range with id {id}; the token has {}", schedule.len());
            }
            print_token(&schedule, None);
        }
        Command::Segment { start, end } => {
            let zone = TimeZoneId::resolve_or(&tz, &options.fallback_timezone);
            let segments = segment(Instant::from_millis(start), Instant::from_millis(end), zone)?;
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        Command::Zones { query } => {
            let zones = match query.as_deref() {
                Some(query) => search_time_zones(query),
                None => supported_time_zones(),
            };
            for zone in zones {
                println!("{zone}");
            }
        }
    }

    Ok(())
}

fn system_zone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|err| {
        debug!(error = %err, "system timezone unavailable");
        DEFAULT_ZONE.to_string()
    })
}

fn load_options(path: Option<&Path>) -> Result<ScheduleOptions> {
    let Some(path) = path else {
        return Ok(ScheduleOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn read_ranges(source: &str) -> Result<Vec<TimeRange>> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read ranges from stdin")?;
        text
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };
    serde_json::from_str(&text).context("ranges must be a JSON array of {\"start\", \"end\"}")
}

fn load_schedule(token: &str, options: ScheduleOptions) -> Result<Schedule> {
    Schedule::from_token(codec::token_from_url(token), options)
        .context("could not load schedule from share token")
}

fn print_token(schedule: &Schedule, base_url: Option<&str>) {
    let token = schedule.to_token();
    match base_url {
        Some(base) => println!("{}", codec::share_url(base, &token)),
        None => println!("{token}"),
    }
}
