//! Command that decodes UUIDv7 timestamps and prints prefix reference tables

use clap::{Parser, Subcommand};
use std::{io, io::Write, process::ExitCode, thread};
use tracing_subscriber::EnvFilter;
use uuid7_prefix::{
    calendar_prefixes, min_unique_prefix_length, Config, DateInfo, OsRandom, Timestamp,
    V7Generator,
};

#[derive(Parser, Debug)]
#[command(name = "uuid7-prefix", version, about = "Relate UUIDv7 prefixes to points in time")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode the creation time of a UUIDv7
    Parse {
        /// UUID or a prefix of at least 12 hexadecimal digits
        uuid: String,
    },

    /// Generate UUIDv7 strings
    Generate {
        /// Number of UUIDs to generate
        #[arg(short = 'n', default_value_t = 1)]
        count: usize,

        /// Unix timestamp in milliseconds to embed instead of the current time
        #[arg(long)]
        at: Option<i64>,

        /// Print in uppercase with braces
        #[arg(long)]
        braced: bool,
    },

    /// Print prefixes for instants around now
    References {
        /// Keep printing the table every refresh interval
        #[arg(long)]
        watch: bool,

        /// Refresh interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Print the points where the leading three or four digits change
    Transitions {
        /// Width of the compared prefix (3 or 4); both are printed if omitted
        #[arg(long, value_parser = clap::value_parser!(u8).range(3..=4))]
        digits: Option<u8>,

        /// First 4-digit prefix scanned, in hexadecimal
        #[arg(long, value_parser = parse_hex)]
        start: Option<u16>,

        /// Last 4-digit prefix scanned, in hexadecimal
        #[arg(long, value_parser = parse_hex)]
        end: Option<u16>,
    },

    /// Print the prefix of the first instant of every month
    Calendar {
        /// First year included
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year included
        #[arg(long)]
        end_year: Option<i32>,
    },
}

fn parse_hex(src: &str) -> Result<u16, String> {
    uuid7_prefix::config::parse_hex_u16(src)
        .ok_or_else(|| format!("'{}' is not a 16-bit hexadecimal number", src))
}

fn main() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "uuid7_prefix=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    let mut buf = io::BufWriter::new(io::stdout());

    match cli.command {
        Command::Parse { uuid } => match DateInfo::parse(&uuid) {
            Ok(info) => {
                writeln!(buf, "Local: {}", info.local)?;
                writeln!(buf, "ISO:   {}", info.iso)?;
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected input");
                eprintln!("Error: {}", e.user_message());
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Generate { count, at, braced } => {
            let mut g = V7Generator::new(OsRandom);
            for _ in 0..count {
                let result = match at {
                    Some(ms) => g.generate_at(Timestamp::from_millis(ms)),
                    None => g.generate(),
                };
                match result {
                    Ok(uuid) if braced => writeln!(buf, "{}", uuid.to_braced_upper())?,
                    Ok(uuid) => writeln!(buf, "{}", uuid)?,
                    Err(e) => return fail(buf, &e),
                }
            }
        }
        Command::References { watch, interval } => {
            if let Some(secs) = interval {
                config.refresh_interval = std::time::Duration::from_secs(secs);
            }
            loop {
                match uuid7_prefix::build_references(Timestamp::now()) {
                    Ok(refs) => {
                        for e in &refs {
                            let marker = if e.is_now { ">" } else { " " };
                            writeln!(buf, "{} {}  {}", marker, e, e.uuid)?;
                        }
                    }
                    Err(e) => return fail(buf, &e),
                }
                if !watch {
                    break;
                }
                writeln!(buf)?;
                buf.flush()?;
                thread::sleep(config.refresh_interval);
            }
        }
        Command::Transitions { digits, start, end } => {
            if let Some(v) = start {
                config.scan.start = v;
            }
            if let Some(v) = end {
                config.scan.end = v;
            }
            let table = config.scan.scan();
            for (width, entries) in [(3, &table.three_digit), (4, &table.four_digit)] {
                if digits.is_some_and(|d| usize::from(d) != width) {
                    continue;
                }
                writeln!(buf, "{}-digit transitions", width)?;
                for e in entries {
                    let (head, tail) = e.full_prefix.split_at(width);
                    writeln!(
                        buf,
                        "  {:>11}  {}|{}  {}",
                        e.to_string(),
                        head,
                        tail,
                        e.timestamp.format_utc()
                    )?;
                }
            }
        }
        Command::Calendar {
            start_year,
            end_year,
        } => {
            if let Some(v) = start_year {
                config.calendar.start_year = v;
            }
            if let Some(v) = end_year {
                config.calendar.end_year = v;
            }
            let calendar = match config.calendar.build() {
                Ok(calendar) => calendar,
                Err(e) => return fail(buf, &e),
            };
            let len = min_unique_prefix_length(&calendar_prefixes(&calendar));
            writeln!(buf, "Unique prefix length: {}", len)?;
            for year in &calendar {
                writeln!(buf, "{}", year.year)?;
                for m in &year.months {
                    writeln!(
                        buf,
                        "  {:<9}  {:<12}  {}",
                        m.month_name,
                        m.prefix.truncate(len),
                        m.timestamp.format_in(&chrono::Local)
                    )?;
                }
            }
        }
    }

    buf.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn fail(mut buf: impl Write, e: &uuid7_prefix::Error) -> io::Result<ExitCode> {
    buf.flush()?;
    tracing::error!(error = %e, "command failed");
    eprintln!("Error: {}", e.user_message());
    Ok(ExitCode::FAILURE)
}
