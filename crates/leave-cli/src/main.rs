//! `leave` CLI: check holiday entitlement and book leave from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List the public holidays of a year
//! leave holidays 2024
//!
//! # Show how much allowance a person has left
//! leave --store bookings.csv remaining --name alice --year 2024
//!
//! # Book a range (dd/mm/yyyy or yyyy-mm-dd)
//! leave --store bookings.csv book --name alice --start 01/07/2024 --end 05/07/2024
//!
//! # List a person's bookings
//! leave --store bookings.csv bookings --name alice
//!
//! # Use a 25 day allowance where public holidays are always free
//! leave --entitlement 25 --policy excluded remaining --name alice --year 2024
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use leave_engine::booking::{format_civil_date, parse_civil_date};
use leave_engine::{
    holidays_for_year, BookingRequest, CsvBookingStore, DataFormatError, Decision, EngineConfig,
    HolidayPolicy, LeaveService, PersonId,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "leave",
    version,
    about = "Holiday entitlement and booking CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Booking file (CSV with Name, Start Date, End Date, Year columns)
    #[arg(long, env = "LEAVE_STORE", default_value = "bookings.csv", global = true)]
    store: PathBuf,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Annual allowance in days (overrides the configuration file)
    #[arg(long, global = true)]
    entitlement: Option<u32>,

    /// Public holiday policy: count-against, excluded or reserved
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the public holidays of a year
    Holidays {
        year: i32,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show remaining allowance for a person
    Remaining {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        year: i32,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate a date range and book it if the allowance allows
    Book {
        #[arg(short, long)]
        name: String,
        /// First day of leave (dd/mm/yyyy or yyyy-mm-dd)
        #[arg(short, long, value_parser = parse_date_arg)]
        start: NaiveDate,
        /// Last day of leave, inclusive (dd/mm/yyyy or yyyy-mm-dd)
        #[arg(short, long, value_parser = parse_date_arg)]
        end: NaiveDate,
    },
    /// List a person's bookings
    Bookings {
        #[arg(short, long)]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    debug!(?config, store = %cli.store.display(), "resolved configuration");

    match cli.command {
        Commands::Holidays { year, json } => {
            let holidays = holidays_for_year(year)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&holidays)?);
            } else {
                for holiday in &holidays {
                    println!("{}  {}", holiday.date.format("%d %B, %Y"), holiday.label);
                }
            }
        }
        Commands::Remaining { name, year, json } => {
            let person = PersonId::new(&name)?;
            let service = LeaveService::new(CsvBookingStore::new(&cli.store), config);
            let report = service
                .check(&person, year)
                .with_context(|| format!("Failed to read bookings from {}", cli.store.display()))?;
            print_issues(&report.issues);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.state.is_overdrawn() {
                println!("No holidays remaining.");
            } else {
                println!(
                    "{} has {} holiday days left in {}. {} public holidays remaining.",
                    person, report.state.remaining_days, year, report.state.remaining_holiday_count
                );
                println!("Days booked: {}", report.state.days_taken());
            }
        }
        Commands::Book { name, start, end } => {
            let person = PersonId::new(&name)?;
            let service = LeaveService::new(CsvBookingStore::new(&cli.store), config);
            let request = BookingRequest::new(person, start, end);
            let outcome = service
                .book(&request)
                .with_context(|| format!("Failed to book leave in {}", cli.store.display()))?;
            print_issues(&outcome.issues);

            match outcome.decision {
                Decision::Accepted(approval) => {
                    println!(
                        "Holiday booked successfully! {} to {} ({} new day(s), {} remaining).",
                        format_civil_date(start),
                        format_civil_date(end),
                        approval.new_days,
                        approval.remaining_after
                    );
                }
                Decision::Rejected(rejection) => {
                    eprintln!("Booking rejected: {}", rejection);
                    process::exit(1);
                }
            }
        }
        Commands::Bookings { name } => {
            let person = PersonId::new(&name)?;
            let service = LeaveService::new(CsvBookingStore::new(&cli.store), config);
            let listing = service
                .bookings_for(&person)
                .with_context(|| format!("Failed to read bookings from {}", cli.store.display()))?;
            print_issues(&listing.issues);

            if listing.bookings.is_empty() {
                println!("No bookings found for {}.", person);
            }
            for booking in &listing.bookings {
                println!(
                    "{} - {} ({} day(s))",
                    format_civil_date(booking.start_date()),
                    format_civil_date(booking.end_date()),
                    booking.day_count()
                );
            }
        }
    }

    Ok(())
}

/// Assemble the engine configuration: defaults, then the --config file, then
/// the --entitlement and --policy overrides.
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(days) = cli.entitlement {
        config.annual_entitlement = days;
    }
    if let Some(policy) = &cli.policy {
        config.holiday_policy = policy.parse::<HolidayPolicy>()?;
    }

    Ok(config)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Accept `dd/mm/yyyy` (the booking file format) or ISO `yyyy-mm-dd`.
fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_civil_date(s)
        .or_else(|| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| format!("'{}' is not a date (expected dd/mm/yyyy or yyyy-mm-dd)", s))
}

fn print_issues(issues: &[DataFormatError]) {
    for issue in issues {
        eprintln!("warning: skipped booking row. {}", issue);
    }
}
