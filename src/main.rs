use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fare_mileage::config::AppConfig;
use fare_mileage::data::ReferenceData;
use fare_mileage::error::AppError;
use fare_mileage::routing::{
    get_ems, CollectedDiagnostics, DiagnosticEvent, MileageInfo, TravelRoute,
};
use fare_mileage::telemetry;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "mileage-validator",
    about = "Validate fare component routings against published mileages, TPDs and PSRs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an itinerary JSON file and print the mileage outcome
    Validate(ValidateArgs),
    /// Print the excess mileage surcharge for a TPM/MPM pair
    Ems(EmsArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Itinerary JSON file
    #[arg(long)]
    itinerary: PathBuf,
    /// Override the configured reference data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the itinerary travel date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    travel_date: Option<NaiveDate>,
    /// Include the diagnostic events in the output
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Args, Debug)]
struct EmsArgs {
    /// Ticketed point mileage
    #[arg(long)]
    tpm: u16,
    /// Maximum permitted mileage
    #[arg(long)]
    mpm: u16,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    itinerary: String,
    mileage: MileageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<Vec<DiagnosticEvent>>,
}

#[derive(Debug, Serialize)]
struct SurchargeReport {
    tpm: u16,
    mpm: u16,
    surcharge: u16,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Validate(args) => {
            let report = run_validate(&config, args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Ems(args) => {
            let report = SurchargeReport {
                tpm: args.tpm,
                mpm: args.mpm,
                surcharge: get_ems(args.tpm, args.mpm),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn load_itinerary(path: &Path) -> Result<TravelRoute, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn run_validate(config: &AppConfig, args: ValidateArgs) -> Result<ValidationReport, AppError> {
    let ValidateArgs {
        itinerary,
        data_dir,
        travel_date,
        diagnostics,
    } = args;

    let data_dir = data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let reference = ReferenceData::from_dir(&data_dir)?;
    let validator = reference
        .validator()
        .with_max_permitted_surcharge(config.validation.max_permitted_surcharge);

    let mut route = load_itinerary(&itinerary)?;
    if let Some(date) = travel_date {
        route.travel_date = date;
    }

    let mut events = CollectedDiagnostics::default();
    let mileage = validator.validate_with_diagnostics(&route, &mut events)?;
    info!(
        itinerary = %itinerary.display(),
        valid = mileage.valid,
        environment = ?config.environment,
        "itinerary validated"
    );

    Ok(ValidationReport {
        itinerary: itinerary.display().to_string(),
        mileage,
        diagnostics: diagnostics.then(|| events.into_events()),
    })
}
