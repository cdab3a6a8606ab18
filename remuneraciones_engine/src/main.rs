//! Entry point for the Remuneraciones Engine binary.
//!
//! The binary reads payslip or payroll-run definitions from JSON files
//! and prints the computed results as JSON on stdout, or writes a
//! Previred CSV export.  A parameter file may be given with
//! `--parameters` or through the `REMUNERACIONES_PARAMETERS`
//! environment variable; anything it leaves out uses the built-in
//! defaults.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use remuneraciones_engine::config::AppConfig;
use remuneraciones_engine::params::load_parameter_file;
use remuneraciones_engine::previred::{records_for_run, write_previred_csv};
use remuneraciones_engine::{
    compute_payslip, run_payroll, telemetry, ParameterOverrides, PayrollRunInput, PayslipRequest,
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "remuneraciones",
    about = "Compute Chilean payslips and Previred exports from JSON input",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one payslip
    Payslip(PayslipArgs),
    /// Compute a payroll run for many workers
    Payroll(PayrollArgs),
    /// Print the resolved parameter table
    Parameters(ParameterArgs),
}

#[derive(Args, Debug)]
struct ParameterArgs {
    /// JSON parameter overrides; falls back to REMUNERACIONES_PARAMETERS
    #[arg(long)]
    parameters: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PayslipArgs {
    /// JSON file with `trabajador` and optional `ajustes`
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    params: ParameterArgs,
}

#[derive(Args, Debug)]
struct PayrollArgs {
    /// JSON file with `periodo` and `trabajadores`
    #[arg(long)]
    input: PathBuf,
    /// Write a Previred CSV here instead of printing JSON
    #[arg(long)]
    previred: Option<PathBuf>,
    #[command(flatten)]
    params: ParameterArgs,
}

fn main() -> Result<()> {
    let config = AppConfig::load();
    telemetry::init(&config.telemetry)?;
    let cli = Cli::parse();

    match cli.command {
        Command::Payslip(args) => {
            let overrides = load_overrides(&args.params, &config)?;
            let request: PayslipRequest = read_json(&args.input)?;
            let payslip = compute_payslip(&request.trabajador, &request.ajustes, &overrides)
                .with_context(|| format!("rejected input in {}", args.input.display()))?;
            print_json(&payslip)
        }
        Command::Payroll(args) => {
            let overrides = load_overrides(&args.params, &config)?;
            let input: PayrollRunInput = read_json(&args.input)?;
            let run = run_payroll(input, &overrides)?;
            match args.previred {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    write_previred_csv(BufWriter::new(file), &records_for_run(&run))?;
                    tracing::info!(path = %path.display(), "previred export written");
                    Ok(())
                }
                None => print_json(&run),
            }
        }
        Command::Parameters(args) => print_json(&load_overrides(&args, &config)?.resolve()),
    }
}

fn load_overrides(args: &ParameterArgs, config: &AppConfig) -> Result<ParameterOverrides> {
    match args.parameters.as_ref().or(config.parameters_file.as_ref()) {
        Some(path) => Ok(load_parameter_file(path)?),
        None => Ok(ParameterOverrides::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
