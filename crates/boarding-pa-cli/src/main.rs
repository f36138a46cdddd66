// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{anyhow, Result};
use boarding_pa_core::logging::init_file_logger;
use boarding_pa_core::settings::default_root;
use boarding_pa_core::{AppPaths, FlightDataService, GreetingClock, Settings};
use clap::Parser;
use log::{error, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SimBrief username (falls back to SIMBRIEF_USER)
    #[arg(env = "SIMBRIEF_USER")]
    username: Option<String>,

    /// Folder holding data/, config/ and logs/
    #[arg(short, long, env = "BOARDING_PA_ROOT")]
    root: Option<PathBuf>,

    /// Local clock used to pick the greeting (origin or destination)
    #[arg(long)]
    greeting_clock: Option<GreetingClock>,

    /// Print nothing; diagnostics go to the log file only
    #[arg(short, long)]
    silent: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed — error={:#}", e);
            if !cli.silent {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Logger first so key-file problems end up in the log
    let paths = AppPaths::new(cli.root.clone().unwrap_or_else(default_root));

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_path = init_file_logger(&paths.log_dir(), level)?;

    let mut settings = Settings::load(Some(paths.root().to_path_buf()));
    settings.log_summary();

    if let Some(clock) = cli.greeting_clock {
        settings.greeting_clock = clock;
    }

    let username = cli
        .username
        .clone()
        .filter(|u| !u.trim().is_empty())
        .or_else(|| settings.simbrief_user())
        .ok_or_else(|| {
            anyhow!("SimBrief username required: pass it as an argument or set SIMBRIEF_USER")
        })?;

    let service = FlightDataService::from_settings(&settings);
    let data = service.fetch_flight_data(&username)?;

    if !cli.silent {
        let hours = data.duration_seconds / 3600;
        let minutes = (data.duration_seconds % 3600) / 60;
        println!(
            "{} ({}) flight {} → {} ({}), {}h{:02}m",
            data.airline_name, data.icao, data.flight_number, data.dest_city, data.dest_icao, hours, minutes
        );
        println!("Flight number: {}", data.flight_number_text);
        println!("Duration:      {}", data.duration_text);
        println!("Greeting:      {}", data.greeting);
        println!("Saved to {}", service.json_path().display());
        println!("Log: {}", log_path.display());
    }

    Ok(())
}
