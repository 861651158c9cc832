//! schedule-check — load snapshot files and report whether each one
//! decodes into a consistent schedule.
//!
//! Each file is loaded into a fresh session. Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use schedule_runtime::config::SessionConfig;
use schedule_runtime::session::Session;

#[derive(Parser)]
#[command(name = "schedule-check")]
#[command(about = "Load schedule snapshot files and verify their consistency")]
struct Cli {
    /// JSON session config; snapshot paths resolve against its data_dir
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot files to load
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match SessionConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::from(2);
            }
        },
        None => SessionConfig::with_data_dir(""),
    };

    let mut total = 0;
    let mut passed = 0;

    for file in &cli.files {
        total += 1;
        let mut session = Session::new(config.clone());
        match session.load(file) {
            Ok(report) => {
                passed += 1;
                println!(
                    "[PASS] {}: people={}, rooms={}, meetings={}, commitments={}, hash={}",
                    file.display(),
                    report.stats.people,
                    report.stats.rooms,
                    report.stats.meetings,
                    report.stats.commitments,
                    report.hash
                );
            }
            Err(err) => {
                println!("[FAIL] {}: {}", file.display(), err);
            }
        }
    }

    println!();
    println!("Results: {}/{} passed", passed, total);

    if passed == total {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
