mod cli; // Declare the cli module

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Roamd: realm credential store tooling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load every store file under the store directory and report validity
    Check {
        /// Store directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Print the providers persisted in the user store
    Show {
        /// Store directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Validate a provisioning profile document
    ValidateProfile {
        /// Path to the JSON profile
        file: PathBuf,
    },
    /// Load the store, run the scan-only mode once, persist and exit
    Run {
        /// Store directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();
    let result = match args.command {
        Commands::Check { dir } => cli::check(&dir),
        Commands::Show { dir } => cli::show(&dir),
        Commands::ValidateProfile { file } => cli::validate_profile(&file),
        Commands::Run { dir } => cli::run(&dir).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
