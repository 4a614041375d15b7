//! chatline diagnostics binary.
//!
//! Usage:
//!   chatline dump timeline.json
//!   chatline check timeline.json
//!   chatline show timeline.json 01929a3f
//!
//! Logs go to stderr; `RUST_LOG=debug` shows dropped and replaced items.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use chatline_cli::{Config, check, dump, load_timeline, show};

/// Inspect conversation timeline exports.
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "Validate and dump conversation timeline items")]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/chatline/config.ron)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not insert date headers
    #[arg(long, global = true)]
    no_date_headers: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every timeline entry in display order
    Dump {
        /// JSON timeline file
        file: PathBuf,
    },
    /// Validate records and report rejections
    Check {
        /// JSON timeline file
        file: PathBuf,
    },
    /// Print one item by descriptor hex prefix
    Show {
        /// JSON timeline file
        file: PathBuf,
        /// Descriptor hex prefix
        prefix: String,
    },
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref())?;
    if args.no_date_headers {
        config.timeline.date_headers = false;
    }

    match args.command {
        Command::Dump { file } => {
            let timeline = load_timeline(&file)?;
            println!("{}", dump(timeline, config.timeline));
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { file } => {
            let report = check(load_timeline(&file)?);
            print!("{report}");
            Ok(if report.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Show { file, prefix } => {
            println!("{}", show(load_timeline(&file)?, &prefix)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
