//! taskline CLI - task timeline layout and tracking
//!
//! Command-line interface for computing timelines and managing the task and
//! user files.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{TaskAction, TimelineArgs, UserAction};
use config::Config;

#[derive(Parser)]
#[command(name = "taskline")]
#[command(author, version, about = "Task timeline layout and tracking", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./taskline.toml when present)
    #[arg(long, global = true, env = "TASKLINE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding taskData.json and user.json
    #[arg(long, global = true, env = "TASKLINE_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a timeline for a date window
    Timeline(TimelineArgs),

    /// Manage stored task records
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage the role-bucketed user directory
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let data_dir = config.data_dir(cli.data_dir);

    match cli.command {
        Commands::Timeline(args) => commands::timeline(&args, &config, &data_dir),
        Commands::Tasks { action } => commands::tasks(action, &data_dir),
        Commands::Users { action } => commands::users(action, &data_dir),
    }
}
