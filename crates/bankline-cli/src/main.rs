//! Bankline CLI - entry point for the track editor

mod commands;

use anyhow::{Context, Result};
use bankline_viewer::EditorConfig;
use clap::{Parser, Subcommand};
use commands::{config, edit, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bankline")]
#[command(about = "Interactive editor for closed-loop 3D track splines", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of .bankline/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the editor (the default when no command is given)
    Edit {
        /// Track file to edit; created on first save if missing
        track: Option<PathBuf>,
    },

    /// Print point count and segment lengths of a track file
    Info {
        /// Track file to inspect
        track: PathBuf,
    },

    /// Print the resolved editor configuration
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let load_config = || {
        EditorConfig::load(cli.config.as_deref()).context("Failed to load editor config")
    };

    match cli.command.unwrap_or(Commands::Edit { track: None }) {
        Commands::Edit { track } => edit::run(edit::EditArgs {
            track,
            config: load_config()?,
        }),
        Commands::Info { track } => info::run(&track),
        Commands::Config => config::run(&load_config()?),
    }
}
