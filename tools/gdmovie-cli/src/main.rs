//! gdmovie CLI — Render Godot projects to video with the movie writer.
//!
//! Usage:
//!   gdmovie export <PROJECT> -o <OUTPUT>   Render a project to a movie file
//!   gdmovie formats                        List movie writer output formats
//!   gdmovie presets                        List configured export presets
//!   gdmovie check                          Check the engine installation

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gdmovie_common::config::{config_file_path, AppConfig};
use gdmovie_export::{EngineVersion, Resolution, Verbosity};

mod commands;

#[derive(Parser)]
#[command(
    name = "gdmovie",
    about = "Render Godot projects to video files",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/gdmovie/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a project to a movie file
    Export {
        /// Project directory (or its project.godot)
        project: PathBuf,

        /// Output movie file; the extension selects the writer
        #[arg(short, long)]
        output: PathBuf,

        /// Fixed frame rate (0 = engine pacing)
        #[arg(long)]
        fps: Option<u32>,

        /// Forced resolution, e.g. 1920x1080 (0x0 = none)
        #[arg(long)]
        resolution: Option<Resolution>,

        /// Engine logging: -1 quiet, 0 unset, 1 print fps, 2 verbose
        #[arg(long, allow_negative_numbers = true)]
        verbosity: Option<Verbosity>,

        /// Keep the engine console open after it exits
        #[arg(long, overrides_with = "no_keep_open")]
        keep_open: bool,

        /// Close the engine console on exit, even if the preset keeps it open
        #[arg(long, overrides_with = "keep_open")]
        no_keep_open: bool,

        /// Start from a named preset in the config file
        #[arg(long)]
        preset: Option<String>,

        /// Engine executable
        #[arg(long)]
        godot: Option<PathBuf>,

        /// Additional engine arguments, passed through unfiltered
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// List movie writer output formats
    Formats {
        /// Engine version to list formats for, e.g. 4.5 (asked from the engine if omitted)
        #[arg(long)]
        engine_version: Option<EngineVersion>,

        /// Engine executable
        #[arg(long)]
        godot: Option<PathBuf>,
    },

    /// List configured export presets
    Presets,

    /// Check the engine installation
    Check {
        /// Engine executable
        #[arg(long)]
        godot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let (config, config_error) = match AppConfig::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging before reporting config problems
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    gdmovie_common::logging::init_logging(&logging);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Falling back to default configuration");
    }

    match cli.command {
        Commands::Export {
            project,
            output,
            fps,
            resolution,
            verbosity,
            keep_open,
            no_keep_open,
            preset,
            godot,
            extra,
        } => {
            let keep_open = match (keep_open, no_keep_open) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let options = commands::export::ExportOptions {
                project,
                output,
                fps,
                resolution,
                verbosity,
                keep_open,
                preset,
                extra,
            };
            let code = commands::export::run(&config, options, godot).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Formats {
            engine_version,
            godot,
        } => commands::formats::run(&config, engine_version, godot).await,
        Commands::Presets => commands::presets::run(&config),
        Commands::Check { godot } => commands::check::run(&config, godot).await,
    }
}
