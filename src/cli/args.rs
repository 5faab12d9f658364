//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fiterior - restyle a room photo with an AI theme
#[derive(Parser, Debug)]
#[command(name = "fiterior")]
#[command(about = "Submit interior restyling jobs and follow their progress")]
#[command(long_about = r#"
fiterior sends a room photo to a transform backend together with a style theme
and an AI model, shows progress while the job runs and prints a before/after
summary when it completes. When the backend cannot be reached the original
photo is returned as the result so the flow always finishes.

EXAMPLES:
  # Restyle a photo in the Nordic theme with GPT-4o
  fiterior transform --image file://living-room.jpg --theme nordic --model gpt-4o

  # Machine-readable result, retry twice on failure
  fiterior transform --image file://kitchen.jpg --theme industrial --model claude --retries 2 --json

  # Browse the catalogs
  fiterior themes
  fiterior models --json

  # Show the effective configuration and where each value came from
  fiterior config

CONFIGURATION:
  Precedence: CLI flags > FITERIOR_ENDPOINT > config file > defaults
  The config file is .fiterior/config.toml, discovered upward from the current
  directory. Use --config to point at a file explicitly.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Transform endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Hard timeout for the transform request in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a photo for restyling and wait for the result
    ///
    /// Progress steps are printed as they become active. Theme and model fall
    /// back to `[defaults]` in the config file when not given.
    ///
    /// EXAMPLES:
    ///   fiterior transform --image file://room.jpg --theme modern --model gpt-4o
    ///   fiterior transform --image https://cdn.example.com/room.png --retries 1
    Transform {
        /// Locator of the source photo (file:// or http(s) URL)
        #[arg(long)]
        image: String,

        /// Style theme id (see `fiterior themes`)
        #[arg(long)]
        theme: Option<String>,

        /// AI model id (see `fiterior models`)
        #[arg(long)]
        model: Option<String>,

        /// How many times to retry after a failed attempt
        #[arg(long, default_value_t = 0)]
        retries: u32,

        /// Print the result as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// List the available style themes
    Themes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available AI models
    Models {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the progress steps and their pacing
    Steps {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration with value sources
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Short name used in error reports
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transform { .. } => "transform",
            Self::Themes { .. } => "themes",
            Self::Models { .. } => "models",
            Self::Steps { .. } => "steps",
            Self::Config { .. } => "config",
        }
    }
}

/// Build the clap command (for completions and argument tests)
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
