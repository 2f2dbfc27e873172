//! Command-line interface definitions.
//!
//! Defines the CLI structure using `clap`. Global flags select the
//! configuration file, output mode and broker overrides; subcommands pick
//! the operation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::paths;

/// Default broker selection for Circonus host registration
#[derive(Parser, Debug)]
#[command(name = "cosi-broker")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this broker for every check type
    #[arg(long, global = true, value_name = "ID")]
    pub broker: Option<String>,

    /// Broker type; "enterprise" only accepts enterprise brokers
    #[arg(long, global = true, value_name = "TYPE")]
    pub broker_type: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Apply the choice to terminal styling.
    pub fn apply(&self) {
        match self {
            ColorChoice::Auto => owo_colors::unset_override(),
            ColorChoice::Always => owo_colors::set_override(true),
            ColorChoice::Never => owo_colors::set_override(false),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Determine the default broker for check types
    Default(DefaultArgs),

    /// Show a broker and the check types it supports
    Show(ShowArgs),

    /// List brokers available to the API token
    List,
}

/// Arguments for the `default` subcommand.
#[derive(Parser, Debug)]
pub struct DefaultArgs {
    /// Check types to select a broker for.
    #[arg(value_name = "CHECK_TYPE", default_values = ["json", "httptrap"])]
    pub check_types: Vec<String>,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Broker id (see `cosi-broker list`).
    pub broker_id: String,
}
