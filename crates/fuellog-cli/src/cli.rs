//! CLI definition using clap

use clap::{Parser, Subcommand};
use fuellog_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fuel-log")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Personal fuel purchase log with economy and price tracking")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data directory override
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Fields shared by `add`, `scan` and `edit`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EntryArgs {
    /// Odometer reading
    #[arg(long)]
    pub odometer: Option<f64>,

    /// Volume purchased
    #[arg(long, alias = "volume")]
    pub gallons: Option<f64>,

    /// Price per unit of volume. Derived from the total if omitted.
    #[arg(long)]
    pub price: Option<f64>,

    /// Total cost
    #[arg(long)]
    pub total: Option<f64>,

    /// When the fill-up happened (e.g. "2024-03-01 08:30"). Defaults to now.
    #[arg(long)]
    pub date: Option<String>,

    /// Station name or other free text
    #[arg(long)]
    pub location: Option<String>,

    /// Latitude of the station
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the station
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a fill-up
    Add {
        #[command(flatten)]
        entry: EntryArgs,

        /// Skip the weather lookup
        #[arg(long)]
        no_weather: bool,
    },

    /// Read a pump display or odometer photo and record the fill-up
    Scan {
        /// Path to image file
        image: PathBuf,

        #[command(flatten)]
        entry: EntryArgs,

        /// Print what was read without saving
        #[arg(long)]
        dry_run: bool,

        /// Skip the weather lookup
        #[arg(long)]
        no_weather: bool,
    },

    /// Change fields of an existing record
    Edit {
        /// Record id
        id: String,

        #[command(flatten)]
        entry: EntryArgs,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: String,
    },

    /// Delete every record
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// List records, newest first
    List {
        /// Limit number of entries shown
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show summary statistics
    Stats,

    /// Show economy and price trends, oldest first
    Trend,

    /// Show where fill-ups happened
    Locations,

    /// Export records to CSV
    Export {
        /// Output CSV path. Writes to stdout if omitted.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Import records from CSV
    Import {
        /// Path to CSV file
        file: PathBuf,

        /// Replace existing records instead of appending
        #[arg(long)]
        replace: bool,

        /// Show what would be imported without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a value (KEY=VALUE), may be repeated
        #[arg(long, value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set vision API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Set vision model
        #[arg(long)]
        set_model: Option<String>,

        /// Enable/disable weather tagging
        #[arg(long)]
        set_weather: Option<bool>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
