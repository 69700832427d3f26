//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls result and error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

#[derive(Parser, Debug)]
#[command(name = "sorter", version, about = "Resistor sorter CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/sorter_config.toml")]
    pub config: PathBuf,

    /// Optional cup table CSV (strict header `min,max`); replaces the config's cups
    #[arg(long, value_name = "FILE")]
    pub cups: Option<PathBuf>,

    /// Print results and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides `[logging] level`
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SeriesArg {
    E12,
    E24,
    E96,
}

impl From<SeriesArg> for sorter_core::ResistorSeries {
    fn from(s: SeriesArg) -> Self {
        match s {
            SeriesArg::E12 => sorter_core::ResistorSeries::E12,
            SeriesArg::E24 => sorter_core::ResistorSeries::E24,
            SeriesArg::E96 => sorter_core::ResistorSeries::E96,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify measured values and turn the wheel to each accepting cup
    Sort {
        /// Measured resistance in ohms (repeatable)
        #[arg(long = "value", value_name = "OHMS", required = true, num_args = 1..)]
        values: Vec<f64>,
    },
    /// Turn the wheel to the given cups in order
    Wheel {
        /// Target cup, 1-based (repeatable)
        #[arg(long = "to", value_name = "CUP", required = true, num_args = 1..)]
        targets: Vec<u32>,
    },
    /// Run feeder cycles: load when the input platform is free, advance, dispense
    Feed {
        /// Number of cycles to run
        #[arg(long, value_name = "N")]
        cycles: u32,
        /// Platforms to advance per cycle (1..=4)
        #[arg(long, value_name = "K", default_value_t = 1)]
        count: u32,
    },
    /// Nearest preferred value of a series
    Nearest {
        /// Value in ohms
        #[arg(long, value_name = "OHMS")]
        value: f64,
        /// Preferred-number series
        #[arg(long, value_enum, default_value = "e24")]
        series: SeriesArg,
    },
    /// Assemble the machine from the config and report it (no bus traffic)
    SelfCheck,
}
