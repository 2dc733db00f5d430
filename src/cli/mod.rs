//! CLI Module
//!
//! Command-line interface over the gain-staging library.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gainstage - levels, gains, noise floors and clip points across a signal chain
#[derive(Parser, Debug)]
#[command(name = "gainstage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a level and show it in SI units and dB
    #[command(name = "level")]
    Level {
        /// Measurement, e.g. "-10 dBV" or "94 dB SPL"
        text: String,

        /// dB reference to report against (SPL, Pa, V, u, FS)
        #[arg(short, long)]
        reference: Option<String>,
    },

    /// Parse a gain written as OUT/IN
    #[command(name = "gain")]
    Gain {
        /// Gain, e.g. "40mV/Pa" or "-18dB(FS/u)"
        text: String,
    },

    /// Report noise floor, clip ceiling and dynamic range of a chain file
    #[command(name = "chain")]
    Chain {
        /// Path to the JSON chain description
        path: PathBuf,

        /// Only report this zone
        #[arg(short, long)]
        zone: Option<i32>,
    },
}
