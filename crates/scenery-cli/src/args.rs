//! Command-line argument definitions for the Scenery CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the project to analyze, where declared
//! types and configuration come from, where documents are written, and the
//! logging verbosity.

use clap::Parser;

/// Command-line arguments for the Scenery diagram generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the project directory
    #[arg(default_value = ".", help = "Path to the project directory")]
    pub project: String,

    /// Declaration manifest (TOML). Defaults to `<project>/scenery.toml`
    #[arg(short, long)]
    pub declarations: Option<String>,

    /// Directory receiving the generated documents. Defaults to the project directory
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
