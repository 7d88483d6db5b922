//! Defines the command-line arguments for the `tested` demonstration runner.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};

use crate::case::Ordinal;
use crate::report::ReporterConfig;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tested",
    version,
    about = "Run the registered test groups and print a summary."
)]
pub struct TestedArgs {
    /// Only run the group with this exact name.
    #[arg(short, long)]
    pub group: Option<String>,

    /// Only run the case announcing this exact name (requires --group).
    #[arg(short, long, requires = "group", conflicts_with = "ordinal")]
    pub case: Option<String>,

    /// Only run the case declared at this slot (requires --group).
    #[arg(short, long, requires = "group")]
    pub ordinal: Option<Ordinal>,

    /// List the selected cases instead of running them.
    #[arg(short, long)]
    pub list: bool,

    /// When to color the progress output.
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
    pub color: ColorWhen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl TestedArgs {
    pub fn reporter_config(&self) -> ReporterConfig {
        match self.color {
            ColorWhen::Auto => ReporterConfig::default(),
            ColorWhen::Always => ReporterConfig { use_colors: true },
            ColorWhen::Never => ReporterConfig { use_colors: false },
        }
    }
}
