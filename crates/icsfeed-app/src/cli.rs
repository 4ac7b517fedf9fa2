//! Command line flags.

use std::path::PathBuf;

use clap::Parser;
use icsfeed_core::config::ConfigOverrides;

/// Generates one iCalendar feed per event category and publishes the
/// resulting directory over HTTP.
#[derive(Debug, Parser)]
#[command(name = "icsfeed", version)]
pub struct Cli {
    /// Template file name
    #[arg(short = 't', long = "template", value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Destination folder
    #[arg(short = 'd', long = "destination", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Configuration file; `config.toml` in the working directory is read
    /// when present
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            template: self.template.clone(),
            destination: self.destination.clone(),
        }
    }
}
