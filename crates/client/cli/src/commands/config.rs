//! Print the effective decision config.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Print the config a decision would run with
#[derive(Parser)]
pub struct ShowConfig {
    /// Config file (RON) to start from instead of the defaults
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

impl ShowConfig {
    pub fn execute(self) -> Result<()> {
        let config = super::load_config(self.config.as_deref())?;
        let pretty = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default())
            .context("Failed to serialize config to RON")?;
        println!("{}", pretty);
        Ok(())
    }
}
