//! Command implementations.
//!
//! Each command owns its CLI args and execution logic.

mod config;
mod decide;

pub use config::ShowConfig;
pub use decide::Decide;

use std::path::Path;

use anyhow::{Context, Result};
use battle_ai::ConfigLoader;
use battle_core::DecisionConfig;

/// Config from `path` (or defaults), then `BATTLE_AI_*` overrides.
fn load_config(path: Option<&Path>) -> Result<DecisionConfig> {
    let base = match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DecisionConfig::default(),
    };
    Ok(ConfigLoader::apply_env(base))
}
