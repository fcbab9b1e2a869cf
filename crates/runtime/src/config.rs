//! Loaders for [`DecisionConfig`].
//!
//! Two sources are supported:
//! - Environment variables prefixed with [`ConfigLoader::ENV_PREFIX`], applied
//!   on top of the defaults (or of a file-loaded config)
//! - RON files holding a partial `DecisionConfig`; missing fields keep their
//!   defaults
//!
//! Scoring weights live in their own RON file, a partial
//! [`PhaseWeightTable`] handed to the engine's default scorer.
use std::env;
use std::path::Path;
use std::str::FromStr;

use battle_core::DecisionConfig;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::ConfigError;
use crate::providers::ai::scoring::PhaseWeightTable;

/// Builds [`DecisionConfig`] values from the environment or files.
pub struct ConfigLoader;

impl ConfigLoader {
    pub const ENV_PREFIX: &'static str = "BATTLE_AI_";

    /// Defaults overridden by process environment variables.
    ///
    /// Environment variables (all optional, prefixed with `BATTLE_AI_`):
    /// - `ROUND_DURATION_SECS`, `PENDING_TTL_SECS`, `PENDING_SWEEP_INTERVAL_SECS`
    /// - `BASIC_ATTACK_TOLERANCE`, `MOVE_DEDUP_TOLERANCE`, `MIN_MOVE_DISTANCE`
    /// - `MELEE_STEP_DISTANCE`, `POST_ACTION_RETREAT_GAIN`
    /// - `DEBUFF_THRESHOLD`, `ALLY_HEAL_THRESHOLD`, `TOP_CANDIDATES_LOGGED`
    /// - `DESPERATE_HP`, `OPENING_MAX_ROUND`
    pub fn from_env() -> DecisionConfig {
        Self::apply_env(DecisionConfig::default())
    }

    /// Applies process environment overrides to `config`.
    pub fn apply_env(config: DecisionConfig) -> DecisionConfig {
        Self::apply_overrides(config, |key| env::var(key).ok())
    }

    /// Applies overrides read through `lookup`, keyed by full variable name.
    ///
    /// Unparseable, negative or non-finite values are logged and ignored.
    pub fn apply_overrides<F>(mut config: DecisionConfig, lookup: F) -> DecisionConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = read_amount(&lookup, "ROUND_DURATION_SECS") {
            config.round_duration_secs = value;
        }
        if let Some(value) = read_amount(&lookup, "PENDING_TTL_SECS") {
            config.pending_ttl_secs = value;
        }
        if let Some(value) = read_amount(&lookup, "PENDING_SWEEP_INTERVAL_SECS") {
            config.pending_sweep_interval_secs = value;
        }
        if let Some(value) = read_amount(&lookup, "BASIC_ATTACK_TOLERANCE") {
            config.basic_attack_tolerance = value;
        }
        if let Some(value) = read_amount(&lookup, "MOVE_DEDUP_TOLERANCE") {
            config.move_dedup_tolerance = value;
        }
        if let Some(value) = read_amount(&lookup, "MIN_MOVE_DISTANCE") {
            config.min_move_distance = value;
        }
        if let Some(value) = read_amount(&lookup, "MELEE_STEP_DISTANCE") {
            config.melee_step_distance = value;
        }
        if let Some(value) = read_amount(&lookup, "POST_ACTION_RETREAT_GAIN") {
            config.post_action_retreat_gain = value;
        }
        if let Some(value) = read_amount(&lookup, "DEBUFF_THRESHOLD") {
            config.debuff_threshold = value;
        }
        if let Some(value) = read_amount(&lookup, "ALLY_HEAL_THRESHOLD") {
            config.ally_heal_threshold = value;
        }
        if let Some(value) = read_var::<usize, _>(&lookup, "TOP_CANDIDATES_LOGGED") {
            config.top_candidates_logged = value;
        }
        if let Some(value) = read_amount(&lookup, "DESPERATE_HP") {
            config.phase.desperate_hp = value;
        }
        if let Some(value) = read_var::<u32, _>(&lookup, "OPENING_MAX_ROUND") {
            config.phase.opening_max_round = value;
        }

        config
    }

    /// Loads a RON config file.
    pub fn load_from_file(path: &Path) -> Result<DecisionConfig, ConfigError> {
        let config = read_ron(path)?;
        debug!("Loaded decision config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(content: &str) -> Result<DecisionConfig, ConfigError> {
        parse_ron(content)
    }

    /// Loads a RON weights file; phases it omits keep their default weights.
    pub fn load_weights_from_file(path: &Path) -> Result<PhaseWeightTable, ConfigError> {
        let weights = read_ron(path)?;
        debug!("Loaded phase weights from {}", path.display());
        Ok(weights)
    }

    pub fn weights_from_ron_str(content: &str) -> Result<PhaseWeightTable, ConfigError> {
        parse_ron(content)
    }
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ron(&content)
}

fn parse_ron<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn read_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{}{}", ConfigLoader::ENV_PREFIX, name);
    let raw = lookup(&key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

/// Finite, non-negative `f32` override.
fn read_amount<F>(lookup: &F, name: &str) -> Option<f32>
where
    F: Fn(&str) -> Option<String>,
{
    let value = read_var::<f32, _>(lookup, name)?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        warn!(
            "Ignoring {}{}={}: must be finite and non-negative",
            ConfigLoader::ENV_PREFIX,
            name,
            value
        );
        None
    }
}
