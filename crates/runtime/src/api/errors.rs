//! Error types surfaced by the decision pipeline.
//!
//! Pipeline stages return [`DecisionError`]; the engine's public `decide_*`
//! entry points turn any of them into an end-turn fallback instead of
//! propagating, so these mostly show up in logs and in the `try_*` variants.
use std::path::PathBuf;

use battle_core::{AgentId, BattleError, ErrorSeverity, OracleError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecisionError>;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("no situation available for agent {0}")]
    MissingSituation(AgentId),

    #[error("invalid situation: {0}")]
    InvalidSituation(&'static str),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("no candidate could be selected")]
    NoCandidates,
}

impl BattleError for DecisionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DecisionError::MissingSituation(_) => ErrorSeverity::Recoverable,
            DecisionError::InvalidSituation(_) => ErrorSeverity::Validation,
            DecisionError::Oracle(err) => err.severity(),
            DecisionError::NoCandidates => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DecisionError::MissingSituation(_) => "DECISION_MISSING_SITUATION",
            DecisionError::InvalidSituation(_) => "DECISION_INVALID_SITUATION",
            DecisionError::Oracle(err) => err.error_code(),
            DecisionError::NoCandidates => "DECISION_NO_CANDIDATES",
        }
    }
}

/// Failures while loading configuration or scenario files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse RON: {0}")]
    Parse(String),
}
