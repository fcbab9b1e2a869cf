//! Collaborator access errors.

use crate::error::{BattleError, ErrorSeverity};
use crate::state::AgentId;

/// Errors raised when a collaborator is missing or reports a failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("SituationAnalyzer not available")]
    AnalyzerNotAvailable,

    #[error("AbilityClassifier not available")]
    ClassifierNotAvailable,

    #[error("CandidateScorer not available")]
    ScorerNotAvailable,

    #[error("PositionSearch not available")]
    PositionsNotAvailable,

    #[error("TacticalGrid not available")]
    GridNotAvailable,

    #[error("TurnController not available")]
    TurnsNotAvailable,

    /// The analyzer does not know the agent.
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("situation analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("candidate scoring failed: {0}")]
    ScoringFailed(String),
}

impl BattleError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Missing collaborators are wiring mistakes
            AnalyzerNotAvailable | ClassifierNotAvailable | ScorerNotAvailable
            | PositionsNotAvailable | GridNotAvailable | TurnsNotAvailable => ErrorSeverity::Fatal,

            AgentNotFound(_) => ErrorSeverity::Validation,

            // Collaborator failures may clear up by the next tick
            AnalysisFailed(_) | ScoringFailed(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            AnalyzerNotAvailable => "ORACLE_ANALYZER_NOT_AVAILABLE",
            ClassifierNotAvailable => "ORACLE_CLASSIFIER_NOT_AVAILABLE",
            ScorerNotAvailable => "ORACLE_SCORER_NOT_AVAILABLE",
            PositionsNotAvailable => "ORACLE_POSITIONS_NOT_AVAILABLE",
            GridNotAvailable => "ORACLE_GRID_NOT_AVAILABLE",
            TurnsNotAvailable => "ORACLE_TURNS_NOT_AVAILABLE",
            AgentNotFound(_) => "ORACLE_AGENT_NOT_FOUND",
            AnalysisFailed(_) => "ORACLE_ANALYSIS_FAILED",
            ScoringFailed(_) => "ORACLE_SCORING_FAILED",
        }
    }
}
