//! Decision-ready battle data and collaborator contracts.
//!
//! `battle-core` defines the snapshot an allied agent decides from
//! ([`Situation`]), the vocabulary of proposed actions ([`ActionCandidate`],
//! [`MoveDecision`]) and the traits through which the decision pipeline talks
//! to the rest of the game (situation analysis, ability classification,
//! scoring, positional search). Nothing here mutates the world; supporting
//! crates depend on the types re-exported below.
pub mod config;
pub mod decision;
pub mod env;
pub mod error;
pub mod state;

pub use config::{DecisionConfig, PhaseThresholds};
pub use decision::{
    AbilityCategory, ActionCandidate, CandidateKind, Classification, CombatPhase, MoveDecision,
    SaveKind, ScoredPosition,
};
pub use env::{
    AbilityClassifier, CandidateScorer, Clock, DecisionEnv, FocusTarget, ManualClock,
    OracleError, PositionSearch, SituationAnalyzer, SystemClock, TacticalGrid, TurnController,
};
pub use error::{BattleError, ErrorSeverity};
pub use state::{
    AbilityId, AbilitySnapshot, ActionEconomy, AgentId, AgentRole, AgentSnapshot, HitPoints,
    Position, Situation, SituationBuilder, SituationFlags, TargetFlags, TurnState,
};
