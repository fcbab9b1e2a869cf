//! Utility-based decision core for allied combat agents.
//!
//! For each agent and decision point the engine classifies the fight into a
//! [`CombatPhase`](battle_core::CombatPhase), generates every candidate action
//! (attacks, buffs, heals, debuffs, moves, end-turn), has a scorer rank them
//! under that phase's weights, and returns the best one.
//!
//! Modules are organized by responsibility:
//! - [`providers::ai`] hosts the pipeline: phase detection, the shared
//!   pending-action registry, movement planning, candidate generation and
//!   the [`UnifiedDecisionEngine`] orchestrator
//! - [`api`] exposes the error types callers interact with
//! - [`config`] loads tunables from the environment or RON files
//! - [`scenario`] replays recorded battle snapshots through fixture collaborators
pub mod api;
pub mod config;
pub mod providers;
pub mod scenario;

pub use api::{ConfigError, DecisionError, Result};
pub use config::ConfigLoader;
pub use providers::ai::{
    CandidateGenerator, CombatPhaseDetector, DecisionContext, Evaluation, MovementPlanner,
    PendingActionTracker, PendingEntry, PhaseWeightedScorer, RoundEstimator,
    UnifiedDecisionEngine,
};
pub use providers::ai::scoring::{PhaseWeightTable, PhaseWeights};
pub use scenario::Scenario;
