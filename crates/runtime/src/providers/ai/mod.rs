//! Utility-based decision pipeline for allied agents.
//!
//! One decision flows one way: snapshot in, single chosen action out.
//!
//! 1. **Phase Detection**: Classify the fight as Opening, Midgame, Cleanup or
//!    Desperate ([`CombatPhaseDetector`])
//! 2. **Candidate Generation**: Propose every concrete action the agent could
//!    take right now ([`CandidateGenerator`]), consulting the shared
//!    [`PendingActionTracker`] so agents do not stack the same buff, and the
//!    [`MovementPlanner`] for retreat/approach/reposition moves
//! 3. **Scoring**: Have a [`battle_core::CandidateScorer`] rank candidates
//!    under the phase's weights ([`PhaseWeightedScorer`] by default)
//! 4. **Selection**: Return the strictly best candidate; ties go to the
//!    first generated
//!
//! # Core Components
//!
//! - [`UnifiedDecisionEngine`]: Orchestrator owning the shared state
//! - [`DecisionContext`]: Blackboard handed to the generators

pub mod context;
pub mod engine;
pub mod generator;
pub mod movement;
pub mod pending;
pub mod phase;
pub mod scoring;

pub use context::DecisionContext;
pub use engine::{Evaluation, UnifiedDecisionEngine};
pub use generator::CandidateGenerator;
pub use movement::MovementPlanner;
pub use pending::{PendingActionTracker, PendingEntry};
pub use phase::{CombatPhaseDetector, RoundEstimator};
pub use scoring::PhaseWeightedScorer;
