//! Output vocabulary of the decision pipeline.
//!
//! Everything here is decision-scoped: created fresh for one agent at one
//! decision point and discarded once the executor has consumed it.
mod candidate;
mod classification;
mod phase;

pub use candidate::{ActionCandidate, CandidateKind, MoveDecision, ScoredPosition};
pub use classification::{AbilityCategory, Classification, SaveKind};
pub use phase::CombatPhase;
