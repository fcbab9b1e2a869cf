//! Default utility scoring.
//!
//! Candidates arrive with a `hint` in `0.0..=1.0` (effectiveness for attacks
//! and debuffs, urgency for heals, search score for moves). The scorer turns
//! that into a final utility:
//!
//! ```text
//! score = phase_weight(kind) × (0.5 + 0.5 × clamp(hint, 0, 1)) × bonus
//! ```
//!
//! EndTurn scores its raw weight, so it only wins when nothing else is worth
//! doing.
//!
//! - [`curves`]: response curves mapping raw inputs onto `0.0..=1.0`
//! - [`weights`]: per-phase weight tables
//! - [`scorer`]: the [`PhaseWeightedScorer`] itself

pub mod curves;
pub mod scorer;
pub mod weights;

pub use curves::{ResponseCurve, heal_urgency};
pub use scorer::PhaseWeightedScorer;
pub use weights::{PhaseWeightTable, PhaseWeights};
