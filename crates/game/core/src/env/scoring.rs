use super::error::OracleError;
use crate::decision::{ActionCandidate, CombatPhase};
use crate::state::Situation;

/// Utility scorer ranking candidates under phase-specific weights.
pub trait CandidateScorer {
    /// Writes a final [`ActionCandidate::score`] into every candidate.
    fn score_all(
        &self,
        candidates: &mut [ActionCandidate],
        situation: &Situation,
        phase: CombatPhase,
    ) -> Result<(), OracleError>;

    /// Diagnostic dump of the best candidates. Defaults to doing nothing.
    fn log_top_candidates(&self, _candidates: &[ActionCandidate], _label: &str) {}
}
