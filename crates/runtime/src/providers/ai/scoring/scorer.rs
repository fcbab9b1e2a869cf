//! Phase-weighted candidate scorer.

use battle_core::{
    ActionCandidate, CandidateKind, CandidateScorer, CombatPhase, DecisionConfig, OracleError,
    Situation,
};
use tracing::debug;

use super::weights::PhaseWeightTable;

/// Default [`CandidateScorer`]: phase weight times a hint factor.
#[derive(Clone, Debug)]
pub struct PhaseWeightedScorer {
    weights: PhaseWeightTable,
    opening_buff_bonus: f32,
    top_candidates: usize,
}

impl PhaseWeightedScorer {
    /// Multiplier for buffs in Opening while the agent has not buffed yet.
    pub const OPENING_BUFF_BONUS: f32 = 1.25;

    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            weights: PhaseWeightTable::default(),
            opening_buff_bonus: Self::OPENING_BUFF_BONUS,
            top_candidates: config.top_candidates_logged,
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: PhaseWeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &PhaseWeightTable {
        &self.weights
    }

    /// Final utility of one candidate.
    pub fn score(
        &self,
        candidate: &ActionCandidate,
        situation: &Situation,
        phase: CombatPhase,
    ) -> f32 {
        let weight = self.weights.for_phase(phase).weight(candidate.kind);
        if candidate.is_fallback() {
            return weight;
        }

        let mut score = weight * hint_factor(candidate.hint);
        if candidate.kind == CandidateKind::Buff
            && phase == CombatPhase::Opening
            && !situation.has_buffed()
        {
            score *= self.opening_buff_bonus;
        }
        score
    }
}

impl Default for PhaseWeightedScorer {
    fn default() -> Self {
        Self::new(&DecisionConfig::default())
    }
}

/// `0.5 + 0.5 × clamp(hint)`; a non-finite hint counts as 0.
fn hint_factor(hint: f32) -> f32 {
    let hint = if hint.is_finite() {
        hint.clamp(0.0, 1.0)
    } else {
        0.0
    };
    0.5 + 0.5 * hint
}

impl CandidateScorer for PhaseWeightedScorer {
    fn score_all(
        &self,
        candidates: &mut [ActionCandidate],
        situation: &Situation,
        phase: CombatPhase,
    ) -> Result<(), OracleError> {
        for candidate in candidates.iter_mut() {
            candidate.score = self.score(candidate, situation, phase);
        }
        Ok(())
    }

    fn log_top_candidates(&self, candidates: &[ActionCandidate], label: &str) {
        let mut ranked: Vec<&ActionCandidate> = candidates.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "[{}] top {} of {} candidates",
            label,
            self.top_candidates.min(ranked.len()),
            ranked.len()
        );
        for (rank, candidate) in ranked.iter().take(self.top_candidates).enumerate() {
            debug!("[{}]   #{} {}", label, rank + 1, candidate);
        }
    }
}
