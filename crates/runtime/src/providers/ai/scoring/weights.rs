//! Per-phase candidate weights.

use battle_core::{CandidateKind, CombatPhase};
use serde::{Deserialize, Serialize};

/// Weight of each [`CandidateKind`] in one phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseWeights {
    pub ability_attack: f32,
    pub basic_attack: f32,
    pub buff: f32,
    pub heal: f32,
    pub debuff: f32,
    pub movement: f32,
    pub end_turn: f32,
}

impl PhaseWeights {
    pub const OPENING: Self = Self::new(1.0, 0.6, 1.6, 0.8, 1.2, 0.9);
    pub const MIDGAME: Self = Self::new(1.4, 0.9, 0.8, 1.0, 1.1, 0.7);
    pub const CLEANUP: Self = Self::new(1.6, 1.2, 0.3, 0.6, 0.5, 0.8);
    pub const DESPERATE: Self = Self::new(0.9, 0.6, 0.5, 2.0, 0.6, 1.5);

    const END_TURN: f32 = 0.05;

    const fn new(
        ability_attack: f32,
        basic_attack: f32,
        buff: f32,
        heal: f32,
        debuff: f32,
        movement: f32,
    ) -> Self {
        Self {
            ability_attack,
            basic_attack,
            buff,
            heal,
            debuff,
            movement,
            end_turn: Self::END_TURN,
        }
    }

    pub fn weight(&self, kind: CandidateKind) -> f32 {
        match kind {
            CandidateKind::AbilityAttack => self.ability_attack,
            CandidateKind::BasicAttack => self.basic_attack,
            CandidateKind::Buff => self.buff,
            CandidateKind::Heal => self.heal,
            CandidateKind::Debuff => self.debuff,
            CandidateKind::Move => self.movement,
            CandidateKind::EndTurn => self.end_turn,
        }
    }
}

/// Weights for every [`CombatPhase`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseWeightTable {
    pub opening: PhaseWeights,
    pub midgame: PhaseWeights,
    pub cleanup: PhaseWeights,
    pub desperate: PhaseWeights,
}

impl Default for PhaseWeightTable {
    fn default() -> Self {
        Self {
            opening: PhaseWeights::OPENING,
            midgame: PhaseWeights::MIDGAME,
            cleanup: PhaseWeights::CLEANUP,
            desperate: PhaseWeights::DESPERATE,
        }
    }
}

impl PhaseWeightTable {
    pub fn for_phase(&self, phase: CombatPhase) -> &PhaseWeights {
        match phase {
            CombatPhase::Opening => &self.opening,
            CombatPhase::Midgame => &self.midgame,
            CombatPhase::Cleanup => &self.cleanup,
            CombatPhase::Desperate => &self.desperate,
        }
    }
}
