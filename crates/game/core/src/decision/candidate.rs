use std::fmt;

use super::classification::Classification;
use crate::state::{AbilityId, AgentId, Position};

/// Discriminates the kinds of action the pipeline can propose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CandidateKind {
    AbilityAttack,
    BasicAttack,
    Buff,
    Heal,
    Debuff,
    Move,
    EndTurn,
}

impl CandidateKind {
    /// EndTurn is the guaranteed fallback, not a real option.
    pub const fn is_fallback(self) -> bool {
        matches!(self, CandidateKind::EndTurn)
    }

    pub const fn is_attack(self) -> bool {
        matches!(self, CandidateKind::AbilityAttack | CandidateKind::BasicAttack)
    }
}

/// A proposed, not-yet-executed action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCandidate {
    pub kind: CandidateKind,
    pub ability: Option<AbilityId>,
    pub target: Option<AgentId>,
    pub destination: Option<Position>,
    pub classification: Option<Classification>,
    /// Effectiveness or urgency estimate (0.0-1.0) fed to the scorer.
    pub hint: f32,
    pub reason: String,
    /// Final utility written by the scorer.
    pub score: f32,
}

impl ActionCandidate {
    fn new(kind: CandidateKind, hint: f32, reason: String) -> Self {
        Self {
            kind,
            ability: None,
            target: None,
            destination: None,
            classification: None,
            hint,
            reason,
            score: 0.0,
        }
    }

    pub fn ability_attack(
        ability: AbilityId,
        target: AgentId,
        classification: Classification,
        effectiveness: f32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ability: Some(ability),
            target: Some(target),
            classification: Some(classification),
            ..Self::new(CandidateKind::AbilityAttack, effectiveness, reason.into())
        }
    }

    pub fn basic_attack(target: AgentId, hint: f32, reason: impl Into<String>) -> Self {
        Self {
            target: Some(target),
            ..Self::new(CandidateKind::BasicAttack, hint, reason.into())
        }
    }

    pub fn buff(ability: AbilityId, target: AgentId, hint: f32, reason: impl Into<String>) -> Self {
        Self {
            ability: Some(ability),
            target: Some(target),
            ..Self::new(CandidateKind::Buff, hint, reason.into())
        }
    }

    pub fn heal(
        ability: AbilityId,
        target: AgentId,
        urgency: f32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ability: Some(ability),
            target: Some(target),
            ..Self::new(CandidateKind::Heal, urgency, reason.into())
        }
    }

    pub fn debuff(
        ability: AbilityId,
        target: AgentId,
        classification: Classification,
        effectiveness: f32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ability: Some(ability),
            target: Some(target),
            classification: Some(classification),
            ..Self::new(CandidateKind::Debuff, effectiveness, reason.into())
        }
    }

    pub fn movement(decision: MoveDecision) -> Self {
        Self {
            destination: Some(decision.destination),
            ..Self::new(CandidateKind::Move, decision.score, decision.reason)
        }
    }

    pub fn end_turn(reason: impl Into<String>) -> Self {
        Self::new(CandidateKind::EndTurn, 0.0, reason.into())
    }

    pub fn is_fallback(&self) -> bool {
        self.kind.is_fallback()
    }
}

impl fmt::Display for ActionCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ability) = self.ability {
            write!(f, " {}", ability)?;
        }
        if let Some(target) = self.target {
            write!(f, " -> {}", target)?;
        }
        if let Some(destination) = self.destination {
            write!(f, " -> {}", destination)?;
        }
        write!(f, " [score={:.2}] {}", self.score, self.reason)
    }
}

/// Single best movement proposal from the movement planner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDecision {
    pub destination: Position,
    pub reason: String,
    pub score: f32,
}

impl MoveDecision {
    pub fn new(destination: Position, reason: impl Into<String>, score: f32) -> Self {
        Self {
            destination,
            reason: reason.into(),
            score,
        }
    }
}

/// Position returned by the external positional search.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredPosition {
    pub position: Position,
    pub score: f32,
}

impl ScoredPosition {
    pub const fn new(position: Position, score: f32) -> Self {
        Self { position, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_candidate_carries_decision() {
        let decision = MoveDecision::new(Position::new(3.0, 4.0), "retreat", 0.7);
        let candidate = ActionCandidate::movement(decision);

        assert_eq!(candidate.kind, CandidateKind::Move);
        assert_eq!(candidate.destination, Some(Position::new(3.0, 4.0)));
        assert_eq!(candidate.reason, "retreat");
        assert!((candidate.hint - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_only_end_turn_is_fallback() {
        assert!(ActionCandidate::end_turn("done").is_fallback());
        assert!(!ActionCandidate::basic_attack(AgentId(2), 0.5, "swing").is_fallback());
    }
}
