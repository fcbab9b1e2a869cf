use crate::decision::ScoredPosition;
use crate::state::{AgentId, AgentSnapshot, Position, Situation};

/// Reachable-position search over the tactical map.
///
/// Every method returns `None` when no reachable, safe position exists.
pub trait PositionSearch {
    /// Position maximizing distance from all enemies.
    fn find_retreat_position(&self, situation: &Situation) -> Option<ScoredPosition>;

    /// Position a ranged agent can attack `target` from while staying safe.
    fn find_ranged_attack_position(
        &self,
        situation: &Situation,
        target: &AgentSnapshot,
    ) -> Option<ScoredPosition>;

    /// Plain approach position toward `target`.
    fn find_approach_position(
        &self,
        situation: &Situation,
        target: &AgentSnapshot,
    ) -> Option<ScoredPosition>;

    /// Position from which a melee agent engages `target`.
    fn find_melee_attack_position(
        &self,
        situation: &Situation,
        target: &AgentSnapshot,
    ) -> Option<ScoredPosition>;
}

/// Tactical grid validation.
pub trait TacticalGrid {
    /// Whether `agent` may end a move at `destination`.
    fn validate_target_position(&self, agent: AgentId, destination: Position) -> bool;
}
