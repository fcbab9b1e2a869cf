use crate::decision::Classification;
use crate::state::{AbilitySnapshot, AgentId, AgentSnapshot, Situation, TargetFlags};

/// Ability classification and effectiveness heuristics.
pub trait AbilityClassifier {
    /// Classifies `ability` as used by `caster`.
    fn classify(&self, ability: &AbilitySnapshot, caster: AgentId) -> Classification;

    /// Expected effectiveness (0.0-1.0) of a classified ability on `target`,
    /// accounting for the target's resistances and saves.
    fn evaluate_effectiveness(&self, classification: &Classification, target: &AgentSnapshot)
    -> f32;

    /// Whether the lasting effect of `ability` is already on `target`.
    fn is_buff_already_applied(&self, ability: &AbilitySnapshot, target: AgentId) -> bool;

    /// Whether `ability` may legally target `target` from the acting agent.
    ///
    /// The default checks the ability's target flags against the target's
    /// side and its cast range against the current distance.
    fn can_target(
        &self,
        ability: &AbilitySnapshot,
        situation: &Situation,
        target: &AgentSnapshot,
    ) -> bool {
        let relation = if target.id == situation.agent {
            TargetFlags::SELF
        } else if situation.enemy(target.id).is_some() {
            TargetFlags::ENEMY
        } else {
            TargetFlags::ALLY
        };

        ability.targeting.contains(relation)
            && ability.in_range(situation.distance_to(target.position))
    }
}
