//! Decision context shared by the candidate generators.
//!
//! The [`DecisionContext`] is the "blackboard" for one decision: the agent's
//! situation, the collaborators, and the tunables, plus helper queries the
//! generators share.

use battle_core::{AgentSnapshot, DecisionConfig, DecisionEnv, Situation};

/// Read-only context for one decision.
///
/// # Lifetime
///
/// The `'a` lifetime ties the context to the situation and collaborators it
/// borrows. Decisions are synchronous, so nothing outlives the call.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub situation: &'a Situation,
    pub env: DecisionEnv<'a>,
    pub config: &'a DecisionConfig,
}

impl<'a> DecisionContext<'a> {
    pub fn new(situation: &'a Situation, env: DecisionEnv<'a>, config: &'a DecisionConfig) -> Self {
        Self {
            situation,
            env,
            config,
        }
    }

    /// Role label used in candidate reasons.
    pub fn role_label(&self) -> &'a str {
        self.situation.role.as_ref()
    }

    /// Distance from the acting agent to `agent`.
    pub fn distance_to(&self, agent: &AgentSnapshot) -> f32 {
        self.situation.distance_to(agent.position)
    }

    /// Attack targets: hittable enemies first, then every other living
    /// enemy, without duplicates.
    pub fn attack_targets(&self) -> Vec<&'a AgentSnapshot> {
        let situation = self.situation;
        let hittable = situation
            .hittable_enemies
            .iter()
            .filter_map(|id| situation.enemy(*id));

        let mut targets: Vec<&'a AgentSnapshot> = Vec::new();
        for enemy in hittable.chain(situation.enemies.iter()) {
            if enemy.alive && !targets.iter().any(|known| known.id == enemy.id) {
                targets.push(enemy);
            }
        }
        targets
    }

    /// Living enemies inside weapon range plus the basic-attack tolerance.
    pub fn enemies_in_basic_range(&self) -> impl Iterator<Item = &'a AgentSnapshot> + 'a {
        let situation = self.situation;
        let reach = situation.weapon_range + self.config.basic_attack_tolerance;
        situation
            .living_enemies()
            .filter(move |enemy| situation.distance_to(enemy.position) <= reach)
    }
}
