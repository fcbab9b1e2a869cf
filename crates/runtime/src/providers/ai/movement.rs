//! Movement planning.
//!
//! The planner decides *whether* and *toward what* an agent should move; the
//! geometry itself (reachability, safety, line of fire) belongs to the
//! [`PositionSearch`](battle_core::PositionSearch) collaborator. Every plan
//! returns at most one [`MoveDecision`].

use battle_core::{
    ActionEconomy, AgentSnapshot, DecisionConfig, DecisionEnv, MoveDecision, Position, Situation,
};
use tracing::{debug, trace};

use crate::api::Result;

/// Score given to the unscored direct melee step.
const DIRECT_STEP_SCORE: f32 = 0.5;

/// Retreat, approach and reposition planning over a [`Situation`].
#[derive(Clone, Debug)]
pub struct MovementPlanner {
    min_move_distance: f32,
    melee_step_distance: f32,
    post_action_retreat_gain: f32,
}

impl MovementPlanner {
    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            min_move_distance: config.min_move_distance,
            melee_step_distance: config.melee_step_distance,
            post_action_retreat_gain: config.post_action_retreat_gain,
        }
    }

    /// A ranged agent closer to the nearest enemy than its safe distance.
    pub fn should_retreat(&self, situation: &Situation) -> bool {
        situation.prefers_ranged()
            && situation.nearest_enemy_distance < situation.min_safe_distance
    }

    /// Plans a move away from all enemies.
    ///
    /// `Ok(None)` when the agent already moved, cannot move, has no nearest
    /// enemy, already stands at a safe distance, or no retreat position exists.
    pub fn plan_retreat(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
        role: &str,
    ) -> Result<Option<MoveDecision>> {
        if situation.has_moved() || !situation.can_move() {
            return Ok(None);
        }
        let Some(nearest) = situation.nearest_enemy_snapshot() else {
            return Ok(None);
        };
        if situation.nearest_enemy_distance >= situation.min_safe_distance {
            return Ok(None);
        }

        let Some(found) = env.positions()?.find_retreat_position(situation) else {
            debug!("No retreat position for agent {}", situation.agent);
            return Ok(None);
        };

        Ok(self.accept(
            situation,
            found.position,
            found.score,
            format!("{role}: retreat from {}", nearest.id),
        ))
    }

    /// Plans an approach or attack-position move toward the tactical target.
    ///
    /// Unless `force_move` is set, an agent that can already hit an enemy
    /// stays put; a ranged agent in danger is the exception.
    pub fn plan_move(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
        role: &str,
        force_move: bool,
    ) -> Result<Option<MoveDecision>> {
        if situation.has_moved() || !situation.can_move() {
            return Ok(None);
        }

        let ranged_in_danger = situation.prefers_ranged() && situation.is_in_danger();
        if situation.has_hittable_enemies() && !force_move && !ranged_in_danger {
            return Ok(None);
        }
        if !situation.has_living_enemies() || situation.nearest_enemy_snapshot().is_none() {
            return Ok(None);
        }
        let Some(target) = self.tactical_target(situation, env) else {
            return Ok(None);
        };

        if situation.prefers_ranged() {
            self.plan_ranged_move(situation, env, role, target)
        } else {
            self.plan_melee_move(situation, env, role, target)
        }
    }

    /// One extra retreat after acting, only when it gains real distance.
    pub fn plan_post_action_retreat(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
        role: &str,
    ) -> Result<Option<MoveDecision>> {
        if !situation.economy.contains(ActionEconomy::MOVE)
            || !situation.can_move()
            || !self.should_retreat(situation)
        {
            return Ok(None);
        }
        let Some(nearest) = situation.nearest_enemy_snapshot() else {
            return Ok(None);
        };
        let Some(found) = env.positions()?.find_retreat_position(situation) else {
            return Ok(None);
        };

        let current = situation.distance_to(nearest.position);
        let gain = nearest.position.distance(found.position) - current;
        if gain < self.post_action_retreat_gain {
            trace!(
                "Post-action retreat for agent {} gains only {:.1}, skipping",
                situation.agent, gain
            );
            return Ok(None);
        }

        Ok(self.accept(
            situation,
            found.position,
            found.score,
            format!("{role}: fall back after acting (+{gain:.1})"),
        ))
    }

    /// Shared focus > analyzer's best target > nearest enemy, living only.
    pub fn tactical_target<'s>(
        &self,
        situation: &'s Situation,
        env: &DecisionEnv<'_>,
    ) -> Option<&'s AgentSnapshot> {
        let living = move |id| situation.enemy(id).filter(|enemy| enemy.alive);

        env.focus()
            .and_then(|focus| focus.current_focus())
            .and_then(living)
            .or_else(|| situation.best_target.and_then(living))
            .or_else(|| situation.nearest_enemy_snapshot())
    }

    fn plan_ranged_move(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
        role: &str,
        target: &AgentSnapshot,
    ) -> Result<Option<MoveDecision>> {
        let positions = env.positions()?;

        if let Some(found) = positions.find_ranged_attack_position(situation, target) {
            return Ok(self.accept(
                situation,
                found.position,
                found.score,
                format!("{role}: firing position on {}", target.id),
            ));
        }
        if let Some(found) = positions.find_approach_position(situation, target) {
            return Ok(self.accept(
                situation,
                found.position,
                found.score,
                format!("{role}: approach {}", target.id),
            ));
        }

        debug!("No ranged position toward {} for agent {}", target.id, situation.agent);
        Ok(None)
    }

    fn plan_melee_move(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
        role: &str,
        target: &AgentSnapshot,
    ) -> Result<Option<MoveDecision>> {
        if let Some(found) = env.positions()?.find_melee_attack_position(situation, target) {
            return Ok(self.accept(
                situation,
                found.position,
                found.score,
                format!("{role}: engage {}", target.id),
            ));
        }

        // Direct step, never past the target.
        let distance = situation.distance_to(target.position);
        let step = self.melee_step_distance.min(distance);
        let destination = situation.position.step_towards(target.position, step);

        if !env.grid()?.validate_target_position(situation.agent, destination) {
            debug!(
                "Direct step to {} rejected by the tactical grid for agent {}",
                destination, situation.agent
            );
            return Ok(None);
        }

        Ok(self.accept(
            situation,
            destination,
            DIRECT_STEP_SCORE,
            format!("{role}: close in on {}", target.id),
        ))
    }

    /// Wraps a destination, suppressing moves that would not leave the spot.
    fn accept(
        &self,
        situation: &Situation,
        destination: Position,
        score: f32,
        reason: String,
    ) -> Option<MoveDecision> {
        if situation.distance_to(destination) <= self.min_move_distance {
            trace!(
                "Agent {} already at {}, move suppressed",
                situation.agent, destination
            );
            return None;
        }
        Some(MoveDecision::new(destination, reason, score))
    }
}
