//! Candidate generation.
//!
//! Every category runs independently and appends to one list in a fixed
//! order (attacks, buffs, heals, debuffs, movement), so ties at selection
//! time resolve the same way on every run. An EndTurn fallback is always
//! appended last.

use std::sync::Arc;

use battle_core::{
    AbilityClassifier, AbilitySnapshot, ActionCandidate, AgentId, CandidateKind, MoveDecision,
};
use tracing::{debug, trace, warn};

use super::context::DecisionContext;
use super::movement::MovementPlanner;
use super::pending::PendingActionTracker;
use super::scoring::heal_urgency;
use crate::api::Result;

/// Hint given to basic attacks, which carry no effectiveness estimate.
const BASIC_ATTACK_HINT: f32 = 0.5;

/// Proposes every concrete action the agent could take right now.
pub struct CandidateGenerator {
    tracker: Arc<PendingActionTracker>,
    planner: MovementPlanner,
}

impl CandidateGenerator {
    pub fn new(tracker: Arc<PendingActionTracker>, planner: MovementPlanner) -> Self {
        Self { tracker, planner }
    }

    pub fn tracker(&self) -> &Arc<PendingActionTracker> {
        &self.tracker
    }

    pub fn planner(&self) -> &MovementPlanner {
        &self.planner
    }

    /// Generates all candidates for `ctx`, EndTurn last.
    ///
    /// Movement failures only drop movement candidates; any other collaborator
    /// failure fails the whole generation.
    pub fn generate(&self, ctx: &DecisionContext<'_>) -> Result<Vec<ActionCandidate>> {
        let mut candidates = Vec::new();

        self.attacks(ctx, &mut candidates)?;
        self.buffs(ctx, &mut candidates)?;
        self.heals(ctx, &mut candidates)?;
        self.debuffs(ctx, &mut candidates)?;
        if let Err(err) = self.movement(ctx, &mut candidates) {
            warn!(
                "Movement planning failed for agent {}: {}",
                ctx.situation.agent, err
            );
        }

        candidates.push(ActionCandidate::end_turn(format!(
            "{}: nothing better to do",
            ctx.role_label()
        )));

        debug!(
            "Generated {} candidates for agent {}",
            candidates.len(),
            ctx.situation.agent
        );
        Ok(candidates)
    }

    /// Ability attacks on every legal target, plus basic attacks on every
    /// living enemy within weapon reach.
    pub fn attacks(&self, ctx: &DecisionContext<'_>, out: &mut Vec<ActionCandidate>) -> Result<()> {
        let situation = ctx.situation;
        let usable = usable(&situation.attacks, |ability| ability.is_offensive());

        if !usable.is_empty() {
            let classifier = ctx.env.classifier()?;
            let targets = ctx.attack_targets();

            for ability in usable {
                let classification = classifier.classify(ability, situation.agent);
                for target in targets.iter().copied() {
                    if !classifier.can_target(ability, situation, target) {
                        continue;
                    }
                    let effectiveness = classifier.evaluate_effectiveness(&classification, target);
                    out.push(ActionCandidate::ability_attack(
                        ability.id,
                        target.id,
                        classification,
                        effectiveness,
                        format!("{}: {} on {}", ctx.role_label(), ability.name, target.id),
                    ));
                }
            }
        }

        for enemy in ctx.enemies_in_basic_range() {
            out.push(ActionCandidate::basic_attack(
                enemy.id,
                BASIC_ATTACK_HINT,
                format!("{}: basic attack on {}", ctx.role_label(), enemy.id),
            ));
        }
        Ok(())
    }

    /// Buffs on self and allies that neither carry the effect nor have it
    /// pending from any caster.
    pub fn buffs(&self, ctx: &DecisionContext<'_>, out: &mut Vec<ActionCandidate>) -> Result<()> {
        let situation = ctx.situation;
        let usable = usable(&situation.buffs, |_| true);
        if usable.is_empty() {
            return Ok(());
        }
        let classifier = ctx.env.classifier()?;

        for ability in usable {
            let potency = classifier.classify(ability, situation.agent).potency;

            if ability.targets_self() && self.buff_is_fresh(classifier, ability, situation.agent) {
                out.push(ActionCandidate::buff(
                    ability.id,
                    situation.agent,
                    potency,
                    format!("{}: {} on self", ctx.role_label(), ability.name),
                ));
            }

            if ability.targets_allies() {
                for ally in situation.living_allies() {
                    if classifier.can_target(ability, situation, ally)
                        && self.buff_is_fresh(classifier, ability, ally.id)
                    {
                        out.push(ActionCandidate::buff(
                            ability.id,
                            ally.id,
                            potency,
                            format!("{}: {} on {}", ctx.role_label(), ability.name, ally.id),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Self-heals always; ally heals only below the heal threshold.
    pub fn heals(&self, ctx: &DecisionContext<'_>, out: &mut Vec<ActionCandidate>) -> Result<()> {
        let situation = ctx.situation;
        let usable = usable(&situation.heals, |_| true);
        if usable.is_empty() {
            return Ok(());
        }

        let wounded: Vec<_> = situation
            .living_allies()
            .filter(|ally| ally.hp_percent() < ctx.config.ally_heal_threshold)
            .collect();
        let classifier = if wounded.is_empty() {
            None
        } else {
            Some(ctx.env.classifier()?)
        };

        for ability in usable {
            if ability.targets_self() {
                out.push(ActionCandidate::heal(
                    ability.id,
                    situation.agent,
                    heal_urgency(situation.hp_percent),
                    format!(
                        "{}: {} on self at {:.0}%",
                        ctx.role_label(),
                        ability.name,
                        situation.hp_percent
                    ),
                ));
            }

            let Some(classifier) = classifier else {
                continue;
            };
            if !ability.targets_allies() {
                continue;
            }
            for ally in wounded.iter().copied() {
                if classifier.can_target(ability, situation, ally) {
                    out.push(ActionCandidate::heal(
                        ability.id,
                        ally.id,
                        heal_urgency(ally.hp_percent()),
                        format!(
                            "{}: {} on {} at {:.0}%",
                            ctx.role_label(),
                            ability.name,
                            ally.id,
                            ally.hp_percent()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Debuffs whose effectiveness clears the debuff threshold.
    pub fn debuffs(&self, ctx: &DecisionContext<'_>, out: &mut Vec<ActionCandidate>) -> Result<()> {
        let situation = ctx.situation;
        let usable = usable(&situation.debuffs, |_| true);
        if usable.is_empty() {
            return Ok(());
        }
        let classifier = ctx.env.classifier()?;

        for ability in usable {
            let mut classification = classifier.classify(ability, situation.agent);
            if let Some(save) = situation.debuff_saves.get(&ability.id) {
                classification.save = *save;
            }

            for enemy in situation.living_enemies() {
                if !classifier.can_target(ability, situation, enemy) {
                    continue;
                }
                let effectiveness = classifier.evaluate_effectiveness(&classification, enemy);
                if effectiveness <= ctx.config.debuff_threshold {
                    trace!(
                        "Skipping {} on {}: effectiveness {:.2}",
                        ability.name, enemy.id, effectiveness
                    );
                    continue;
                }
                out.push(ActionCandidate::debuff(
                    ability.id,
                    enemy.id,
                    classification,
                    effectiveness,
                    format!("{}: {} on {}", ctx.role_label(), ability.name, enemy.id),
                ));
            }
        }
        Ok(())
    }

    /// Retreat, approach and reposition moves, deduplicated by destination.
    pub fn movement(
        &self,
        ctx: &DecisionContext<'_>,
        out: &mut Vec<ActionCandidate>,
    ) -> Result<()> {
        let situation = ctx.situation;
        let env = &ctx.env;
        let role = ctx.role_label();
        let tolerance = ctx.config.move_dedup_tolerance;

        if self.planner.should_retreat(situation)
            && let Some(decision) = self.planner.plan_retreat(situation, env, role)?
        {
            push_unique_move(out, decision, tolerance);
        }

        let ranged_in_danger = situation.prefers_ranged() && situation.is_in_danger();
        let out_of_reach = !situation.has_hittable_enemies() && situation.has_living_enemies();
        if (out_of_reach || ranged_in_danger)
            && let Some(decision) = self.planner.plan_move(situation, env, role, false)?
        {
            push_unique_move(out, decision, tolerance);
        }

        if situation.prefers_ranged() && situation.nearest_enemy_snapshot().is_some() {
            let distance = situation.nearest_enemy_distance;
            let outside_band =
                distance < situation.min_safe_distance || distance > situation.weapon_range;
            if outside_band
                && let Some(decision) = self.planner.plan_move(situation, env, role, true)?
            {
                push_unique_move(out, decision, tolerance);
            }
        }
        Ok(())
    }

    fn buff_is_fresh(
        &self,
        classifier: &dyn AbilityClassifier,
        ability: &AbilitySnapshot,
        target: AgentId,
    ) -> bool {
        !classifier.is_buff_already_applied(ability, target)
            && !self.tracker.is_buff_pending(ability.id, target)
    }
}

/// Available abilities matching `filter`, in snapshot order.
fn usable(
    abilities: &[AbilitySnapshot],
    filter: impl Fn(&AbilitySnapshot) -> bool,
) -> Vec<&AbilitySnapshot> {
    abilities
        .iter()
        .filter(|ability| ability.available && filter(ability))
        .collect()
}

/// Appends a move unless one already heads within `tolerance` of it.
fn push_unique_move(out: &mut Vec<ActionCandidate>, decision: MoveDecision, tolerance: f32) {
    let duplicate = out.iter().any(|candidate| {
        candidate.kind == CandidateKind::Move
            && candidate
                .destination
                .is_some_and(|known| known.distance(decision.destination) <= tolerance)
    });
    if duplicate {
        trace!("Dropping duplicate move to {}", decision.destination);
        return;
    }
    out.push(ActionCandidate::movement(decision));
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{
        AbilityId, AgentSnapshot, Classification, DecisionConfig, DecisionEnv, ManualClock,
        Position, PositionSearch, SaveKind, ScoredPosition, Situation, SituationFlags, TargetFlags,
    };

    struct Classifier {
        effectiveness: f32,
        applied: Vec<(AbilityId, AgentId)>,
    }

    impl Classifier {
        fn new(effectiveness: f32) -> Self {
            Self {
                effectiveness,
                applied: Vec::new(),
            }
        }
    }

    impl AbilityClassifier for Classifier {
        fn classify(&self, _: &AbilitySnapshot, _: AgentId) -> Classification {
            Classification {
                potency: 0.6,
                ..Classification::default()
            }
        }

        fn evaluate_effectiveness(&self, _: &Classification, _: &AgentSnapshot) -> f32 {
            self.effectiveness
        }

        fn is_buff_already_applied(&self, ability: &AbilitySnapshot, target: AgentId) -> bool {
            self.applied.contains(&(ability.id, target))
        }
    }

    struct Positions {
        retreat: Option<ScoredPosition>,
        ranged: Option<ScoredPosition>,
    }

    impl PositionSearch for Positions {
        fn find_retreat_position(&self, _: &Situation) -> Option<ScoredPosition> {
            self.retreat
        }

        fn find_ranged_attack_position(
            &self,
            _: &Situation,
            _: &AgentSnapshot,
        ) -> Option<ScoredPosition> {
            self.ranged
        }

        fn find_approach_position(
            &self,
            _: &Situation,
            _: &AgentSnapshot,
        ) -> Option<ScoredPosition> {
            None
        }

        fn find_melee_attack_position(
            &self,
            _: &Situation,
            _: &AgentSnapshot,
        ) -> Option<ScoredPosition> {
            None
        }
    }

    fn generator() -> (CandidateGenerator, Arc<PendingActionTracker>) {
        let config = DecisionConfig::default();
        let tracker = Arc::new(PendingActionTracker::from_config(
            &config,
            Arc::new(ManualClock::new()),
        ));
        let generator = CandidateGenerator::new(tracker.clone(), MovementPlanner::new(&config));
        (generator, tracker)
    }

    fn generate(situation: &Situation, env: DecisionEnv<'_>) -> Vec<ActionCandidate> {
        let config = DecisionConfig::default();
        let (generator, _) = generator();
        let ctx = DecisionContext::new(situation, env, &config);
        generator.generate(&ctx).unwrap_or_default()
    }

    fn kinds(candidates: &[ActionCandidate], kind: CandidateKind) -> Vec<&ActionCandidate> {
        candidates.iter().filter(|c| c.kind == kind).collect()
    }

    fn enemy(id: u32, x: f32) -> AgentSnapshot {
        AgentSnapshot::new(AgentId(id), Position::new(x, 0.0)).with_hit_points(100, 100)
    }

    #[test]
    fn test_empty_situation_yields_only_end_turn() {
        let situation = Situation::builder(AgentId(1))
            .without_flag(SituationFlags::CAN_MOVE)
            .build();
        let candidates = generate(&situation, DecisionEnv::empty());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::EndTurn);
    }

    #[test]
    fn test_basic_attack_range_tolerance() {
        // weapon range 1.5 + tolerance 1.0
        let situation = Situation::builder(AgentId(1))
            .enemy(enemy(10, 2.5))
            .enemy(enemy(11, 3.0))
            .enemy(enemy(12, 1.0).dead())
            .hittable(AgentId(10))
            .build();
        let candidates = generate(&situation, DecisionEnv::empty());
        let basics = kinds(&candidates, CandidateKind::BasicAttack);

        assert_eq!(basics.len(), 1);
        assert_eq!(basics[0].target, Some(AgentId(10)));
        assert_eq!(candidates.last().map(|c| c.kind), Some(CandidateKind::EndTurn));
    }

    #[test]
    fn test_ability_attacks_need_classifier() {
        let situation = Situation::builder(AgentId(1))
            .enemy(enemy(10, 2.0))
            .attack(AbilitySnapshot::new(
                AbilityId(1),
                "Fire Bolt",
                TargetFlags::ENEMY | TargetFlags::OFFENSIVE,
            ))
            .build();
        let config = DecisionConfig::default();
        let (generator, _) = generator();

        let ctx = DecisionContext::new(&situation, DecisionEnv::empty(), &config);
        assert!(generator.generate(&ctx).is_err());

        let classifier = Classifier::new(0.9);
        let env = DecisionEnv::empty().with_classifier(&classifier);
        let ctx = DecisionContext::new(&situation, env, &config);
        let candidates = generator.generate(&ctx).unwrap_or_default();
        let attacks = kinds(&candidates, CandidateKind::AbilityAttack);
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].hint, 0.9);
    }

    #[test]
    fn test_ally_heal_threshold() {
        let situation = Situation::builder(AgentId(1))
            .hp_percent(100.0)
            .ally(AgentSnapshot::new(AgentId(2), Position::new(1.0, 0.0)).with_hit_points(80, 100))
            .ally(
                AgentSnapshot::new(AgentId(3), Position::new(1.0, 1.0)).with_hit_points(799, 1000),
            )
            .heal(AbilitySnapshot::new(
                AbilityId(5),
                "Cure",
                TargetFlags::SELF | TargetFlags::ALLY,
            ))
            .without_flag(SituationFlags::CAN_MOVE)
            .build();
        let classifier = Classifier::new(1.0);
        let candidates = generate(&situation, DecisionEnv::empty().with_classifier(&classifier));

        let targets: Vec<_> = kinds(&candidates, CandidateKind::Heal)
            .iter()
            .filter_map(|c| c.target)
            .collect();
        // Self-heal is always proposed, even at full HP.
        assert_eq!(targets, vec![AgentId(1), AgentId(3)]);
    }

    #[test]
    fn test_self_heal_without_classifier() {
        let situation = Situation::builder(AgentId(1))
            .hp_percent(20.0)
            .heal(AbilitySnapshot::new(AbilityId(5), "Second Wind", TargetFlags::SELF))
            .build();
        let candidates = generate(&situation, DecisionEnv::empty());

        let heals = kinds(&candidates, CandidateKind::Heal);
        assert_eq!(heals.len(), 1);
        assert!((heals[0].hint - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_debuff_threshold_is_exclusive() {
        let situation = Situation::builder(AgentId(1))
            .enemy(enemy(10, 4.0))
            .debuff(
                AbilitySnapshot::new(AbilityId(9), "Hold Person", TargetFlags::ENEMY),
                SaveKind::Will,
            )
            .without_flag(SituationFlags::CAN_MOVE)
            .build();

        let at_threshold = Classifier::new(0.3);
        let candidates = generate(&situation, DecisionEnv::empty().with_classifier(&at_threshold));
        assert!(kinds(&candidates, CandidateKind::Debuff).is_empty());

        let above = Classifier::new(0.31);
        let candidates = generate(&situation, DecisionEnv::empty().with_classifier(&above));
        let debuffs = kinds(&candidates, CandidateKind::Debuff);
        assert_eq!(debuffs.len(), 1);
        assert_eq!(
            debuffs[0].classification.map(|c| c.save),
            Some(SaveKind::Will)
        );
    }

    #[test]
    fn test_buffs_skip_applied_and_pending() {
        let haste =
            AbilitySnapshot::new(AbilityId(7), "Haste", TargetFlags::SELF | TargetFlags::ALLY);
        let situation = Situation::builder(AgentId(1))
            .ally(AgentSnapshot::new(AgentId(2), Position::new(1.0, 0.0)))
            .ally(AgentSnapshot::new(AgentId(3), Position::new(2.0, 0.0)))
            .ally(AgentSnapshot::new(AgentId(4), Position::new(3.0, 0.0)))
            .buff(haste)
            .without_flag(SituationFlags::CAN_MOVE)
            .build();

        let config = DecisionConfig::default();
        let (generator, tracker) = generator();
        tracker.register_pending_buff(AbilityId(7), AgentId(3), AgentId(99));

        let classifier = Classifier {
            effectiveness: 1.0,
            applied: vec![(AbilityId(7), AgentId(1))],
        };
        let env = DecisionEnv::empty().with_classifier(&classifier);
        let ctx = DecisionContext::new(&situation, env, &config);
        let candidates = generator.generate(&ctx).unwrap_or_default();

        let targets: Vec<_> = kinds(&candidates, CandidateKind::Buff)
            .iter()
            .filter_map(|c| c.target)
            .collect();
        assert_eq!(targets, vec![AgentId(2), AgentId(4)]);
    }

    #[test]
    fn test_movement_dedup() {
        // Ranged agent, enemy too close: retreat and reposition both fire and
        // propose destinations 1.1 apart.
        let situation = Situation::builder(AgentId(1))
            .enemy(enemy(10, 2.0))
            .weapon_range(20.0)
            .min_safe_distance(6.0)
            .with_flag(SituationFlags::PREFERS_RANGED)
            .build();
        let positions = Positions {
            retreat: Some(ScoredPosition::new(Position::new(-8.0, 0.0), 0.9)),
            ranged: Some(ScoredPosition::new(Position::new(-9.0, 0.5), 0.8)),
        };
        let candidates = generate(&situation, DecisionEnv::empty().with_positions(&positions));

        let moves = kinds(&candidates, CandidateKind::Move);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].destination, Some(Position::new(-8.0, 0.0)));
    }

    #[test]
    fn test_distinct_moves_are_kept() {
        let situation = Situation::builder(AgentId(1))
            .enemy(enemy(10, 2.0))
            .weapon_range(20.0)
            .min_safe_distance(6.0)
            .with_flag(SituationFlags::PREFERS_RANGED)
            .build();
        let positions = Positions {
            retreat: Some(ScoredPosition::new(Position::new(-8.0, 0.0), 0.9)),
            ranged: Some(ScoredPosition::new(Position::new(0.0, 9.0), 0.8)),
        };
        let candidates = generate(&situation, DecisionEnv::empty().with_positions(&positions));

        assert_eq!(kinds(&candidates, CandidateKind::Move).len(), 2);
    }

    #[test]
    fn test_movement_failure_keeps_other_candidates() {
        let situation = Situation::builder(AgentId(1))
            .enemy(enemy(10, 20.0))
            .heal(AbilitySnapshot::new(AbilityId(5), "Second Wind", TargetFlags::SELF))
            .build();
        // Needs to approach, but there is no position search.
        let candidates = generate(&situation, DecisionEnv::empty());

        assert_eq!(kinds(&candidates, CandidateKind::Heal).len(), 1);
        assert!(kinds(&candidates, CandidateKind::Move).is_empty());
        assert_eq!(candidates.last().map(|c| c.kind), Some(CandidateKind::EndTurn));
    }
}
