//! Decision orchestrator.
//!
//! [`UnifiedDecisionEngine`] runs one decision end to end:
//!
//! 1. Obtain a [`Situation`] from the analyzer (or take the caller's)
//! 2. Classify the phase when it is unset or still the Midgame default
//! 3. Generate candidates
//! 4. Short-circuit to EndTurn when nothing but the fallback was generated
//! 5. Score under the phase's weights
//! 6. Select the strictly best score; ties go to the first generated
//!
//! Every stage returns a [`Result`]. The `try_*` entry points surface the
//! error; `decide_*` never fail and map any error to an EndTurn candidate.

use std::sync::Arc;

use battle_core::{
    AbilityId, ActionCandidate, AgentId, BattleError, CandidateKind, CandidateScorer, Clock,
    CombatPhase, DecisionConfig, DecisionEnv, Situation, TurnState,
};
use tracing::{debug, error, info, warn};

use super::context::DecisionContext;
use super::generator::CandidateGenerator;
use super::movement::MovementPlanner;
use super::pending::PendingActionTracker;
use super::phase::CombatPhaseDetector;
use super::scoring::{PhaseWeightTable, PhaseWeightedScorer};
use crate::api::{DecisionError, Result};

/// Reason carried by the EndTurn returned when only the fallback exists.
pub const NO_VALID_ACTIONS: &str = "No valid actions";

/// Outcome of one scored decision.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub phase: CombatPhase,
    /// Candidates in generation order, with final scores.
    pub candidates: Vec<ActionCandidate>,
    /// Index of the winner in `candidates`.
    pub selected: usize,
}

impl Evaluation {
    pub fn selection(&self) -> Option<&ActionCandidate> {
        self.candidates.get(self.selected)
    }

    fn into_selection(mut self) -> Result<ActionCandidate> {
        if self.selected < self.candidates.len() {
            Ok(self.candidates.swap_remove(self.selected))
        } else {
            Err(DecisionError::NoCandidates)
        }
    }
}

/// Utility-AI decision engine for one group of agents.
///
/// Owns the phase detector's real-time state and shares the pending-buff
/// registry with any other engine built through [`Self::with_tracker`].
pub struct UnifiedDecisionEngine {
    config: DecisionConfig,
    detector: CombatPhaseDetector,
    generator: CandidateGenerator,
    default_scorer: PhaseWeightedScorer,
}

impl UnifiedDecisionEngine {
    pub fn new(config: DecisionConfig, clock: Arc<dyn Clock>) -> Self {
        let tracker = Arc::new(PendingActionTracker::from_config(&config, clock.clone()));
        Self::with_tracker(config, clock, tracker)
    }

    /// Builds an engine sharing an existing pending registry.
    pub fn with_tracker(
        config: DecisionConfig,
        clock: Arc<dyn Clock>,
        tracker: Arc<PendingActionTracker>,
    ) -> Self {
        let detector = CombatPhaseDetector::new(&config, clock);
        let generator = CandidateGenerator::new(tracker, MovementPlanner::new(&config));
        let default_scorer = PhaseWeightedScorer::new(&config);
        Self {
            config,
            detector,
            generator,
            default_scorer,
        }
    }

    /// Replaces the weights of the scorer used when the env supplies none.
    #[must_use]
    pub fn with_weights(mut self, weights: PhaseWeightTable) -> Self {
        self.default_scorer = self.default_scorer.with_weights(weights);
        self
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn default_scorer(&self) -> &PhaseWeightedScorer {
        &self.default_scorer
    }

    pub fn detector(&self) -> &CombatPhaseDetector {
        &self.detector
    }

    pub fn tracker(&self) -> &Arc<PendingActionTracker> {
        self.generator.tracker()
    }

    pub fn planner(&self) -> &MovementPlanner {
        self.generator.planner()
    }

    // ========================================================================
    // Decisions
    // ========================================================================

    /// Decides for `agent`, analyzing the world through `env`. Never fails.
    pub fn decide_action(
        &self,
        agent: AgentId,
        turn: Option<&TurnState>,
        env: &DecisionEnv<'_>,
    ) -> ActionCandidate {
        self.try_decide_action(agent, turn, env)
            .unwrap_or_else(|err| self.fallback(agent, &err))
    }

    /// Decides over a precomputed situation. Never fails.
    ///
    /// The detected phase is written back into `situation`.
    pub fn decide_with_situation(
        &self,
        situation: &mut Situation,
        env: &DecisionEnv<'_>,
    ) -> ActionCandidate {
        let agent = situation.agent;
        self.try_decide_with_situation(situation, env)
            .unwrap_or_else(|err| self.fallback(agent, &err))
    }

    pub fn try_decide_action(
        &self,
        agent: AgentId,
        turn: Option<&TurnState>,
        env: &DecisionEnv<'_>,
    ) -> Result<ActionCandidate> {
        let mut situation = env
            .analyzer()?
            .analyze(agent, turn)?
            .ok_or(DecisionError::MissingSituation(agent))?;

        // Without a turn controller the caller's round still drives Opening.
        let env = match (turn, env.turns()) {
            (Some(turn), Err(_)) => env.with_turns(turn),
            _ => *env,
        };
        self.try_decide_with_situation(&mut situation, &env)
    }

    pub fn try_decide_with_situation(
        &self,
        situation: &mut Situation,
        env: &DecisionEnv<'_>,
    ) -> Result<ActionCandidate> {
        let selected = self.evaluate(situation, env)?.into_selection()?;
        info!("Agent {} decided: {}", situation.agent, selected);
        Ok(selected)
    }

    /// Runs the full pipeline and keeps every scored candidate.
    pub fn evaluate(&self, situation: &mut Situation, env: &DecisionEnv<'_>) -> Result<Evaluation> {
        let phase = self.classify(situation, env);
        let mut candidates = self.generate_candidates(situation, env)?;

        if candidates.iter().all(ActionCandidate::is_fallback) {
            debug!("Agent {} has no valid actions", situation.agent);
            return Ok(Evaluation {
                phase,
                candidates: vec![ActionCandidate::end_turn(NO_VALID_ACTIONS)],
                selected: 0,
            });
        }

        let scorer: &dyn CandidateScorer = match env.scorer() {
            Ok(scorer) => scorer,
            Err(_) => &self.default_scorer,
        };
        scorer.score_all(&mut candidates, situation, phase)?;
        scorer.log_top_candidates(&candidates, &format!("agent {} {}", situation.agent, phase));

        let selected = select_best(&candidates).ok_or(DecisionError::NoCandidates)?;
        Ok(Evaluation {
            phase,
            candidates,
            selected,
        })
    }

    /// Candidate generation alone, without phase detection or scoring.
    pub fn generate_candidates(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
    ) -> Result<Vec<ActionCandidate>> {
        let ctx = DecisionContext::new(situation, *env, &self.config);
        self.generator.generate(&ctx)
    }

    /// One extra retreat after the agent acted, if it is worth the move.
    pub fn plan_post_action_move(
        &self,
        situation: &Situation,
        env: &DecisionEnv<'_>,
    ) -> Option<ActionCandidate> {
        let role = situation.role.as_ref();
        match self.planner().plan_post_action_retreat(situation, env, role) {
            Ok(decision) => decision.map(ActionCandidate::movement),
            Err(err) => {
                warn!(
                    "Post-action retreat planning failed for agent {}: {}",
                    situation.agent, err
                );
                None
            }
        }
    }

    fn classify(&self, situation: &mut Situation, env: &DecisionEnv<'_>) -> CombatPhase {
        match situation.phase {
            Some(phase) if phase != CombatPhase::Midgame => phase,
            _ => {
                let phase = self.detector.detect_phase(situation, env.turns().ok());
                situation.phase = Some(phase);
                phase
            }
        }
    }

    fn fallback(&self, agent: AgentId, err: &DecisionError) -> ActionCandidate {
        let severity = err.severity();
        if severity.is_internal() {
            error!(
                "Decision for agent {} fell back to EndTurn [{} {}]: {}",
                agent,
                severity,
                err.error_code(),
                err
            );
        } else {
            warn!(
                "Decision for agent {} fell back to EndTurn [{} {}]: {}",
                agent,
                severity,
                err.error_code(),
                err
            );
        }
        ActionCandidate::end_turn(format!("Decision failed: {err}"))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Clears the real-time round estimate.
    pub fn reset_combat_tracking(&self) {
        self.detector.reset_combat_tracking();
    }

    /// Clears every piece of per-encounter state.
    pub fn end_combat(&self) {
        self.detector.reset_combat_tracking();
        self.tracker().clear();
        info!("Combat tracking reset");
    }

    /// Records that `caster` is executing `candidate`.
    pub fn commit_action(&self, caster: AgentId, candidate: &ActionCandidate) {
        if let Some((ability, target)) = pending_key(candidate) {
            self.tracker().register_pending_buff(ability, target, caster);
        }
    }

    /// Records that `candidate` landed or failed.
    pub fn complete_action(&self, candidate: &ActionCandidate) {
        if let Some((ability, target)) = pending_key(candidate) {
            self.tracker().remove_pending(ability, target);
        }
    }
}

fn pending_key(candidate: &ActionCandidate) -> Option<(AbilityId, AgentId)> {
    match (candidate.kind, candidate.ability, candidate.target) {
        (CandidateKind::Buff, Some(ability), Some(target)) => Some((ability, target)),
        _ => None,
    }
}

/// Index of the strictly greatest score; the first wins ties.
fn select_best(candidates: &[ActionCandidate]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = if candidate.score.is_finite() {
            candidate.score
        } else {
            f32::NEG_INFINITY
        };
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::providers::ai::scoring::PhaseWeights;
    use battle_core::{
        AbilityClassifier, AbilitySnapshot, ActionEconomy, AgentSnapshot, Classification,
        ManualClock, OracleError, Position, SituationAnalyzer, SituationFlags, TargetFlags,
    };

    struct Analyzer(Option<Situation>);

    impl SituationAnalyzer for Analyzer {
        fn analyze(
            &self,
            _: AgentId,
            _: Option<&TurnState>,
        ) -> std::result::Result<Option<Situation>, OracleError> {
            Ok(self.0.clone())
        }
    }

    struct Flat(f32);

    impl CandidateScorer for Flat {
        fn score_all(
            &self,
            candidates: &mut [ActionCandidate],
            _: &Situation,
            _: CombatPhase,
        ) -> std::result::Result<(), OracleError> {
            for candidate in candidates.iter_mut() {
                candidate.score = self.0;
            }
            Ok(())
        }
    }

    struct Failing;

    impl CandidateScorer for Failing {
        fn score_all(
            &self,
            _: &mut [ActionCandidate],
            _: &Situation,
            _: CombatPhase,
        ) -> std::result::Result<(), OracleError> {
            Err(OracleError::ScoringFailed("weights missing".into()))
        }
    }

    #[derive(Default)]
    struct PhaseRecorder(Mutex<Option<CombatPhase>>);

    impl PhaseRecorder {
        fn last(&self) -> Option<CombatPhase> {
            *self.0.lock().unwrap()
        }
    }

    impl CandidateScorer for PhaseRecorder {
        fn score_all(
            &self,
            candidates: &mut [ActionCandidate],
            _: &Situation,
            phase: CombatPhase,
        ) -> std::result::Result<(), OracleError> {
            *self.0.lock().unwrap() = Some(phase);
            for candidate in candidates.iter_mut() {
                candidate.score = 0.5;
            }
            Ok(())
        }
    }

    struct Classifier;

    impl AbilityClassifier for Classifier {
        fn classify(&self, _: &AbilitySnapshot, _: AgentId) -> Classification {
            Classification::default()
        }

        fn evaluate_effectiveness(&self, _: &Classification, _: &AgentSnapshot) -> f32 {
            0.5
        }

        fn is_buff_already_applied(&self, _: &AbilitySnapshot, _: AgentId) -> bool {
            false
        }
    }

    fn engine() -> UnifiedDecisionEngine {
        UnifiedDecisionEngine::new(DecisionConfig::default(), Arc::new(ManualClock::new()))
    }

    fn brawl() -> Situation {
        Situation::builder(AgentId(1))
            .hp_percent(70.0)
            .enemy(
                AgentSnapshot::new(AgentId(10), Position::new(1.0, 0.0)).with_hit_points(90, 100),
            )
            .enemy(
                AgentSnapshot::new(AgentId(11), Position::new(0.0, 1.0)).with_hit_points(90, 100),
            )
            .enemy(
                AgentSnapshot::new(AgentId(12), Position::new(9.0, 9.0)).with_hit_points(90, 100),
            )
            .hittable(AgentId(10))
            .hittable(AgentId(11))
            .build()
    }

    #[test]
    fn test_missing_analyzer_falls_back() {
        let decision = engine().decide_action(AgentId(1), None, &DecisionEnv::empty());
        assert_eq!(decision.kind, CandidateKind::EndTurn);
        assert!(decision.reason.contains("not available"));
    }

    #[test]
    fn test_missing_situation_falls_back() {
        let analyzer = Analyzer(None);
        let env = DecisionEnv::empty().with_analyzer(&analyzer);

        let engine = engine();
        assert!(matches!(
            engine.try_decide_action(AgentId(4), None, &env),
            Err(DecisionError::MissingSituation(AgentId(4)))
        ));
        assert!(engine.decide_action(AgentId(4), None, &env).is_fallback());
    }

    #[test]
    fn test_only_fallback_means_no_valid_actions() {
        let mut situation = Situation::builder(AgentId(1))
            .without_flag(SituationFlags::CAN_MOVE)
            .build();
        let decision = engine().decide_with_situation(&mut situation, &DecisionEnv::empty());

        assert_eq!(decision.kind, CandidateKind::EndTurn);
        assert_eq!(decision.reason, NO_VALID_ACTIONS);
    }

    #[test]
    fn test_ties_go_to_first_generated() {
        let scorer = Flat(1.0);
        let env = DecisionEnv::empty().with_scorer(&scorer);
        let mut situation = brawl();

        let decision = engine().decide_with_situation(&mut situation, &env);
        assert_eq!(decision.kind, CandidateKind::BasicAttack);
        assert_eq!(decision.target, Some(AgentId(10)));
    }

    #[test]
    fn test_scoring_failure_falls_back() {
        let scorer = Failing;
        let env = DecisionEnv::empty().with_scorer(&scorer);
        let mut situation = brawl();

        let decision = engine().decide_with_situation(&mut situation, &env);
        assert!(decision.is_fallback());
        assert!(decision.reason.contains("weights missing"));
    }

    #[test]
    fn test_default_scorer_when_none_supplied() {
        let mut situation = brawl();
        let evaluation = engine().evaluate(&mut situation, &DecisionEnv::empty());

        let evaluation = evaluation.ok();
        let selected = evaluation.as_ref().and_then(Evaluation::selection);
        assert_eq!(selected.map(|c| c.kind), Some(CandidateKind::BasicAttack));
        assert!(selected.is_some_and(|c| c.score > 0.05));
    }

    #[test]
    fn test_custom_weights_reach_default_scorer() {
        let melee_only = PhaseWeights {
            basic_attack: 0.0,
            ..PhaseWeights::MIDGAME
        };
        let weights = PhaseWeightTable {
            midgame: melee_only,
            ..PhaseWeightTable::default()
        };
        let engine = engine().with_weights(weights);
        assert_eq!(engine.default_scorer().weights(), &weights);

        // Basic attacks are worth nothing, so EndTurn wins.
        let mut situation = brawl();
        let evaluation = engine.evaluate(&mut situation, &DecisionEnv::empty()).ok();
        assert_eq!(evaluation.as_ref().map(|e| e.phase), Some(CombatPhase::Midgame));
        assert_eq!(
            evaluation.as_ref().and_then(Evaluation::selection).map(|c| c.kind),
            Some(CandidateKind::EndTurn)
        );
    }

    #[test]
    fn test_phase_written_back_unless_preset() {
        let engine = engine();

        let mut unset = brawl();
        engine.decide_with_situation(&mut unset, &DecisionEnv::empty());
        // Missing turn controller: Opening cannot be evaluated.
        assert_eq!(unset.phase, Some(CombatPhase::Midgame));

        let mut preset = Situation {
            phase: Some(CombatPhase::Cleanup),
            ..brawl()
        };
        engine.decide_with_situation(&mut preset, &DecisionEnv::empty());
        assert_eq!(preset.phase, Some(CombatPhase::Cleanup));

        let mut stale_default = Situation {
            hp_percent: 10.0,
            phase: Some(CombatPhase::Midgame),
            ..brawl()
        };
        engine.decide_with_situation(&mut stale_default, &DecisionEnv::empty());
        assert_eq!(stale_default.phase, Some(CombatPhase::Desperate));
    }

    #[test]
    fn test_turn_state_round_used_without_controller() {
        let engine = engine();
        let analyzer = Analyzer(Some(Situation {
            hp_percent: 100.0,
            ..brawl()
        }));
        let scorer = PhaseRecorder::default();
        let env = DecisionEnv::empty()
            .with_analyzer(&analyzer)
            .with_scorer(&scorer);

        let opening = TurnState::new(1, ActionEconomy::all());
        engine.decide_action(AgentId(1), Some(&opening), &env);
        assert_eq!(scorer.last(), Some(CombatPhase::Opening));

        let late = TurnState::new(5, ActionEconomy::all());
        engine.decide_action(AgentId(1), Some(&late), &env);
        assert_eq!(scorer.last(), Some(CombatPhase::Midgame));

        // A wired controller still takes precedence over the turn snapshot.
        let controller = TurnState::new(6, ActionEconomy::all());
        engine.decide_action(AgentId(1), Some(&opening), &env.with_turns(&controller));
        assert_eq!(scorer.last(), Some(CombatPhase::Midgame));
    }

    #[test]
    fn test_commit_and_complete_drive_pending_registry() {
        let engine = engine();
        let buff = ActionCandidate::buff(AbilityId(7), AgentId(2), 0.5, "bless");

        engine.commit_action(AgentId(1), &buff);
        assert!(engine.tracker().is_buff_pending(AbilityId(7), AgentId(2)));

        engine.complete_action(&buff);
        assert!(!engine.tracker().is_buff_pending(AbilityId(7), AgentId(2)));

        // Non-buffs never touch the registry.
        engine.commit_action(AgentId(1), &ActionCandidate::basic_attack(AgentId(2), 0.5, "hit"));
        assert!(engine.tracker().is_empty());
    }

    #[test]
    fn test_committed_buff_suppresses_other_engine() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let config = DecisionConfig::default();
        let tracker = Arc::new(PendingActionTracker::from_config(&config, clock.clone()));
        let first =
            UnifiedDecisionEngine::with_tracker(config.clone(), clock.clone(), tracker.clone());
        let second = UnifiedDecisionEngine::with_tracker(config, clock, tracker);

        let bless = AbilitySnapshot::new(AbilityId(7), "Bless", TargetFlags::ALLY);
        let situation = |agent, ally| {
            Situation::builder(AgentId(agent))
                .ally(AgentSnapshot::new(AgentId(ally), Position::new(1.0, 0.0)))
                .ally(AgentSnapshot::new(AgentId(3), Position::new(2.0, 0.0)))
                .buff(bless.clone())
                .without_flag(SituationFlags::CAN_MOVE)
                .build()
        };
        let classifier = Classifier;
        let env = DecisionEnv::empty().with_classifier(&classifier);

        let mut mine = situation(1, 2);
        let chosen = first.decide_with_situation(&mut mine, &env);
        assert_eq!(chosen.kind, CandidateKind::Buff);
        first.commit_action(AgentId(1), &chosen);

        // Agent 4 sees the same two allies; the one agent 1 is blessing is skipped.
        let theirs = situation(4, 2);
        let candidates = second.generate_candidates(&theirs, &env).unwrap_or_default();
        let targets: Vec<_> = candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Buff)
            .filter_map(|c| c.target)
            .collect();
        assert_eq!(chosen.target, Some(AgentId(2)));
        assert_eq!(targets, vec![AgentId(3)]);

        first.end_combat();
        let candidates = second.generate_candidates(&theirs, &env).unwrap_or_default();
        assert_eq!(
            candidates.iter().filter(|c| c.kind == CandidateKind::Buff).count(),
            2
        );
    }

    #[test]
    fn test_select_best_is_strict_and_skips_nan() {
        let scored = |scores: &[f32]| -> Vec<ActionCandidate> {
            scores
                .iter()
                .map(|score| ActionCandidate {
                    score: *score,
                    ..ActionCandidate::end_turn("x")
                })
                .collect()
        };
        assert_eq!(select_best(&scored(&[0.2, 0.9, 0.9, 0.1])), Some(1));
        assert_eq!(select_best(&scored(&[f32::NAN, 0.1])), Some(1));
        assert_eq!(select_best(&[]), None);
    }
}
