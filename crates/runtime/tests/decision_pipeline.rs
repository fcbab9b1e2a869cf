//! End-to-end decisions through the public engine API, with scenario
//! fixtures standing in for the host game.

use std::io::Write;
use std::sync::Arc;

use battle_ai::scenario::{PositionFixture, TurnFixture};
use battle_ai::{PendingActionTracker, Scenario, UnifiedDecisionEngine};
use battle_core::{
    AbilityId, AbilitySnapshot, AgentId, AgentSnapshot, CandidateKind, Clock, CombatPhase,
    DecisionConfig, ManualClock, Position, ScoredPosition, Situation, SituationFlags, TargetFlags,
};

fn engine(clock: Arc<ManualClock>) -> UnifiedDecisionEngine {
    UnifiedDecisionEngine::new(DecisionConfig::default(), clock)
}

fn foe(id: u32, x: f32, y: f32) -> AgentSnapshot {
    AgentSnapshot::new(AgentId(id), Position::new(x, y)).with_hit_points(100, 100)
}

fn scenario(situation: Situation) -> Scenario {
    Scenario {
        name: "test".into(),
        situation,
        turns: Some(TurnFixture {
            turn_based: true,
            round: 3,
            in_combat: true,
        }),
        ..Scenario::default()
    }
}

/// A badly hurt agent surrounded by three enemies heals itself.
#[test]
fn test_desperate_agent_heals_itself() {
    let surrounded = scenario(
        Situation::builder(AgentId(1))
            .hp_percent(20.0)
            .engaged_by(3)
            .enemy(foe(10, 1.0, 0.0))
            .enemy(foe(11, -1.0, 0.0))
            .enemy(foe(12, 0.0, 1.0))
            .hittable(AgentId(10))
            .hittable(AgentId(11))
            .hittable(AgentId(12))
            .heal(AbilitySnapshot::new(
                AbilityId(5),
                "Second Wind",
                TargetFlags::SELF,
            ))
            .build(),
    );
    let engine = engine(Arc::new(ManualClock::new()));
    let env = surrounded.env();

    let mut situation = surrounded.resolved_situation();
    let evaluation = engine
        .evaluate(&mut situation, &env)
        .expect("decision succeeds");
    assert_eq!(evaluation.phase, CombatPhase::Desperate);
    assert_eq!(
        evaluation
            .candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::BasicAttack)
            .count(),
        3
    );

    let decision = engine.decide_action(surrounded.agent(), None, &env);
    assert_eq!(decision.kind, CandidateKind::Heal);
    assert_eq!(decision.target, Some(AgentId(1)));
}

/// Nothing usable, nothing in reach, rooted: the only candidate is EndTurn.
#[test]
fn test_rooted_agent_without_options_ends_turn() {
    let rooted = scenario(
        Situation::builder(AgentId(1))
            .enemy(foe(10, 30.0, 0.0))
            .without_flag(SituationFlags::CAN_MOVE)
            .build(),
    );
    let engine = engine(Arc::new(ManualClock::new()));
    let env = rooted.env();

    let candidates = engine
        .generate_candidates(&rooted.resolved_situation(), &env)
        .expect("generation succeeds");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].kind, CandidateKind::EndTurn);

    let decision = engine.decide_action(rooted.agent(), None, &env);
    assert_eq!(decision.kind, CandidateKind::EndTurn);
    assert_eq!(decision.reason, "No valid actions");
}

/// Retreat and reposition both fire for an archer caught in melee, with
/// destinations under two units apart: only one move survives.
#[test]
fn test_near_duplicate_moves_collapse() {
    let mut cornered = scenario(
        Situation::builder(AgentId(1))
            .enemy(foe(10, 2.0, 0.0))
            .weapon_range(20.0)
            .min_safe_distance(6.0)
            .with_flag(SituationFlags::PREFERS_RANGED)
            .build(),
    );
    cornered.positions = PositionFixture {
        retreat: Some(ScoredPosition::new(Position::new(-8.0, 0.0), 0.9)),
        ranged_attack: Some(ScoredPosition::new(Position::new(-9.0, 1.0), 0.7)),
        ..PositionFixture::default()
    };
    let engine = engine(Arc::new(ManualClock::new()));

    let candidates = engine
        .generate_candidates(&cornered.resolved_situation(), &cornered.env())
        .expect("generation succeeds");
    let moves: Vec<_> = candidates
        .iter()
        .filter(|c| c.kind == CandidateKind::Move)
        .collect();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].destination, Some(Position::new(-8.0, 0.0)));
}

/// Two agents sharing a registry do not stack the same buff until the
/// first claim expires.
#[test]
fn test_pending_buff_blocks_second_caster_until_expiry() {
    let clock = Arc::new(ManualClock::new());
    let shared_clock: Arc<dyn Clock> = clock.clone();
    let config = DecisionConfig::default();
    let tracker = Arc::new(PendingActionTracker::from_config(&config, shared_clock.clone()));
    let first =
        UnifiedDecisionEngine::with_tracker(config.clone(), shared_clock.clone(), tracker.clone());
    let second = UnifiedDecisionEngine::with_tracker(config, shared_clock, tracker);

    let supporter = |agent| {
        scenario(
            Situation::builder(AgentId(agent))
                .ally(AgentSnapshot::new(AgentId(2), Position::new(1.0, 0.0)))
                .buff(AbilitySnapshot::new(AbilityId(7), "Bless", TargetFlags::ALLY))
                .without_flag(SituationFlags::CAN_MOVE)
                .build(),
        )
    };
    let cleric = supporter(1);
    let paladin = supporter(3);

    let chosen = first.decide_action(cleric.agent(), None, &cleric.env());
    assert_eq!(chosen.kind, CandidateKind::Buff);
    first.commit_action(cleric.agent(), &chosen);

    let blocked = second.decide_action(paladin.agent(), None, &paladin.env());
    assert_eq!(blocked.kind, CandidateKind::EndTurn);

    clock.advance_secs(6.0);
    let retry = second.decide_action(paladin.agent(), None, &paladin.env());
    assert_eq!(retry.kind, CandidateKind::Buff);
    assert_eq!(retry.target, Some(AgentId(2)));
}

/// Real-time combat: Opening lasts two estimated rounds and restarts after
/// the engine is told combat ended.
#[test]
fn test_realtime_opening_window() {
    let clock = Arc::new(ManualClock::new());
    let engine = engine(clock.clone());
    let mut fresh = scenario(
        Situation::builder(AgentId(1))
            .enemy(foe(10, 10.0, 0.0))
            .enemy(foe(11, 10.0, 2.0))
            .enemy(foe(12, 10.0, 4.0))
            .build(),
    );
    fresh.turns = Some(TurnFixture {
        turn_based: false,
        round: 0,
        in_combat: true,
    });
    let env = fresh.env();
    let phase = |engine: &UnifiedDecisionEngine| {
        let mut situation = fresh.resolved_situation();
        engine.evaluate(&mut situation, &env).map(|e| e.phase).ok()
    };

    assert_eq!(phase(&engine), Some(CombatPhase::Opening));
    clock.advance_secs(11.9);
    assert_eq!(phase(&engine), Some(CombatPhase::Opening));
    clock.advance_secs(0.2);
    assert_eq!(phase(&engine), Some(CombatPhase::Midgame));

    engine.end_combat();
    assert_eq!(phase(&engine), Some(CombatPhase::Opening));
}

/// Scenario files round-trip through the loader and drive a decision.
#[test]
fn test_decide_from_scenario_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"(
            name: "duel",
            situation: (
                agent: (1),
                enemies: [
                    (id: (10), position: (x: 1.0, y: 0.0), hit_points: Some((current: 10, maximum: 100)), alive: true, active_effects: []),
                ],
                hittable_enemies: [(10)],
            ),
            turns: Some((turn_based: true, round: 4, in_combat: true)),
        )"#
    )
    .expect("write scenario");

    let duel = Scenario::load_from_file(file.path()).expect("scenario loads");
    let engine = engine(Arc::new(ManualClock::new()));
    let decision = engine.decide_action(duel.agent(), None, &duel.env());

    assert_eq!(decision.kind, CandidateKind::BasicAttack);
    assert_eq!(decision.target, Some(AgentId(10)));
}

/// The sample scenario shipped with the CLI stays loadable and decidable.
#[test]
fn test_shipped_cornered_archer_scenario() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../client/cli/scenarios/cornered_archer.ron");
    let archer = Scenario::load_from_file(&path).expect("sample scenario loads");
    assert!(archer.situation.prefers_ranged());

    let engine = engine(Arc::new(ManualClock::new()));
    let env = archer.env();
    let mut situation = archer.resolved_situation();
    let evaluation = engine
        .evaluate(&mut situation, &env)
        .expect("sample scenario decides");

    assert_eq!(evaluation.phase, CombatPhase::Midgame);
    assert_eq!(evaluation.candidates.len(), 9);
    // Retreat and ranged reposition land within the dedup tolerance.
    let moves = evaluation
        .candidates
        .iter()
        .filter(|c| c.kind == CandidateKind::Move)
        .count();
    assert_eq!(moves, 1);
    assert_eq!(evaluation.candidates.last().map(|c| c.kind), Some(CandidateKind::EndTurn));
    assert_ne!(evaluation.selection().map(|c| c.kind), Some(CandidateKind::EndTurn));
}
