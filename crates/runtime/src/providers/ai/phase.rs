//! Combat phase classification.
//!
//! The [`CombatPhaseDetector`] maps a situation onto one of four phases. Checks
//! run in severity order (Desperate, Cleanup, Opening) and the first match
//! wins; anything else is Midgame.
//!
//! Opening depends on the current combat round. Discrete-turn hosts report it
//! directly. Real-time hosts have no round counter, so the [`RoundEstimator`]
//! watches the in-combat flag, stamps the moment combat starts, and converts
//! elapsed time into rounds of [`DecisionConfig::round_duration`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use battle_core::{
    Clock, CombatPhase, DecisionConfig, OracleError, PhaseThresholds, Situation, TurnController,
};
use tracing::{debug, info, warn};

use crate::api::{DecisionError, Result};

#[derive(Debug, Default)]
struct RealtimeCombat {
    in_combat: bool,
    started_at: Option<Duration>,
}

/// Elapsed-time round estimator for real-time combat.
///
/// State is owned explicitly and must be reset at combat boundaries so a
/// stale start time never leaks into the next encounter.
pub struct RoundEstimator {
    clock: Arc<dyn Clock>,
    round_duration: Duration,
    state: Mutex<RealtimeCombat>,
}

impl RoundEstimator {
    pub fn new(clock: Arc<dyn Clock>, round_duration: Duration) -> Self {
        Self {
            clock,
            round_duration,
            state: Mutex::new(RealtimeCombat::default()),
        }
    }

    /// Records the current in-combat flag and returns the estimated round.
    ///
    /// The start time is stamped on the not-in-combat → in-combat transition
    /// and cleared on the reverse one. Outside combat the estimate is 1.
    pub fn observe(&self, in_combat: bool) -> u32 {
        let now = self.clock.now();
        let mut state = self.lock();

        match (state.in_combat, in_combat) {
            (false, true) => {
                state.in_combat = true;
                state.started_at = Some(now);
                info!("Real-time combat started at {:.2}s", now.as_secs_f32());
            }
            (true, false) => {
                *state = RealtimeCombat::default();
                info!("Real-time combat ended at {:.2}s", now.as_secs_f32());
            }
            _ => {}
        }

        match state.started_at {
            Some(started_at) if state.in_combat => {
                rounds_elapsed(now.saturating_sub(started_at), self.round_duration)
            }
            _ => 1,
        }
    }

    /// Forgets any combat in progress.
    pub fn reset(&self) {
        *self.lock() = RealtimeCombat::default();
        debug!("Round estimator reset");
    }

    /// Clock reading when the current real-time combat started.
    pub fn combat_started_at(&self) -> Option<Duration> {
        self.lock().started_at
    }

    fn lock(&self) -> MutexGuard<'_, RealtimeCombat> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `max(1, floor(elapsed / round) + 1)`.
fn rounds_elapsed(elapsed: Duration, round_duration: Duration) -> u32 {
    if round_duration.is_zero() {
        return 1;
    }
    let completed = (elapsed.as_secs_f64() / round_duration.as_secs_f64()).floor();
    (completed as u32).saturating_add(1).max(1)
}

/// Classifies situations into [`CombatPhase`]s.
pub struct CombatPhaseDetector {
    thresholds: PhaseThresholds,
    rounds: RoundEstimator,
}

impl CombatPhaseDetector {
    pub fn new(config: &DecisionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            thresholds: config.phase.clone(),
            rounds: RoundEstimator::new(clock, config.round_duration()),
        }
    }

    /// Classifies `situation`. Never fails: internal errors degrade to Midgame.
    pub fn detect_phase(
        &self,
        situation: &Situation,
        turns: Option<&dyn TurnController>,
    ) -> CombatPhase {
        match self.try_detect_phase(situation, turns) {
            Ok(phase) => {
                debug!(
                    "Phase for agent {}: {} (hp={:.0}%, enemies={}, engaged_by={})",
                    situation.agent,
                    phase,
                    situation.hp_percent,
                    situation.living_enemy_count(),
                    situation.engaged_by_count
                );
                phase
            }
            Err(err) => {
                warn!(
                    "Phase detection for agent {} degraded to Midgame: {}",
                    situation.agent, err
                );
                CombatPhase::Midgame
            }
        }
    }

    /// Classifies `situation`, reporting why Opening could not be evaluated.
    pub fn try_detect_phase(
        &self,
        situation: &Situation,
        turns: Option<&dyn TurnController>,
    ) -> Result<CombatPhase> {
        if !situation.hp_percent.is_finite() {
            return Err(DecisionError::InvalidSituation("hp percent is not finite"));
        }

        // Observe first so the real-time estimator sees every combat
        // transition, even on ticks that resolve to Desperate or Cleanup.
        let round = self.estimate_round(turns);

        if self.is_desperate(situation) {
            return Ok(CombatPhase::Desperate);
        }
        if self.is_cleanup(situation) {
            return Ok(CombatPhase::Cleanup);
        }
        if self.is_opening(situation, round?) {
            return Ok(CombatPhase::Opening);
        }
        Ok(CombatPhase::Midgame)
    }

    /// Current round: read from the turn controller in discrete-turn mode,
    /// estimated from elapsed time otherwise.
    pub fn estimate_round(&self, turns: Option<&dyn TurnController>) -> Result<u32> {
        let turns = turns.ok_or(OracleError::TurnsNotAvailable)?;
        if turns.is_turn_based() {
            Ok(turns.current_round())
        } else {
            Ok(self.rounds.observe(turns.in_combat()))
        }
    }

    /// Clears the real-time round estimate; call when combat ends.
    pub fn reset_combat_tracking(&self) {
        self.rounds.reset();
    }

    pub fn round_estimator(&self) -> &RoundEstimator {
        &self.rounds
    }

    fn is_desperate(&self, situation: &Situation) -> bool {
        let t = &self.thresholds;
        let hp = situation.hp_percent;

        let critical = hp < t.desperate_hp;
        let swarmed = situation.engaged_by_count >= t.swarmed_engaged_count && hp < t.swarmed_hp;
        let allies_failing = situation.ally_average_hp_percent() < t.ally_average_hp;
        let outnumbered = situation.living_enemy_count() as f32
            >= t.outnumbered_ratio * (situation.living_ally_count() + 1) as f32
            && hp < t.outnumbered_hp;

        critical || swarmed || allies_failing || outnumbered
    }

    fn is_cleanup(&self, situation: &Situation) -> bool {
        let t = &self.thresholds;
        let enemies = situation.living_enemy_count();

        situation.hp_percent >= t.cleanup_min_hp
            && enemies <= t.cleanup_max_enemies
            && (enemies == 0 || situation.enemy_average_hp_percent() < t.cleanup_enemy_hp)
    }

    fn is_opening(&self, situation: &Situation, round: u32) -> bool {
        let t = &self.thresholds;
        let pinned =
            situation.is_engaged() && situation.engaged_by_count >= t.opening_engaged_count;

        round <= t.opening_max_round
            && situation.hp_percent >= t.opening_min_hp
            && !pinned
            && !situation.has_attacked()
    }
}
