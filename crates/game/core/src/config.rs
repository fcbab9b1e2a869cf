//! Tunable parameters for the decision pipeline.
//!
//! Distances are in world distance units, durations in seconds and HP values
//! in percent (0-100). The tolerances here were tuned empirically against
//! live encounters, so they are exposed rather than baked into the pipeline.

use core::time::Duration;

/// Decision pipeline configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DecisionConfig {
    /// Length of one discrete combat round, used to estimate rounds in real-time mode.
    pub round_duration_secs: f32,

    /// How long a pending buff claim blocks duplicates before it expires.
    pub pending_ttl_secs: f32,

    /// Minimum spacing between lazy sweeps of the pending registry.
    pub pending_sweep_interval_secs: f32,

    /// Slack added to weapon range when emitting basic attacks.
    pub basic_attack_tolerance: f32,

    /// Two move destinations closer than this are treated as the same move.
    pub move_dedup_tolerance: f32,

    /// Destinations closer than this to the agent are "already there".
    pub min_move_distance: f32,

    /// Length of the direct fallback step a melee agent takes toward its target.
    pub melee_step_distance: f32,

    /// Distance a post-action retreat must gain to be worth the action.
    pub post_action_retreat_gain: f32,

    /// Debuffs at or below this effectiveness are not proposed.
    pub debuff_threshold: f32,

    /// Allies at or above this HP percent are not offered heals.
    pub ally_heal_threshold: f32,

    /// Number of ranked candidates written to the debug log per decision.
    pub top_candidates_logged: usize,

    /// Phase classification thresholds.
    pub phase: PhaseThresholds,
}

impl DecisionConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROUND_DURATION_SECS: f32 = 6.0;
    pub const DEFAULT_PENDING_TTL_SECS: f32 = 5.0;
    pub const DEFAULT_PENDING_SWEEP_INTERVAL_SECS: f32 = 1.0;
    pub const DEFAULT_BASIC_ATTACK_TOLERANCE: f32 = 1.0;
    pub const DEFAULT_MOVE_DEDUP_TOLERANCE: f32 = 2.0;
    pub const DEFAULT_MIN_MOVE_DISTANCE: f32 = 1.0;
    pub const DEFAULT_MELEE_STEP_DISTANCE: f32 = 6.0;
    pub const DEFAULT_POST_ACTION_RETREAT_GAIN: f32 = 2.0;
    pub const DEFAULT_DEBUFF_THRESHOLD: f32 = 0.3;
    pub const DEFAULT_ALLY_HEAL_THRESHOLD: f32 = 80.0;
    pub const DEFAULT_TOP_CANDIDATES_LOGGED: usize = 5;

    pub fn new() -> Self {
        Self {
            round_duration_secs: Self::DEFAULT_ROUND_DURATION_SECS,
            pending_ttl_secs: Self::DEFAULT_PENDING_TTL_SECS,
            pending_sweep_interval_secs: Self::DEFAULT_PENDING_SWEEP_INTERVAL_SECS,
            basic_attack_tolerance: Self::DEFAULT_BASIC_ATTACK_TOLERANCE,
            move_dedup_tolerance: Self::DEFAULT_MOVE_DEDUP_TOLERANCE,
            min_move_distance: Self::DEFAULT_MIN_MOVE_DISTANCE,
            melee_step_distance: Self::DEFAULT_MELEE_STEP_DISTANCE,
            post_action_retreat_gain: Self::DEFAULT_POST_ACTION_RETREAT_GAIN,
            debuff_threshold: Self::DEFAULT_DEBUFF_THRESHOLD,
            ally_heal_threshold: Self::DEFAULT_ALLY_HEAL_THRESHOLD,
            top_candidates_logged: Self::DEFAULT_TOP_CANDIDATES_LOGGED,
            phase: PhaseThresholds::default(),
        }
    }

    pub fn round_duration(&self) -> Duration {
        seconds(self.round_duration_secs)
    }

    pub fn pending_ttl(&self) -> Duration {
        seconds(self.pending_ttl_secs)
    }

    pub fn pending_sweep_interval(&self) -> Duration {
        seconds(self.pending_sweep_interval_secs)
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Thresholds used by the combat phase classifier.
///
/// Checks run Desperate → Cleanup → Opening; the first match wins.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PhaseThresholds {
    /// Desperate below this self HP percent, unconditionally.
    pub desperate_hp: f32,
    /// Desperate when engaged by at least this many enemies...
    pub swarmed_engaged_count: u32,
    /// ...while below this self HP percent.
    pub swarmed_hp: f32,
    /// Desperate when the living allies' average HP percent drops below this.
    pub ally_average_hp: f32,
    /// Desperate when enemies outnumber `ratio × (allies + 1)`...
    pub outnumbered_ratio: f32,
    /// ...while below this self HP percent.
    pub outnumbered_hp: f32,

    /// Cleanup requires at least this self HP percent.
    pub cleanup_min_hp: f32,
    /// Cleanup requires at most this many living enemies.
    pub cleanup_max_enemies: usize,
    /// Cleanup requires the living enemies' average HP percent below this.
    pub cleanup_enemy_hp: f32,

    /// Opening lasts through this (estimated) round.
    pub opening_max_round: u32,
    /// Opening requires at least this self HP percent.
    pub opening_min_hp: f32,
    /// Opening is lost once engaged by this many enemies.
    pub opening_engaged_count: u32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            desperate_hp: 25.0,
            swarmed_engaged_count: 3,
            swarmed_hp: 50.0,
            ally_average_hp: 35.0,
            outnumbered_ratio: 2.0,
            outnumbered_hp: 60.0,
            cleanup_min_hp: 50.0,
            cleanup_max_enemies: 2,
            cleanup_enemy_hp: 40.0,
            opening_max_round: 2,
            opening_min_hp: 80.0,
            opening_engaged_count: 2,
        }
    }
}

/// Converts a seconds value to a `Duration`, treating negative or NaN as zero.
fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::ZERO)
}
