/// Coarse stage of a fight, selecting which scoring weights apply.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatPhase {
    /// First rounds of a fresh fight: set up buffs and positioning.
    Opening,
    /// Sustained trading of blows.
    #[default]
    Midgame,
    /// Few weakened enemies left: finish them.
    Cleanup,
    /// Survival is at stake.
    Desperate,
}

impl CombatPhase {
    /// Returns all phases in declaration order.
    pub const fn all() -> [CombatPhase; 4] {
        [
            CombatPhase::Opening,
            CombatPhase::Midgame,
            CombatPhase::Cleanup,
            CombatPhase::Desperate,
        ]
    }
}
