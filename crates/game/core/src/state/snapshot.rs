use super::common::{AbilityId, AgentId, HitPoints, Position};
use super::flags::TargetFlags;

/// Copy of the stats the pipeline needs about another agent.
///
/// This is a handle plus cached values, not an owner; the host world model
/// keeps the agent itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Position,
    /// `None` when the analyzer could not read the agent's stats.
    pub hit_points: Option<HitPoints>,
    pub alive: bool,
    /// Abilities whose lasting effect is currently on this agent.
    pub active_effects: Vec<AbilityId>,
}

impl AgentSnapshot {
    pub fn new(id: AgentId, position: Position) -> Self {
        Self {
            id,
            position,
            hit_points: None,
            alive: true,
            active_effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hit_points(mut self, current: u32, maximum: u32) -> Self {
        self.hit_points = Some(HitPoints::new(current, maximum));
        self
    }

    #[must_use]
    pub fn with_effect(mut self, ability: AbilityId) -> Self {
        self.active_effects.push(ability);
        self
    }

    #[must_use]
    pub fn dead(mut self) -> Self {
        self.alive = false;
        self
    }

    /// HP percent, reading missing stats as healthy.
    pub fn hp_percent(&self) -> f32 {
        self.hit_points.map_or(100.0, |hp| hp.percent())
    }

    pub fn has_effect(&self, ability: AbilityId) -> bool {
        self.active_effects.contains(&ability)
    }
}

/// An ability the acting agent knows, as seen at decision time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySnapshot {
    pub id: AbilityId,
    pub name: String,
    /// Off cooldown, affordable and not blocked by conditions.
    pub available: bool,
    pub targeting: TargetFlags,
    /// Maximum cast range; `None` means unlimited.
    pub range: Option<f32>,
}

impl AbilitySnapshot {
    pub fn new(id: AbilityId, name: impl Into<String>, targeting: TargetFlags) -> Self {
        Self {
            id,
            name: name.into(),
            available: true,
            targeting,
            range: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn targets_self(&self) -> bool {
        self.targeting.contains(TargetFlags::SELF)
    }

    pub fn targets_allies(&self) -> bool {
        self.targeting.contains(TargetFlags::ALLY)
    }

    pub fn targets_enemies(&self) -> bool {
        self.targeting.contains(TargetFlags::ENEMY)
    }

    pub fn is_offensive(&self) -> bool {
        self.targeting.contains(TargetFlags::OFFENSIVE)
    }

    /// Whether a target `distance` units away is inside the cast range.
    pub fn in_range(&self, distance: f32) -> bool {
        self.range.is_none_or(|range| distance <= range)
    }
}
