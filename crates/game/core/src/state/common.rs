use std::fmt;

use super::flags::ActionEconomy;

/// Handle to an agent owned by the host world model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an ability definition owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u32);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability#{}", self.0)
    }
}

/// Continuous world position in distance units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves `length` units from `self` toward `target`.
    ///
    /// Returns `self` unchanged when the two points coincide.
    pub fn step_towards(self, target: Position, length: f32) -> Position {
        let distance = self.distance(target);
        if distance <= f32::EPSILON {
            return self;
        }
        let ratio = length / distance;
        Position::new(
            self.x + (target.x - self.x) * ratio,
            self.y + (target.y - self.y) * ratio,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Current and maximum hit points of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub current: u32,
    pub maximum: u32,
}

impl HitPoints {
    pub const fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Current HP as a percentage of maximum.
    ///
    /// A zero maximum reads as full health so a malformed stat block never
    /// looks like a dying agent.
    pub fn percent(&self) -> f32 {
        if self.maximum == 0 {
            return 100.0;
        }
        self.current as f32 * 100.0 / self.maximum as f32
    }
}

/// Tactical role of the acting agent, used to label decisions.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AgentRole {
    /// Deals damage from the back or the flank.
    Damage,
    /// Holds the line and soaks attention.
    Tank,
    /// Heals and buffs the party.
    Support,
    /// No dedicated role.
    #[default]
    Generalist,
}

/// Turn-mode bookkeeping handed to the situation analyzer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Current discrete round (1-based).
    pub round: u32,
    /// Action slots still unspent this turn.
    pub economy: ActionEconomy,
}

impl TurnState {
    pub const fn new(round: u32, economy: ActionEconomy) -> Self {
        Self { round, economy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_step_towards() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(10.0, 0.0);
        let step = from.step_towards(to, 6.0);
        assert!((step.x - 6.0).abs() < 1e-5);
        assert!(step.y.abs() < 1e-5);
        assert_eq!(from.step_towards(from, 6.0), from);
    }

    #[test]
    fn test_hit_points_percent() {
        assert!((HitPoints::new(25, 50).percent() - 50.0).abs() < 1e-5);
        assert_eq!(HitPoints::new(0, 0).percent(), 100.0);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("support".parse::<AgentRole>().ok(), Some(AgentRole::Support));
        assert_eq!(AgentRole::Tank.to_string(), "tank");
    }
}
