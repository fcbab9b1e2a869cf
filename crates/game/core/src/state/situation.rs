use std::collections::BTreeMap;

use super::common::{AbilityId, AgentId, AgentRole, Position};
use super::flags::{ActionEconomy, SituationFlags};
use super::snapshot::{AbilitySnapshot, AgentSnapshot};
use crate::decision::{CombatPhase, SaveKind};

/// Point-in-time snapshot of the battlefield for one acting agent.
///
/// The snapshot is immutable for the duration of a decision except for
/// [`Situation::phase`], which the phase detector fills in when unset.
///
/// `allies` never contains the acting agent; abilities that may target the
/// agent itself say so through [`crate::TargetFlags::SELF`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Situation {
    pub agent: AgentId,
    pub role: AgentRole,
    pub position: Position,
    pub hp_percent: f32,
    /// Number of enemies currently engaging the agent.
    pub engaged_by_count: u32,

    pub allies: Vec<AgentSnapshot>,
    pub enemies: Vec<AgentSnapshot>,

    pub attacks: Vec<AbilitySnapshot>,
    pub buffs: Vec<AbilitySnapshot>,
    pub heals: Vec<AbilitySnapshot>,
    pub debuffs: Vec<AbilitySnapshot>,

    /// Enemies the agent can hit without moving.
    pub hittable_enemies: Vec<AgentId>,
    pub nearest_enemy: Option<AgentId>,
    pub nearest_enemy_distance: f32,
    /// Target the analyzer scored highest, if it scored any.
    pub best_target: Option<AgentId>,

    pub weapon_range: f32,
    pub min_safe_distance: f32,

    pub flags: SituationFlags,
    /// Saving throw each debuff is resisted with.
    pub debuff_saves: BTreeMap<AbilityId, SaveKind>,
    pub economy: ActionEconomy,

    /// Classified phase; `None` until the detector runs.
    pub phase: Option<CombatPhase>,
}

impl Default for Situation {
    fn default() -> Self {
        Self {
            agent: AgentId::default(),
            role: AgentRole::default(),
            position: Position::ORIGIN,
            hp_percent: 100.0,
            engaged_by_count: 0,
            allies: Vec::new(),
            enemies: Vec::new(),
            attacks: Vec::new(),
            buffs: Vec::new(),
            heals: Vec::new(),
            debuffs: Vec::new(),
            hittable_enemies: Vec::new(),
            nearest_enemy: None,
            nearest_enemy_distance: f32::INFINITY,
            best_target: None,
            weapon_range: 1.5,
            min_safe_distance: 0.0,
            flags: SituationFlags::CAN_MOVE,
            debuff_saves: BTreeMap::new(),
            economy: ActionEconomy::all(),
            phase: None,
        }
    }
}

impl Situation {
    pub fn builder(agent: AgentId) -> SituationBuilder {
        SituationBuilder::new(agent)
    }

    // ========================================================================
    // Roster queries
    // ========================================================================

    /// Living enemies, in snapshot order.
    pub fn living_enemies(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.enemies.iter().filter(|enemy| enemy.alive)
    }

    /// Living allies other than the acting agent.
    pub fn living_allies(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.allies
            .iter()
            .filter(move |ally| ally.alive && ally.id != self.agent)
    }

    pub fn living_enemy_count(&self) -> usize {
        self.living_enemies().count()
    }

    pub fn living_ally_count(&self) -> usize {
        self.living_allies().count()
    }

    pub fn has_living_enemies(&self) -> bool {
        self.living_enemies().next().is_some()
    }

    /// Whether any enemy in `hittable_enemies` is still alive.
    pub fn has_hittable_enemies(&self) -> bool {
        self.hittable_enemies
            .iter()
            .any(|id| self.enemy(*id).is_some_and(|enemy| enemy.alive))
    }

    pub fn enemy(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn ally(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.allies.iter().find(|ally| ally.id == id)
    }

    /// Snapshot of the nearest enemy, if it is still alive.
    pub fn nearest_enemy_snapshot(&self) -> Option<&AgentSnapshot> {
        self.nearest_enemy
            .and_then(|id| self.enemy(id))
            .filter(|enemy| enemy.alive)
    }

    /// Average HP percent over living allies; 100 when there are none.
    pub fn ally_average_hp_percent(&self) -> f32 {
        average_hp(self.living_allies()).unwrap_or(100.0)
    }

    /// Average HP percent over living enemies; 0 when there are none.
    pub fn enemy_average_hp_percent(&self) -> f32 {
        average_hp(self.living_enemies()).unwrap_or(0.0)
    }

    pub fn distance_to(&self, position: Position) -> f32 {
        self.position.distance(position)
    }

    // ========================================================================
    // Flag accessors
    // ========================================================================

    pub fn can_move(&self) -> bool {
        self.flags.contains(SituationFlags::CAN_MOVE)
    }

    pub fn has_moved(&self) -> bool {
        self.flags.contains(SituationFlags::HAS_MOVED)
    }

    pub fn is_engaged(&self) -> bool {
        self.flags.contains(SituationFlags::IS_ENGAGED)
    }

    pub fn prefers_ranged(&self) -> bool {
        self.flags.contains(SituationFlags::PREFERS_RANGED)
    }

    pub fn is_in_danger(&self) -> bool {
        self.flags.contains(SituationFlags::IN_DANGER)
    }

    pub fn has_attacked(&self) -> bool {
        self.flags.contains(SituationFlags::HAS_ATTACKED)
    }

    pub fn has_buffed(&self) -> bool {
        self.flags.contains(SituationFlags::HAS_BUFFED)
    }
}

fn average_hp<'a>(agents: impl Iterator<Item = &'a AgentSnapshot>) -> Option<f32> {
    let (sum, count) = agents.fold((0.0_f32, 0_u32), |(sum, count), agent| {
        (sum + agent.hp_percent(), count + 1)
    });
    (count > 0).then(|| sum / count as f32)
}

/// Builder for [`Situation`], used by analyzers and tests.
#[derive(Clone, Debug)]
pub struct SituationBuilder {
    situation: Situation,
}

impl SituationBuilder {
    pub fn new(agent: AgentId) -> Self {
        Self {
            situation: Situation {
                agent,
                ..Situation::default()
            },
        }
    }

    #[must_use]
    pub fn role(mut self, role: AgentRole) -> Self {
        self.situation.role = role;
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.situation.position = position;
        self
    }

    #[must_use]
    pub fn hp_percent(mut self, hp_percent: f32) -> Self {
        self.situation.hp_percent = hp_percent;
        self
    }

    #[must_use]
    pub fn engaged_by(mut self, count: u32) -> Self {
        self.situation.engaged_by_count = count;
        if count > 0 {
            self.situation.flags.insert(SituationFlags::IS_ENGAGED);
        }
        self
    }

    #[must_use]
    pub fn ally(mut self, ally: AgentSnapshot) -> Self {
        self.situation.allies.push(ally);
        self
    }

    /// Adds an enemy and refreshes the nearest-enemy fields.
    #[must_use]
    pub fn enemy(mut self, enemy: AgentSnapshot) -> Self {
        let distance = self.situation.position.distance(enemy.position);
        if enemy.alive && distance < self.situation.nearest_enemy_distance {
            self.situation.nearest_enemy = Some(enemy.id);
            self.situation.nearest_enemy_distance = distance;
        }
        self.situation.enemies.push(enemy);
        self
    }

    #[must_use]
    pub fn hittable(mut self, enemy: AgentId) -> Self {
        self.situation.hittable_enemies.push(enemy);
        self
    }

    #[must_use]
    pub fn best_target(mut self, enemy: AgentId) -> Self {
        self.situation.best_target = Some(enemy);
        self
    }

    #[must_use]
    pub fn attack(mut self, ability: AbilitySnapshot) -> Self {
        self.situation.attacks.push(ability);
        self
    }

    #[must_use]
    pub fn buff(mut self, ability: AbilitySnapshot) -> Self {
        self.situation.buffs.push(ability);
        self
    }

    #[must_use]
    pub fn heal(mut self, ability: AbilitySnapshot) -> Self {
        self.situation.heals.push(ability);
        self
    }

    #[must_use]
    pub fn debuff(mut self, ability: AbilitySnapshot, save: SaveKind) -> Self {
        self.situation.debuff_saves.insert(ability.id, save);
        self.situation.debuffs.push(ability);
        self
    }

    #[must_use]
    pub fn weapon_range(mut self, range: f32) -> Self {
        self.situation.weapon_range = range;
        self
    }

    #[must_use]
    pub fn min_safe_distance(mut self, distance: f32) -> Self {
        self.situation.min_safe_distance = distance;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: SituationFlags) -> Self {
        self.situation.flags = flags;
        self
    }

    #[must_use]
    pub fn with_flag(mut self, flag: SituationFlags) -> Self {
        self.situation.flags.insert(flag);
        self
    }

    #[must_use]
    pub fn without_flag(mut self, flag: SituationFlags) -> Self {
        self.situation.flags.remove(flag);
        self
    }

    #[must_use]
    pub fn economy(mut self, economy: ActionEconomy) -> Self {
        self.situation.economy = economy;
        self
    }

    #[must_use]
    pub fn phase(mut self, phase: CombatPhase) -> Self {
        self.situation.phase = Some(phase);
        self
    }

    pub fn build(self) -> Situation {
        self.situation
    }
}
