//! Recorded battle snapshots and the fixture collaborators that replay them.
//!
//! A [`Scenario`] is a RON document holding one agent's [`Situation`] plus
//! enough canned collaborator answers (classifications, positional search
//! results, blocked cells, turn mode) to run a full decision offline. The
//! scenario itself implements every collaborator trait, so
//! [`Scenario::env`] is all a caller needs to drive the engine.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{
    AbilityCategory, AbilityClassifier, AbilityId, AbilitySnapshot, AgentId, AgentSnapshot,
    Classification, DecisionEnv, FocusTarget, OracleError, Position, PositionSearch, SaveKind,
    ScoredPosition, Situation, SituationAnalyzer, SituationFlags, TacticalGrid, TurnController,
    TurnState,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::ConfigError;

/// Potency assumed for abilities without a recorded classification.
const DEFAULT_POTENCY: f32 = 0.5;

/// Effectiveness multiplier against a target strong in the ability's save.
const STRONG_SAVE_FACTOR: f32 = 0.5;

/// Destinations closer than this to a blocked cell are rejected.
const BLOCKED_RADIUS: f32 = 0.5;

/// Host turn mode recorded with a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFixture {
    pub turn_based: bool,
    pub round: u32,
    pub in_combat: bool,
}

impl Default for TurnFixture {
    fn default() -> Self {
        Self {
            turn_based: true,
            round: 1,
            in_combat: true,
        }
    }
}

impl TurnController for TurnFixture {
    fn is_turn_based(&self) -> bool {
        self.turn_based
    }

    fn current_round(&self) -> u32 {
        self.round
    }

    fn in_combat(&self) -> bool {
        self.in_combat
    }
}

/// Canned positional search answers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionFixture {
    pub retreat: Option<ScoredPosition>,
    pub ranged_attack: Option<ScoredPosition>,
    pub approach: Option<ScoredPosition>,
    pub melee_attack: Option<ScoredPosition>,
}

/// One recorded decision point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub situation: Situation,

    /// `None` leaves the engine without a turn controller.
    pub turns: Option<TurnFixture>,
    pub focus: Option<AgentId>,

    /// Classifier verdicts by ability.
    pub classifications: BTreeMap<AbilityId, Classification>,
    /// Per-target effectiveness multiplier (1.0 when absent).
    pub target_modifiers: BTreeMap<AgentId, f32>,
    /// Saves each target is strong in.
    pub strong_saves: BTreeMap<AgentId, Vec<SaveKind>>,
    /// Lasting effects currently on the acting agent.
    pub self_effects: Vec<AbilityId>,

    pub positions: PositionFixture,
    /// Cells the tactical grid refuses as destinations.
    pub blocked: Vec<Position>,
}

impl Scenario {
    /// Loads a scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_ron_str(&content)?;
        debug!("Loaded scenario '{}' from {}", scenario.name, path.display());
        Ok(scenario)
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn agent(&self) -> AgentId {
        self.situation.agent
    }

    /// Collaborators backed by this scenario. No scorer is attached, so the
    /// engine's default scorer ranks the candidates.
    pub fn env(&self) -> DecisionEnv<'_> {
        let env = DecisionEnv::empty()
            .with_analyzer(self)
            .with_classifier(self)
            .with_positions(self)
            .with_grid(self)
            .with_focus(self);
        match &self.turns {
            Some(turns) => env.with_turns(turns),
            None => env,
        }
    }

    /// The recorded situation with derived fields filled in.
    ///
    /// Hand-written scenarios rarely list the nearest enemy or the engaged
    /// flag, so both are derived from the roster when missing.
    pub fn resolved_situation(&self) -> Situation {
        let mut situation = self.situation.clone();

        if situation.nearest_enemy.is_none() {
            let origin = situation.position;
            let nearest = situation
                .living_enemies()
                .map(|enemy| (enemy.id, origin.distance(enemy.position)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((id, distance)) = nearest {
                situation.nearest_enemy = Some(id);
                situation.nearest_enemy_distance = distance;
            }
        }
        if situation.engaged_by_count > 0 {
            situation.flags.insert(SituationFlags::IS_ENGAGED);
        }
        situation
    }

    fn target_has_effect(&self, ability: AbilityId, target: AgentId) -> bool {
        if target == self.situation.agent {
            return self.self_effects.contains(&ability);
        }
        self.situation
            .allies
            .iter()
            .chain(self.situation.enemies.iter())
            .any(|agent| agent.id == target && agent.has_effect(ability))
    }
}

impl SituationAnalyzer for Scenario {
    fn analyze(
        &self,
        agent: AgentId,
        turn: Option<&TurnState>,
    ) -> Result<Option<Situation>, OracleError> {
        if agent != self.situation.agent {
            return Err(OracleError::AgentNotFound(agent));
        }

        let mut situation = self.resolved_situation();
        if let Some(turn) = turn {
            situation.economy = turn.economy;
        }
        Ok(Some(situation))
    }
}

impl AbilityClassifier for Scenario {
    fn classify(&self, ability: &AbilitySnapshot, _caster: AgentId) -> Classification {
        self.classifications.get(&ability.id).copied().unwrap_or_else(|| {
            let category = if ability.is_offensive() {
                AbilityCategory::Damage
            } else {
                AbilityCategory::Utility
            };
            Classification::new(category, SaveKind::None, DEFAULT_POTENCY)
        })
    }

    fn evaluate_effectiveness(
        &self,
        classification: &Classification,
        target: &AgentSnapshot,
    ) -> f32 {
        let modifier = self.target_modifiers.get(&target.id).copied().unwrap_or(1.0);
        let strong = classification.save != SaveKind::None
            && self
                .strong_saves
                .get(&target.id)
                .is_some_and(|saves| saves.contains(&classification.save));
        let save_factor = if strong { STRONG_SAVE_FACTOR } else { 1.0 };

        (classification.potency * modifier * save_factor).clamp(0.0, 1.0)
    }

    fn is_buff_already_applied(&self, ability: &AbilitySnapshot, target: AgentId) -> bool {
        self.target_has_effect(ability.id, target)
    }
}

impl PositionSearch for Scenario {
    fn find_retreat_position(&self, _situation: &Situation) -> Option<ScoredPosition> {
        self.positions.retreat
    }

    fn find_ranged_attack_position(
        &self,
        _situation: &Situation,
        _target: &AgentSnapshot,
    ) -> Option<ScoredPosition> {
        self.positions.ranged_attack
    }

    fn find_approach_position(
        &self,
        _situation: &Situation,
        _target: &AgentSnapshot,
    ) -> Option<ScoredPosition> {
        self.positions.approach
    }

    fn find_melee_attack_position(
        &self,
        _situation: &Situation,
        _target: &AgentSnapshot,
    ) -> Option<ScoredPosition> {
        self.positions.melee_attack
    }
}

impl TacticalGrid for Scenario {
    fn validate_target_position(&self, _agent: AgentId, destination: Position) -> bool {
        !self
            .blocked
            .iter()
            .any(|cell| cell.distance(destination) < BLOCKED_RADIUS)
    }
}

impl FocusTarget for Scenario {
    fn current_focus(&self) -> Option<AgentId> {
        self.focus
    }
}
