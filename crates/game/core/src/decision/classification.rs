/// Broad effect family of an ability, as reported by the classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityCategory {
    #[default]
    Damage,
    Control,
    Buff,
    Heal,
    Debuff,
    Utility,
}

/// Saving throw a target rolls against an ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SaveKind {
    #[default]
    None,
    Fortitude,
    Reflex,
    Will,
}

/// Classifier verdict for one ability in the hands of one caster.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Classification {
    pub category: AbilityCategory,
    pub save: SaveKind,
    /// Expected potency before the target's resistances (0.0-1.0).
    pub potency: f32,
}

impl Classification {
    pub const fn new(category: AbilityCategory, save: SaveKind, potency: f32) -> Self {
        Self {
            category,
            save,
            potency,
        }
    }
}
