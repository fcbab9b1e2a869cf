use bitflags::bitflags;

bitflags! {
    /// Movement and engagement state of the acting agent.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct SituationFlags: u16 {
        const CAN_MOVE            = 1 << 0;
        const HAS_MOVED           = 1 << 1;
        const IS_ENGAGED          = 1 << 2;
        const PREFERS_RANGED      = 1 << 3;
        const IN_DANGER           = 1 << 4;
        const HAS_ATTACKED        = 1 << 5;
        const HAS_BUFFED          = 1 << 6;
        const FIRST_ACTION_DONE   = 1 << 7;
    }
}

bitflags! {
    /// Action slots the agent has left this turn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct ActionEconomy: u8 {
        const STANDARD = 1 << 0;
        const MOVE     = 1 << 1;
        const SWIFT    = 1 << 2;
    }
}

impl Default for ActionEconomy {
    fn default() -> Self {
        Self::all()
    }
}

bitflags! {
    /// Who an ability may target, plus whether it deals damage.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct TargetFlags: u8 {
        const SELF      = 1 << 0;
        const ALLY      = 1 << 1;
        const ENEMY     = 1 << 2;
        /// Usable as an attack.
        const OFFENSIVE = 1 << 3;
    }
}
