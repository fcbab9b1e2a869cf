use crate::state::{AgentId, TurnState};

/// Cross-agent focus target maintained by external coordination logic.
pub trait FocusTarget {
    fn current_focus(&self) -> Option<AgentId>;
}

/// Host turn system.
pub trait TurnController {
    /// True in discrete-turn mode, false in continuous real-time mode.
    fn is_turn_based(&self) -> bool;

    /// Current round in discrete-turn mode (1-based).
    fn current_round(&self) -> u32;

    /// Whether an encounter is in progress.
    fn in_combat(&self) -> bool;
}

/// A bare turn snapshot stands in for the host turn system when none is
/// wired: discrete turns, in combat, at the recorded round.
impl TurnController for TurnState {
    fn is_turn_based(&self) -> bool {
        true
    }

    fn current_round(&self) -> u32 {
        self.round
    }

    fn in_combat(&self) -> bool {
        true
    }
}
