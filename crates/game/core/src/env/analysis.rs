use super::error::OracleError;
use crate::state::{AgentId, Situation, TurnState};

/// Turns raw world state into a decision-ready [`Situation`].
pub trait SituationAnalyzer {
    /// Builds the snapshot for `agent`.
    ///
    /// Returns `Ok(None)` when the agent cannot act right now (dead, removed
    /// from the encounter, not under AI control).
    fn analyze(
        &self,
        agent: AgentId,
        turn: Option<&TurnState>,
    ) -> Result<Option<Situation>, OracleError>;
}
