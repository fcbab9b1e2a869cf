//! Traits describing the collaborators the decision pipeline consumes.
//!
//! Collaborators expose situation analysis, ability heuristics, utility
//! scoring, positional search and turn bookkeeping. The [`DecisionEnv`]
//! aggregate bundles them so the pipeline can reach everything it needs
//! without hard coupling to concrete implementations.
mod abilities;
mod analysis;
mod clock;
mod coordination;
mod error;
mod positions;
mod scoring;

pub use abilities::AbilityClassifier;
pub use analysis::SituationAnalyzer;
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordination::{FocusTarget, TurnController};
pub use error::OracleError;
pub use positions::{PositionSearch, TacticalGrid};
pub use scoring::CandidateScorer;

/// Aggregates the collaborators required by one decision.
///
/// Every collaborator is optional at construction; accessors report a
/// missing one as an [`OracleError`] so the pipeline can degrade instead of
/// panicking.
#[derive(Clone, Copy, Default)]
pub struct DecisionEnv<'a> {
    analyzer: Option<&'a dyn SituationAnalyzer>,
    classifier: Option<&'a dyn AbilityClassifier>,
    scorer: Option<&'a dyn CandidateScorer>,
    positions: Option<&'a dyn PositionSearch>,
    grid: Option<&'a dyn TacticalGrid>,
    focus: Option<&'a dyn FocusTarget>,
    turns: Option<&'a dyn TurnController>,
}

impl<'a> DecisionEnv<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: &'a dyn SituationAnalyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: &'a dyn AbilityClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: &'a dyn CandidateScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    #[must_use]
    pub fn with_positions(mut self, positions: &'a dyn PositionSearch) -> Self {
        self.positions = Some(positions);
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: &'a dyn TacticalGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_focus(mut self, focus: &'a dyn FocusTarget) -> Self {
        self.focus = Some(focus);
        self
    }

    #[must_use]
    pub fn with_turns(mut self, turns: &'a dyn TurnController) -> Self {
        self.turns = Some(turns);
        self
    }

    /// Returns the SituationAnalyzer, or an error if not available.
    pub fn analyzer(&self) -> Result<&'a dyn SituationAnalyzer, OracleError> {
        self.analyzer.ok_or(OracleError::AnalyzerNotAvailable)
    }

    /// Returns the AbilityClassifier, or an error if not available.
    pub fn classifier(&self) -> Result<&'a dyn AbilityClassifier, OracleError> {
        self.classifier.ok_or(OracleError::ClassifierNotAvailable)
    }

    /// Returns the CandidateScorer, or an error if not available.
    pub fn scorer(&self) -> Result<&'a dyn CandidateScorer, OracleError> {
        self.scorer.ok_or(OracleError::ScorerNotAvailable)
    }

    /// Returns the PositionSearch, or an error if not available.
    pub fn positions(&self) -> Result<&'a dyn PositionSearch, OracleError> {
        self.positions.ok_or(OracleError::PositionsNotAvailable)
    }

    /// Returns the TacticalGrid, or an error if not available.
    pub fn grid(&self) -> Result<&'a dyn TacticalGrid, OracleError> {
        self.grid.ok_or(OracleError::GridNotAvailable)
    }

    /// Returns the TurnController, or an error if not available.
    pub fn turns(&self) -> Result<&'a dyn TurnController, OracleError> {
        self.turns.ok_or(OracleError::TurnsNotAvailable)
    }

    /// Shared focus target, if coordination logic is wired in.
    ///
    /// Focus is advisory, so a missing source is not an error.
    pub fn focus(&self) -> Option<&'a dyn FocusTarget> {
        self.focus
    }
}
