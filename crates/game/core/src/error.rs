//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. [`crate::env::OracleError`]) live next to the
//! code that raises them and implement [`BattleError`] so callers can classify
//! failures uniformly. Every variant carries a stable code for logs and tests.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Temporary condition; the next decision tick may succeed.
    ///
    /// Examples: analyzer could not resolve the agent this tick
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: non-finite hit points in a snapshot
    Validation,

    /// Unexpected inconsistency that requires investigation.
    ///
    /// Examples: a collaborator returned data that violates its contract
    Internal,

    /// Misconfiguration; no decision can be made until it is fixed.
    ///
    /// Examples: scorer collaborator was never wired in
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error indicates a wiring or logic bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Shared classification for errors raised around a decision.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant; defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
