//! Public API surface.
//!
//! Gathers the types exposed to consumers so the pipeline modules can stay
//! focused on decision logic.

pub mod errors;

pub use errors::{ConfigError, DecisionError, Result};
