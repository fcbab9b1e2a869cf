//! Decision-ready snapshot of the battlefield.
//!
//! A [`Situation`] is built by an external analyzer for one agent at one
//! decision point. Allies and enemies are referenced by [`AgentId`] handles
//! with a copy of the stats the pipeline needs; the world model owning the
//! agents lives elsewhere.
mod common;
mod flags;
mod situation;
mod snapshot;

pub use common::{AbilityId, AgentId, AgentRole, HitPoints, Position, TurnState};
pub use flags::{ActionEconomy, SituationFlags, TargetFlags};
pub use situation::{Situation, SituationBuilder};
pub use snapshot::{AbilitySnapshot, AgentSnapshot};
