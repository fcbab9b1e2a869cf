//! Decision providers for allied agents.

pub mod ai;
