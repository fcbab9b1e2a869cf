//! Cross-agent registry of buffs that have been issued but not yet landed.
//!
//! Several agents can decide to cast the same buff on the same target within
//! the window between "action issued" and "effect visible in the world
//! model". The generator consults this registry before proposing a buff; the
//! execution layer registers a claim when it commits one and removes it once
//! the effect lands or the action fails.
//!
//! Entries expire after a TTL. Expired entries are evicted lazily: any lookup
//! may trigger a sweep, but sweeps run at most once per sweep interval.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use battle_core::{AbilityId, AgentId, Clock, DecisionConfig};
use tracing::{debug, info, trace};

/// A claim that `caster` is applying `ability` to `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingEntry {
    pub ability: AbilityId,
    pub target: AgentId,
    pub caster: AgentId,
    pub started_at: Duration,
    pub expires_at: Duration,
}

#[derive(Debug, Default)]
struct Registry {
    entries: HashMap<(AbilityId, AgentId), PendingEntry>,
    last_sweep: Option<Duration>,
}

impl Registry {
    /// Evicts expired entries unless a sweep ran within `interval`.
    fn sweep_if_due(&mut self, now: Duration, interval: Duration) {
        let due = self
            .last_sweep
            .is_none_or(|last| now.saturating_sub(last) >= interval);
        if !due {
            return;
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.last_sweep = Some(now);

        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!("Evicted {} expired pending buff(s)", evicted);
        }
    }
}

/// Shared pending-buff registry.
///
/// Owned explicitly and shared through an `Arc` by every engine that drives
/// agents of the same encounter.
pub struct PendingActionTracker {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    sweep_interval: Duration,
    inner: Mutex<Registry>,
}

impl PendingActionTracker {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            clock,
            ttl,
            sweep_interval,
            inner: Mutex::new(Registry::default()),
        }
    }

    pub fn from_config(config: &DecisionConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(clock, config.pending_ttl(), config.pending_sweep_interval())
    }

    /// Whether any caster has a pending claim on (`ability`, `target`).
    pub fn is_buff_pending(&self, ability: AbilityId, target: AgentId) -> bool {
        self.lookup(ability, target).is_some()
    }

    /// Whether a caster other than `caster` has a pending claim.
    pub fn is_buff_pending_by_other(
        &self,
        ability: AbilityId,
        target: AgentId,
        caster: AgentId,
    ) -> bool {
        self.lookup(ability, target)
            .is_some_and(|entry| entry.caster != caster)
    }

    /// Records a claim, replacing any existing one for the same pair.
    pub fn register_pending_buff(&self, ability: AbilityId, target: AgentId, caster: AgentId) {
        let now = self.clock.now();
        let entry = PendingEntry {
            ability,
            target,
            caster,
            started_at: now,
            expires_at: now.saturating_add(self.ttl),
        };

        let replaced = self.lock().entries.insert((ability, target), entry);
        trace!(
            "Registered pending {} on {} by {} (replaced: {})",
            ability,
            target,
            caster,
            replaced.is_some()
        );
    }

    /// Drops the claim on (`ability`, `target`), returning it if present.
    pub fn remove_pending(&self, ability: AbilityId, target: AgentId) -> Option<PendingEntry> {
        let removed = self.lock().entries.remove(&(ability, target));
        if removed.is_some() {
            trace!("Removed pending {} on {}", ability, target);
        }
        removed
    }

    /// Drops every claim. Call at session start and when combat ends.
    pub fn clear(&self) {
        let mut registry = self.lock();
        let dropped = registry.entries.len();
        *registry = Registry::default();
        info!("Pending action registry cleared ({} entries)", dropped);
    }

    /// Current claim on (`ability`, `target`), subject to the lazy sweep.
    pub fn entry(&self, ability: AbilityId, target: AgentId) -> Option<PendingEntry> {
        self.lookup(ability, target)
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, ability: AbilityId, target: AgentId) -> Option<PendingEntry> {
        let now = self.clock.now();
        let mut registry = self.lock();
        registry.sweep_if_due(now, self.sweep_interval);
        registry.entries.get(&(ability, target)).copied()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
