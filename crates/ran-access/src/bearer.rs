//! Data bearers and the `BearerManager`.

use std::collections::BTreeMap;

use ran_core::{BearerId, DeviceId, SimTime};
use tracing::debug;

use crate::{AccessError, AccessResult, AttachMachine, QosClass};

/// Data radio bearers a single terminal may hold at once.
pub const MAX_BEARERS_PER_TERMINAL: usize = 11;

/// A logical data channel bound to one connected terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bearer {
    pub id:           BearerId,
    pub terminal:     DeviceId,
    pub qos:          QosClass,
    /// Committed (guaranteed) bit rate, fixed by the QoS class.
    pub guaranteed:   bool,
    pub activated_at: SimTime,
}

/// Creates and tracks bearers for every terminal.
///
/// Bearers live in a `BTreeMap` keyed by id, so per-terminal listings come
/// out in activation order.  Ids are never reused within a run.
#[derive(Default, Debug)]
pub struct BearerManager {
    bearers: BTreeMap<BearerId, Bearer>,
    next_id: u32,
}

impl BearerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a bearer of class `qos` on `terminal`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotConnected`] unless the terminal is `Connected`.
    /// - [`AccessError::TooManyBearers`] once the terminal holds
    ///   [`MAX_BEARERS_PER_TERMINAL`].
    pub fn activate(
        &mut self,
        attach:   &AttachMachine,
        terminal: DeviceId,
        qos:      QosClass,
        now:      SimTime,
    ) -> AccessResult<BearerId> {
        if !attach.is_connected(terminal) {
            return Err(AccessError::NotConnected(terminal));
        }
        if self.count_for(terminal) >= MAX_BEARERS_PER_TERMINAL {
            return Err(AccessError::TooManyBearers(terminal));
        }

        let id = BearerId(self.next_id);
        self.next_id += 1;
        self.bearers.insert(id, Bearer {
            id,
            terminal,
            qos,
            guaranteed: qos.is_gbr(),
            activated_at: now,
        });
        debug!(%terminal, bearer = %id, %qos, "bearer activated");
        Ok(id)
    }

    /// Remove bearer `id`.  Idempotent: unknown or already-removed ids are a
    /// no-op returning `None`.
    pub fn deactivate(&mut self, id: BearerId) -> Option<Bearer> {
        self.bearers.remove(&id)
    }

    /// Remove every bearer owned by `terminal`, returning their ids.
    pub fn release_all(&mut self, terminal: DeviceId) -> Vec<BearerId> {
        let ids = self.bearers_of(terminal);
        for id in &ids {
            self.bearers.remove(id);
        }
        ids
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Bearers owned by `terminal`, in activation order.
    pub fn bearers_of(&self, terminal: DeviceId) -> Vec<BearerId> {
        self.iter_for(terminal).map(|b| b.id).collect()
    }

    /// `true` if `terminal` holds at least one bearer.  Traffic gating check.
    pub fn has_bearer(&self, terminal: DeviceId) -> bool {
        self.iter_for(terminal).next().is_some()
    }

    pub fn get(&self, id: BearerId) -> Option<&Bearer> {
        self.bearers.get(&id)
    }

    pub fn count_for(&self, terminal: DeviceId) -> usize {
        self.iter_for(terminal).count()
    }

    /// Total active bearers across all terminals.
    pub fn len(&self) -> usize {
        self.bearers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bearers.is_empty()
    }

    pub fn clear(&mut self) {
        self.bearers.clear();
    }

    fn iter_for(&self, terminal: DeviceId) -> impl Iterator<Item = &Bearer> + '_ {
        self.bearers.values().filter(move |b| b.terminal == terminal)
    }
}
