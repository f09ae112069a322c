//! `PhyCache`: append-only packet logs keyed by device.

use std::collections::BTreeMap;
use std::fmt;

use ran_core::{DeviceId, PacketId, SimTime};
use tracing::trace;

use crate::{CacheEntry, Direction};

/// Per-device ordered packet log.
///
/// Entries are appended with the caller's current scheduler time.  Because
/// the scheduler clock never decreases, each device's log is ordered by
/// timestamp as well as by append order.
#[derive(Default, Debug)]
pub struct PhyCache {
    logs: BTreeMap<DeviceId, Vec<CacheEntry>>,
}

impl PhyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to `device`'s log.  Always succeeds.
    pub fn record(
        &mut self,
        device:    DeviceId,
        packet:    PacketId,
        size:      u32,
        direction: Direction,
        now:       SimTime,
    ) {
        debug_assert!(
            self.logs
                .get(&device)
                .and_then(|log| log.last())
                .is_none_or(|last| last.timestamp <= now),
            "cache timestamps must be non-decreasing"
        );
        trace!(%device, %packet, size, %direction, time = %now, "phy record");
        self.logs.entry(device).or_default().push(CacheEntry {
            packet,
            timestamp: now,
            size,
            direction,
        });
    }

    /// Read-only view of `device`'s log in append order.  Devices that never
    /// saw a packet yield an empty slice.
    pub fn snapshot(&self, device: DeviceId) -> &[CacheEntry] {
        self.logs.get(&device).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Display adaptor printing `device`'s log one entry per line.
    pub fn dump(&self, device: DeviceId) -> CacheDump<'_> {
        CacheDump { device, entries: self.snapshot(device) }
    }

    // ── Counters ──────────────────────────────────────────────────────────

    /// Entries logged for `device`.
    pub fn len(&self, device: DeviceId) -> usize {
        self.snapshot(device).len()
    }

    /// `true` if no device has logged anything.
    pub fn is_empty(&self) -> bool {
        self.logs.values().all(Vec::is_empty)
    }

    pub fn count(&self, device: DeviceId, direction: Direction) -> usize {
        self.snapshot(device).iter().filter(|e| e.direction == direction).count()
    }

    /// Bytes logged for `device` in `direction`.
    pub fn bytes(&self, device: DeviceId, direction: Direction) -> u64 {
        self.snapshot(device)
            .iter()
            .filter(|e| e.direction == direction)
            .map(|e| u64::from(e.size))
            .sum()
    }

    /// Devices with a non-empty log, in id order.
    pub fn devices(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.logs.iter().filter(|(_, log)| !log.is_empty()).map(|(&id, _)| id)
    }

    /// Entries across every device.
    pub fn total(&self) -> usize {
        self.logs.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }
}

// ── CacheDump ─────────────────────────────────────────────────────────────────

/// Borrowed view rendering one device's log:
///
/// ```text
/// DeviceId(1): 2 entries
///   +1.000000s rx PacketId(0) 512B
///   +2.000000s rx PacketId(1) 512B
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CacheDump<'a> {
    device:  DeviceId,
    entries: &'a [CacheEntry],
}

impl fmt::Display for CacheDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} entries", self.device, self.entries.len())?;
        for entry in self.entries {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}
