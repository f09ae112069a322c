//! Event ordering key and the handle returned to schedulers' callers.

use ran_core::SimTime;

/// Key for ordering events in the queue.
///
/// Events are ordered by:
/// 1. Time (earlier first)
/// 2. Sequence number (FIFO for events at the same time)
///
/// The derived `Ord` compares fields in declaration order, which is exactly
/// this ordering.  Sequence numbers are unique per scheduler, so two keys are
/// never equal unless they name the same event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    /// When this event should be executed.
    pub time: SimTime,
    /// Monotonically increasing insertion counter.
    pub seq: u64,
}

/// Opaque reference to a scheduled event, used to cancel it.
///
/// Handles stay valid forever: once the event has executed or been canceled,
/// the handle simply no longer matches anything in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventHandle(pub(crate) EventKey);

impl EventHandle {
    /// Virtual time the event was scheduled for.
    #[inline]
    pub fn time(self) -> SimTime {
        self.0.time
    }
}
