//! `Scheduler<E>`: virtual clock plus a `(time, seq)`-ordered event queue.
//!
//! # Queue layout
//!
//! Keying the queue by [`EventKey`] gives O(log n) insert, pop-earliest, and
//! cancel-by-key with no tombstones: canceling removes the entry, and a
//! handle whose event already ran simply finds nothing to remove.  Ties at
//! the same virtual time fall back to the sequence number, so replaying the
//! same scheduling calls always reproduces the same execution order.

use std::collections::BTreeMap;

use ran_core::SimTime;
use tracing::{debug, trace};

use crate::{EventHandle, EventKey, SchedError, SchedResult};

/// Counters describing one call to [`Scheduler::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Events executed during this call.
    pub executed: u64,
    /// Clock value when the call returned.
    pub last_time: SimTime,
    /// `true` if [`Scheduler::stop`] ended the call before the ceiling.
    pub stopped_early: bool,
}

/// The discrete-event scheduler.
///
/// One instance per run, owned by the orchestrator and passed by `&mut` into
/// every handler invocation.  Nothing here is global.
#[derive(Debug)]
pub struct Scheduler<E> {
    queue: BTreeMap<EventKey, E>,
    now: SimTime,
    next_seq: u64,
    /// Events executed over the scheduler's whole lifetime.
    executed: u64,
    stop_requested: bool,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            queue:          BTreeMap::new(),
            now:            SimTime::ZERO,
            next_seq:       0,
            executed:       0,
            stop_requested: false,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    /// Current virtual time.  Never decreases.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Schedule `event` to execute `delay_secs` seconds after `now`.
    ///
    /// # Errors
    ///
    /// [`SchedError::InvalidDelay`] if `delay_secs` is negative, NaN, or
    /// infinite.
    pub fn schedule(&mut self, delay_secs: f64, event: E) -> SchedResult<EventHandle> {
        let delay = SimTime::from_secs_f64(delay_secs)
            .map_err(|_| SchedError::InvalidDelay(delay_secs))?;
        Ok(self.schedule_in(delay, event))
    }

    /// Schedule `event` at `now + delay`.  Infallible: `SimTime` cannot be
    /// negative.
    pub fn schedule_in(&mut self, delay: SimTime, event: E) -> EventHandle {
        let key = EventKey { time: self.now + delay, seq: self.next_seq };
        self.next_seq += 1;
        self.queue.insert(key, event);
        EventHandle(key)
    }

    /// Schedule `event` at absolute time `at`.
    ///
    /// # Errors
    ///
    /// [`SchedError::InThePast`] if `at < now`.
    pub fn schedule_at(&mut self, at: SimTime, event: E) -> SchedResult<EventHandle> {
        if at < self.now {
            return Err(SchedError::InThePast { at, now: self.now });
        }
        Ok(self.schedule_in(at - self.now, event))
    }

    /// Schedule `event` at the current time, after everything already queued
    /// for `now`.
    #[inline]
    pub fn schedule_now(&mut self, event: E) -> EventHandle {
        self.schedule_in(SimTime::ZERO, event)
    }

    /// Make a not-yet-executed event inert.
    ///
    /// Returns the removed payload, or `None` if the event already executed
    /// or was already canceled (a no-op in both cases).
    pub fn cancel(&mut self, handle: EventHandle) -> Option<E> {
        self.queue.remove(&handle.0)
    }

    /// `true` if `handle` names an event that has neither run nor been canceled.
    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.queue.contains_key(&handle.0)
    }

    // ── Queue inspection ─────────────────────────────────────────────────

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time of the earliest pending event, or `None` if the queue is empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.queue.keys().next().map(|k| k.time)
    }

    /// Total events executed since construction.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Ask [`run`][Self::run] to return before executing another event.
    ///
    /// From inside a handler this ends the current call once the handler
    /// finishes.  Outside `run` the request is kept, and the next call
    /// returns before executing anything.  Either way the request is
    /// consumed by the call that honors it, and pending events stay queued.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    /// Execute events in `(time, seq)` order until the queue is empty, the
    /// next event lies beyond `stop_time`, or a handler calls
    /// [`stop`][Self::stop].
    ///
    /// The clock is set to each event's time before its handler runs, so
    /// nested scheduling is relative to the event being executed.  Events
    /// beyond `stop_time` stay queued; a later call resumes from them.
    ///
    /// A stop requested before the call is honored at once: the call returns
    /// with `executed == 0` and `stopped_early` set.
    ///
    /// # Errors
    ///
    /// The first handler error ends the run and is returned as-is.  The
    /// failing event has already been consumed.
    pub fn run<F, X>(&mut self, stop_time: SimTime, mut handler: F) -> Result<RunStats, X>
    where
        F: FnMut(&mut Self, E) -> Result<(), X>,
    {
        let mut stats = RunStats::default();

        loop {
            if self.stop_requested {
                self.stop_requested = false;
                stats.stopped_early = true;
                break;
            }
            let Some((&key, _)) = self.queue.first_key_value() else { break };
            if key.time > stop_time {
                debug!(
                    remaining_events = self.queue.len(),
                    stop_time = %stop_time,
                    "stop time reached"
                );
                break;
            }

            let Some(event) = self.queue.remove(&key) else { break };
            debug_assert!(key.time >= self.now, "virtual time went backwards");
            self.now = key.time;
            trace!(time = %key.time, seq = key.seq, "executing event");

            handler(self, event)?;
            self.executed += 1;
            stats.executed += 1;
        }

        stats.last_time = self.now;
        Ok(stats)
    }

    /// Drop every pending event.  The clock and sequence counter are kept so
    /// virtual time stays monotonic if the scheduler is reused.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
