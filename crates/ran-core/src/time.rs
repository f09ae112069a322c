//! Virtual time model.
//!
//! # Design
//!
//! Virtual time is a non-negative real number of seconds, stored as an
//! integer count of nanoseconds in [`SimTime`].  Using an integer as the
//! canonical unit keeps event ordering exact (no floating-point drift in the
//! `(time, sequence)` key) while still resolving sub-microsecond radio
//! procedures.
//!
//! Public operations that take a delay in seconds convert with
//! [`SimTime::from_secs_f64`], which rejects negative, NaN, and infinite
//! values and rounds to the nearest nanosecond.

use std::fmt;

use crate::{CoreError, CoreResult};

const NANOS_PER_SEC: u64 = 1_000_000_000;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// A point (or span) of virtual time, in nanoseconds since the run started.
///
/// `u64` nanoseconds lasts ~584 years of virtual time, far longer than any
/// radio-access scenario.  Arithmetic saturates at [`SimTime::MAX`] rather
/// than wrapping.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    #[inline]
    pub const fn from_nanos(ns: u64) -> SimTime {
        SimTime(ns)
    }

    #[inline]
    pub const fn from_millis(ms: u64) -> SimTime {
        SimTime(ms.saturating_mul(1_000_000))
    }

    #[inline]
    pub const fn from_secs(s: u64) -> SimTime {
        SimTime(s.saturating_mul(NANOS_PER_SEC))
    }

    /// Convert fractional seconds, rejecting negative and non-finite values.
    pub fn from_secs_f64(secs: f64) -> CoreResult<SimTime> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(CoreError::InvalidTime(secs));
        }
        let ns = (secs * NANOS_PER_SEC as f64).round();
        if ns >= u64::MAX as f64 {
            return Ok(SimTime::MAX);
        }
        Ok(SimTime(ns as u64))
    }

    #[inline]
    pub fn as_nanos(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    #[inline]
    pub fn saturating_add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        self.saturating_add(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: SimTime) -> SimTime {
        self.saturating_since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{:.6}s", self.as_secs_f64())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically built from a scenario file by `ran-sim` and handed to every
/// component that needs a timer or a seed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Delay between `begin_attach` and discovery completion.
    pub discovery_delay: SimTime,

    /// Delay between discovery completion and attach completion.
    pub attach_delay: SimTime,

    /// Default ceiling passed to `run` when the caller gives none.
    pub stop_time: SimTime,
}

impl SimConfig {
    /// Virtual time a terminal needs from `begin_attach` to `Connected`.
    #[inline]
    pub fn attach_latency(&self) -> SimTime {
        self.discovery_delay + self.attach_delay
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.stop_time == SimTime::ZERO {
            return Err(CoreError::Config("stop_time must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:            1,
            discovery_delay: SimTime::from_millis(10),
            attach_delay:    SimTime::from_millis(15),
            stop_time:       SimTime::from_secs(10),
        }
    }
}
