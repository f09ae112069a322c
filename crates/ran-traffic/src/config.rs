//! Flow configuration.

use ran_core::{DeviceId, SimRng, SimTime};

use crate::{TrafficError, TrafficResult};

/// Payload size used when a flow does not set one.
pub const DEFAULT_PACKET_SIZE: u32 = 512;

/// Length of one on or off period, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OnOffTime {
    /// The same length every period.
    Constant(f64),
    /// Drawn uniformly from `[min, max]` each period.
    Uniform { min: f64, max: f64 },
}

impl OnOffTime {
    /// Check the bounds are finite, non-negative, and ordered.
    pub fn validate(&self) -> TrafficResult<()> {
        match *self {
            OnOffTime::Constant(secs) => check_secs(secs),
            OnOffTime::Uniform { min, max } => {
                check_secs(min)?;
                check_secs(max)?;
                if min > max {
                    return Err(TrafficError::InvalidRange { min, max });
                }
                Ok(())
            }
        }
    }

    /// Longest period this setting can produce.
    pub fn max_secs(&self) -> f64 {
        match *self {
            OnOffTime::Constant(secs)      => secs,
            OnOffTime::Uniform { max, .. } => max,
        }
    }

    /// Draw one period length.  Constant settings never touch `rng`.
    pub fn sample(&self, rng: &mut SimRng) -> TrafficResult<SimTime> {
        let secs = match *self {
            OnOffTime::Constant(secs) => secs,
            OnOffTime::Uniform { min, max } if min < max => rng.gen_range(min..=max),
            OnOffTime::Uniform { min, .. } => min,
        };
        to_time(secs)
    }
}

impl Default for OnOffTime {
    fn default() -> Self {
        OnOffTime::Constant(1.0)
    }
}

fn to_time(secs: f64) -> TrafficResult<SimTime> {
    SimTime::from_secs_f64(secs).map_err(|_| TrafficError::InvalidDelay(secs))
}

fn check_secs(secs: f64) -> TrafficResult<()> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(TrafficError::InvalidDelay(secs));
    }
    Ok(())
}

// ── OnOffConfig ───────────────────────────────────────────────────────────────

/// One on/off flow from `source` to `dest`.
///
/// `start` and `stop` are absolute virtual times.  A packet is sent at the
/// beginning of every on period that starts strictly before `stop`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnOffConfig {
    pub source:      DeviceId,
    pub dest:        DeviceId,
    pub start:       SimTime,
    pub stop:        SimTime,
    pub on:          OnOffTime,
    pub off:         OnOffTime,
    /// Bytes per packet.
    pub packet_size: u32,
}

impl OnOffConfig {
    /// A flow with one-second constant on periods, no off periods, and
    /// [`DEFAULT_PACKET_SIZE`] packets.
    pub fn new(source: DeviceId, dest: DeviceId, start: SimTime, stop: SimTime) -> Self {
        Self {
            source,
            dest,
            start,
            stop,
            on:          OnOffTime::Constant(1.0),
            off:         OnOffTime::Constant(0.0),
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }

    pub fn with_on_off(mut self, on: OnOffTime, off: OnOffTime) -> Self {
        self.on = on;
        self.off = off;
        self
    }

    pub fn with_packet_size(mut self, bytes: u32) -> Self {
        self.packet_size = bytes;
        self
    }

    /// # Errors
    ///
    /// - [`TrafficError::InvalidDelay`] / [`TrafficError::InvalidRange`] for
    ///   malformed on or off settings.
    /// - [`TrafficError::EmptyPeriod`] if the longest possible on + off
    ///   period rounds to zero nanoseconds, which would send forever without
    ///   advancing the clock.
    pub fn validate(&self) -> TrafficResult<()> {
        self.on.validate()?;
        self.off.validate()?;
        let longest = to_time(self.on.max_secs())? + to_time(self.off.max_secs())?;
        if longest == SimTime::ZERO {
            return Err(TrafficError::EmptyPeriod);
        }
        Ok(())
    }
}
