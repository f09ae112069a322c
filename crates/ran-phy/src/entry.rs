//! One logged packet.

use std::fmt;

use ran_core::{PacketId, SimTime};

/// Whether a packet left or arrived at the device.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Tx,
    Rx,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Tx => "tx",
            Direction::Rx => "rx",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A packet observed at the physical layer of one device.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheEntry {
    pub packet:    PacketId,
    /// Scheduler time of the `record` call.
    pub timestamp: SimTime,
    /// Payload size in bytes.
    pub size:      u32,
    pub direction: Direction,
}

impl fmt::Display for CacheEntry {
    /// `+1.000000s tx PacketId(0) 512B`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}B", self.timestamp, self.direction, self.packet, self.size)
    }
}
