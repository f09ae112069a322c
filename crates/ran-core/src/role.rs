//! Device role tag.
//!
//! Devices carry an explicit role instead of being narrowed to a
//! terminal-specific type at runtime; components check the tag before acting.

/// What a network device is in the radio-access scenario.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceRole {
    /// Fixed device that terminals attach to.
    BaseStation,
    /// Mobile device that discovers and attaches to a base station.
    Terminal,
}

impl DeviceRole {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, DeviceRole::Terminal)
    }

    /// Human-readable label, useful for diagnostic tables.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceRole::BaseStation => "base-station",
            DeviceRole::Terminal    => "terminal",
        }
    }
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
