//! 48-bit link-layer addresses.

use std::fmt;

/// A 48-bit MAC-style link-layer address.
///
/// Registries allocate addresses sequentially from `00:00:00:00:00:01` with
/// [`LinkAddress::from_index`], so addresses are stable for a given setup
/// order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkAddress(pub [u8; 6]);

impl LinkAddress {
    /// The address with big-endian value `n`.  Only the low 48 bits are used.
    pub fn from_index(n: u64) -> Self {
        let b = n.to_be_bytes();
        LinkAddress([b[2], b[3], b[4], b[5], b[6], b[7]])
    }

    /// Big-endian integer value of the address.
    pub fn as_u64(self) -> u64 {
        self.0.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }
}

impl fmt::Display for LinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
