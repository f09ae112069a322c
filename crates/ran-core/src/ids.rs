//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Registries hand them out densely
//! from zero, so `id.index()` is a valid `Vec` index into the owning store.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a node in the topology registry.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a network device in the topology registry.
    pub struct DeviceId(u32);
}

typed_id! {
    /// Run-unique data bearer identifier.  Never reused after deactivation.
    pub struct BearerId(u32);
}

typed_id! {
    /// Index of a traffic flow in the traffic generator.
    pub struct FlowId(u32);
}

typed_id! {
    /// Run-unique packet identifier, shared by the `tx` and `rx` cache entries
    /// of the same transmission.
    pub struct PacketId(u64);
}
