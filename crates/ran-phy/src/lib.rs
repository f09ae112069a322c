//! `ran-phy`: the per-device physical-layer packet log.
//!
//! # Crate layout
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`entry`] | `CacheEntry`, `Direction`                         |
//! | [`cache`] | `PhyCache`, the `CacheDump` display adaptor       |
//!
//! The cache is a passive diagnostic record.  It never rejects a write and
//! never evicts: every packet a device sends or receives stays in its log
//! until the cache is cleared.

pub mod cache;
pub mod entry;


pub use cache::{CacheDump, PhyCache};
pub use entry::{CacheEntry, Direction};
