//! Cache Module
//!
//! Provides the size-bounded decoded-buffer cache with ordered eviction.

mod entry;
mod size;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use size::{estimate_bytes, estimate_kb, BYTES_PER_SAMPLE};
pub use stats::CacheStats;
pub use store::{oldest_first, Admission, CacheStore, EvictionOrder};
