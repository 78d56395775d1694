//! Cache Module
//!
//! In-memory key-value storage with TTL expiration and LRU eviction.

mod clock;
mod expiry;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use expiry::ExpirationIndex;
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
