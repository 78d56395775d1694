//! TTL/LRU Cache - an in-process key-value cache with an HTTP front end
//!
//! Entries expire a fixed TTL after their last write and the least recently
//! used entries are evicted once the configured capacity is exceeded.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::CacheStore;
pub use config::{CacheConfig, Config};
pub use tasks::spawn_sweeper;
