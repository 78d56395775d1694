//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweeper: Removes expired cache entries at a fixed interval until cancelled

mod sweeper;

pub use sweeper::spawn_sweeper;
