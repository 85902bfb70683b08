//! # Contracts
//!
//! Frozen interface contracts, defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are
//! prohibited.
//!
//! ## Data Model
//! - A log line is one record: a borrowed byte slice, never retained past one
//!   dispatch call
//! - `RelayConfig` is assembled once at startup and never mutated afterwards

mod config;
mod error;
mod sink;

pub use config::RelayConfig;
pub use error::*;
pub use sink::*;
