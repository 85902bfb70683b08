//! # Dispatcher
//!
//! Per-line dispatch module.
//!
//! Responsibilities:
//! - Mirror incoming lines to the error console when enabled
//! - Evaluate the configured line filter
//! - Echo qualifying lines to stdout when enabled
//! - Publish qualifying lines to the broker topic
//!
//! One line is processed at a time; `write` takes `&mut self`, so one line's
//! mirror/filter/echo/publish sequence can never interleave with another's.

pub mod dispatcher;
pub mod error;
pub mod metrics;

pub use contracts::PublishSink;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::DispatchError;
