//! # NSQ Producer
//!
//! Producer-side connection to an nsqd daemon.
//!
//! Speaks the minimal subset of the NSQ TCP protocol a publisher needs:
//! protocol magic, `IDENTIFY`, `PUB`, and `NOP` replies to heartbeats. One
//! publish is one round trip; there is no pipelining, batching, or retry.

mod producer;
mod protocol;

pub use producer::NsqProducer;
