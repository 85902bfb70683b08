//! PublishSink trait - Dispatcher output interface
//!
//! Defines the abstract interface to the message broker.

use crate::RelayError;

/// Broker output trait
///
/// A live producer connection to the message broker. The dispatcher issues
/// publish calls and one terminal close; it does not manage reconnection or
/// retries on behalf of the sink.
#[trait_variant::make(PublishSink: Send)]
pub trait LocalPublishSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Publish one payload to the given topic
    ///
    /// # Errors
    /// Returns the broker's error; a failed publish is not retried here.
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), RelayError>;

    /// Close the broker connection
    ///
    /// Must be called exactly once, after which no further publishes are
    /// issued.
    async fn close(&mut self) -> Result<(), RelayError>;
}
