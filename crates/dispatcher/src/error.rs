//! Dispatcher error types

use contracts::RelayError;
use thiserror::Error;

/// Per-line dispatch errors
///
/// The dispatcher reports how many bytes the line stood for together with
/// what went wrong; [`DispatchError::bytes_written`] recovers the count on
/// the error path. A failed publish reports the attempted payload size, a
/// failed mirror write reports zero.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Writing the unfiltered mirror to the error console failed
    #[error("mirror write failed: {0}")]
    Mirror(#[source] std::io::Error),

    /// The broker rejected or failed the publish
    #[error("publish of {bytes} bytes to topic '{topic}' failed: {source}")]
    Publish {
        topic: String,
        bytes: usize,
        #[source]
        source: RelayError,
    },
}

impl DispatchError {
    /// Bytes reported for the failed dispatch
    pub fn bytes_written(&self) -> usize {
        match self {
            Self::Mirror(_) => 0,
            Self::Publish { bytes, .. } => *bytes,
        }
    }
}
