//! Dispatcher - per-line mirror/filter/echo/publish sequencing

use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use contracts::{PublishSink, RelayConfig, RelayError};
use filtering::LineFilter;

use crate::error::DispatchError;
use crate::metrics;

/// Console destination for the mirror and echo stages
pub type ConsoleWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Dispatcher configuration
///
/// Built once at startup and owned by the dispatcher for its lifetime.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Topic qualifying lines are published under
    pub topic: String,
    /// Mirror every line, unfiltered, to the error console
    pub mirror_stderr: bool,
    /// Echo qualifying lines to stdout
    pub debug_echo: bool,
}

impl DispatcherConfig {
    /// Extract the dispatch-relevant part of a [`RelayConfig`]
    pub fn from_relay_config(cfg: &RelayConfig) -> Self {
        Self {
            topic: cfg.topic.clone(),
            mirror_stderr: cfg.stderr_mirror,
            debug_echo: cfg.debug_echo,
        }
    }
}

/// The per-line dispatcher
///
/// Sequencing per line: mirror (optional) -> filter -> echo (optional) ->
/// publish. All writes are awaited in order; nothing from one line overlaps
/// with the next. `write` requires `&mut self`, so exclusive access is the
/// synchronization discipline; there is no internal locking.
pub struct Dispatcher<S> {
    config: DispatcherConfig,
    filter: LineFilter,
    sink: S,
    mirror: ConsoleWriter,
    echo: ConsoleWriter,
}

impl<S: PublishSink> Dispatcher<S> {
    /// Create a dispatcher writing to the process stderr/stdout
    pub fn new(config: DispatcherConfig, filter: LineFilter, sink: S) -> Self {
        Self::with_writers(
            config,
            filter,
            sink,
            Box::new(io::stderr()),
            Box::new(io::stdout()),
        )
    }

    /// Create a dispatcher with custom console writers (for testing)
    pub fn with_writers(
        config: DispatcherConfig,
        filter: LineFilter,
        sink: S,
        mirror: ConsoleWriter,
        echo: ConsoleWriter,
    ) -> Self {
        Self {
            config,
            filter,
            sink,
            mirror,
            echo,
        }
    }

    /// Dispatch one line
    ///
    /// Returns the number of bytes handed to the broker, `Ok(0)` when the
    /// line was empty or rejected by the filter. A mirror failure aborts the
    /// line before the filter runs; an echo failure is best-effort and never
    /// propagated.
    #[instrument(
        name = "dispatcher_write",
        skip(self, line),
        fields(sink = %self.sink.name(), len = line.len())
    )]
    pub async fn write(&mut self, line: &[u8]) -> Result<usize, DispatchError> {
        if line.is_empty() {
            return Ok(0);
        }

        metrics::record_line(line.len());

        if self.config.mirror_stderr {
            if let Err(e) = write_line(&mut self.mirror, line).await {
                metrics::record_mirror_error();
                return Err(DispatchError::Mirror(e));
            }
        }

        if !self.filter.evaluate(line) {
            metrics::record_filtered_out();
            debug!("Line rejected by filter");
            return Ok(0);
        }

        if self.config.debug_echo {
            // Diagnostic only; a broken stdout must not cost us the publish.
            if let Err(e) = write_line(&mut self.echo, line).await {
                warn!(error = %e, "Debug echo write failed");
            }
        }

        match self.sink.publish(&self.config.topic, line).await {
            Ok(()) => {
                metrics::record_published(line.len());
                Ok(line.len())
            }
            Err(source) => {
                metrics::record_publish_error();
                Err(DispatchError::Publish {
                    topic: self.config.topic.clone(),
                    bytes: line.len(),
                    source,
                })
            }
        }
    }

    /// Shut the dispatcher down, closing the broker connection
    ///
    /// Consumes the dispatcher: close runs exactly once and no write can
    /// follow it.
    #[instrument(name = "dispatcher_stop", skip(self), fields(sink = %self.sink.name()))]
    pub async fn stop(mut self) -> Result<(), RelayError> {
        info!("Dispatcher stopping");
        self.sink.close().await
    }
}

/// Write `line` plus a trailing separator as one buffer and flush.
async fn write_line<W: AsyncWrite + Send + Unpin + ?Sized>(
    writer: &mut W,
    line: &[u8],
) -> std::io::Result<()> {
    let mut framed = Vec::with_capacity(line.len() + 1);
    framed.extend_from_slice(line);
    framed.push(b'\n');
    writer.write_all(&framed).await?;
    writer.flush().await
}
