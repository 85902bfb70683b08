//! NsqProducer - publish-only nsqd connection

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use contracts::{PublishSink, RelayError};

use crate::protocol::{
    encode_identify, encode_pub, read_frame, Frame, FRAME_TYPE_ERROR, FRAME_TYPE_RESPONSE,
    MAGIC_V2, NOP,
};

/// Producer connection to one nsqd daemon
///
/// Holds the TCP connection for its lifetime; `close` drops it and further
/// publishes fail. Reconnecting is the caller's business.
#[derive(Debug)]
pub struct NsqProducer {
    addr: String,
    stream: Option<TcpStream>,
}

impl NsqProducer {
    /// Connect to nsqd and identify this client
    ///
    /// # Errors
    /// Connection refusal, a rejected `IDENTIFY`, or malformed broker data.
    #[instrument(name = "nsq_producer_connect")]
    pub async fn connect(addr: &str) -> Result<Self, RelayError> {
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|e| RelayError::broker_connection(addr, e.to_string()))?;

        stream
            .write_all(MAGIC_V2)
            .await
            .map_err(|e| RelayError::broker_connection(addr, e.to_string()))?;

        let identify = serde_json::json!({
            "client_id": "logrelay",
            "user_agent": concat!("logrelay/", env!("CARGO_PKG_VERSION")),
            "feature_negotiation": false,
        });
        let body = serde_json::to_vec(&identify)
            .map_err(|e| RelayError::broker_protocol(e.to_string()))?;
        stream
            .write_all(&encode_identify(&body))
            .await
            .map_err(|e| RelayError::broker_connection(addr, e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| RelayError::broker_connection(addr, e.to_string()))?;

        let frame = await_response(&mut stream).await?;
        match frame.frame_type {
            FRAME_TYPE_RESPONSE if frame.data == b"OK" => {}
            FRAME_TYPE_ERROR => {
                return Err(RelayError::broker_connection(
                    addr,
                    String::from_utf8_lossy(&frame.data).into_owned(),
                ));
            }
            other => {
                return Err(RelayError::broker_protocol(format!(
                    "unexpected frame type {other} after IDENTIFY"
                )));
            }
        }

        debug!(addr, "NSQ producer connected");

        Ok(Self {
            addr: addr.to_string(),
            stream: Some(stream),
        })
    }

    fn stream(&mut self) -> Result<&mut TcpStream, RelayError> {
        let addr = self.addr.clone();
        self.stream
            .as_mut()
            .ok_or_else(|| RelayError::broker_connection(addr, "connection already closed"))
    }
}

impl PublishSink for NsqProducer {
    fn name(&self) -> &str {
        "nsqd"
    }

    #[instrument(
        name = "nsq_producer_publish",
        skip(self, payload),
        fields(addr = %self.addr, bytes = payload.len())
    )]
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), RelayError> {
        let stream = self.stream()?;

        let buf = encode_pub(topic, payload);
        stream
            .write_all(&buf)
            .await
            .map_err(|e| RelayError::broker_publish(topic, e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| RelayError::broker_publish(topic, e.to_string()))?;

        let frame = await_response(stream).await?;
        match frame.frame_type {
            FRAME_TYPE_RESPONSE if frame.data == b"OK" => {
                debug!(topic, "Published");
                Ok(())
            }
            FRAME_TYPE_ERROR => Err(RelayError::broker_publish(
                topic,
                String::from_utf8_lossy(&frame.data).into_owned(),
            )),
            other => Err(RelayError::broker_protocol(format!(
                "unexpected frame type {other} after PUB"
            ))),
        }
    }

    #[instrument(name = "nsq_producer_close", skip(self), fields(addr = %self.addr))]
    async fn close(&mut self) -> Result<(), RelayError> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
            debug!("NSQ producer closed");
        }
        Ok(())
    }
}

/// Read the next non-heartbeat frame, answering heartbeats with `NOP`.
async fn await_response(stream: &mut TcpStream) -> Result<Frame, RelayError> {
    loop {
        let frame = read_frame(stream).await?;
        if frame.is_heartbeat() {
            stream
                .write_all(NOP)
                .await
                .map_err(|e| RelayError::broker_protocol(format!("answering heartbeat: {e}")))?;
            stream
                .flush()
                .await
                .map_err(|e| RelayError::broker_protocol(format!("answering heartbeat: {e}")))?;
            continue;
        }
        return Ok(frame);
    }
}
