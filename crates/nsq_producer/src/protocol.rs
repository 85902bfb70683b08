//! NSQ TCP protocol framing
//!
//! Command encoding and response-frame decoding, independent of any live
//! connection so the framing is testable against plain buffers.

use bytes::{BufMut, BytesMut};
use contracts::RelayError;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Protocol magic sent once after connecting.
pub const MAGIC_V2: &[u8] = b"  V2";

pub const FRAME_TYPE_RESPONSE: u32 = 0;
pub const FRAME_TYPE_ERROR: u32 = 1;

/// Heartbeat payload nsqd sends on idle connections.
pub const HEARTBEAT: &[u8] = b"_heartbeat_";

pub const NOP: &[u8] = b"NOP\n";

/// One response frame from nsqd
#[derive(Debug, PartialEq, Eq)]
pub struct Frame {
    pub frame_type: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn is_heartbeat(&self) -> bool {
        self.frame_type == FRAME_TYPE_RESPONSE && self.data == HEARTBEAT
    }
}

/// Encode a `PUB` command: `PUB <topic>\n` + big-endian length + payload.
pub fn encode_pub(topic: &str, payload: &[u8]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(4 + topic.len() + 1 + 4 + payload.len());
    buf.put_slice(b"PUB ");
    buf.put_slice(topic.as_bytes());
    buf.put_u8(b'\n');
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    buf
}

/// Encode an `IDENTIFY` command with a JSON metadata body.
pub fn encode_identify(body: &[u8]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(9 + 4 + body.len());
    buf.put_slice(b"IDENTIFY\n");
    buf.put_u32(body.len() as u32);
    buf.put_slice(body);
    buf
}

/// Read one frame: big-endian size, 4-byte frame type, then data.
pub async fn read_frame<R>(reader: &mut R) -> Result<Frame, RelayError>
where
    R: AsyncRead + Unpin,
{
    let size = reader
        .read_u32()
        .await
        .map_err(|e| RelayError::broker_protocol(format!("reading frame size: {e}")))?;

    if size < 4 {
        return Err(RelayError::broker_protocol(format!(
            "frame size {size} below frame-type width"
        )));
    }

    let mut frame_type = [0u8; 4];
    reader
        .read_exact(&mut frame_type)
        .await
        .map_err(|e| RelayError::broker_protocol(format!("reading frame type: {e}")))?;

    let mut data = vec![0u8; size as usize - 4];
    reader
        .read_exact(&mut data)
        .await
        .map_err(|e| RelayError::broker_protocol(format!("reading frame body: {e}")))?;

    Ok(Frame {
        frame_type: u32::from_be_bytes(frame_type),
        data,
    })
}
