//! Wire framing for one scanner exchange.
//!
//! ```text
//! peer   -> server   4 bytes   little-endian i32 payload length L
//! peer   -> server   L bytes   UTF-8 JSON document
//! server -> peer     1 byte    acknowledgment
//! ```

use std::io;

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const HEADER_SIZE: usize = 4;

/// Upper bound on a payload length prefix (64 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Value of the acknowledgment byte. Peers must accept any value.
pub const ACK: u8 = 0;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("connection closed before the length prefix was sent")]
    ClosedBeforePrefix,
    #[error("connection closed inside the {0}")]
    Truncated(&'static str),
    #[error("invalid payload length {0}")]
    InvalidLength(i64),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read one length-prefixed payload.
pub async fn read_payload<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, FrameError> {
    let mut header = [0u8; HEADER_SIZE];
    let first = reader.read(&mut header).await?;
    if first == 0 {
        return Err(FrameError::ClosedBeforePrefix);
    }
    reader
        .read_exact(&mut header[first..])
        .await
        .map_err(|e| eof_as(e, "length prefix"))?;

    let length = decode_length(&header)?;
    let mut payload = vec![0u8; length];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| eof_as(e, "payload"))?;
    Ok(payload)
}

/// Write one length-prefixed payload.
pub async fn write_payload<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::InvalidLength(payload.len() as i64));
    }
    let mut header = [0u8; HEADER_SIZE];
    LittleEndian::write_i32(&mut header, payload.len() as i32);
    writer.write_all(&header).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn write_ack<W: AsyncWrite + Unpin>(writer: &mut W) -> io::Result<()> {
    writer.write_all(&[ACK]).await?;
    writer.flush().await
}

pub async fn read_ack<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u8, FrameError> {
    reader
        .read_u8()
        .await
        .map_err(|e| eof_as(e, "acknowledgment"))
}

fn decode_length(header: &[u8; HEADER_SIZE]) -> Result<usize, FrameError> {
    let length = LittleEndian::read_i32(header);
    if length < 0 || length as usize > MAX_PAYLOAD_SIZE {
        return Err(FrameError::InvalidLength(length as i64));
    }
    Ok(length as usize)
}

fn eof_as(err: io::Error, part: &'static str) -> FrameError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        FrameError::Truncated(part)
    } else {
        FrameError::Io(err)
    }
}
