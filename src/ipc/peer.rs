//! Scanner side of the exchange.

use anyhow::{Context, Result};
use tracing::debug;

use super::endpoint;
use super::frame;
use crate::core::Document;

/// Connect to `address`, send `document` and wait for the acknowledgment.
pub async fn deliver(address: &str, document: &Document) -> Result<()> {
    let payload = document
        .to_json()
        .context("Failed to serialize scanner document")?;
    deliver_payload(address, payload.as_bytes()).await
}

/// Send an already encoded payload.
pub async fn deliver_payload(address: &str, payload: &[u8]) -> Result<()> {
    let mut stream = endpoint::connect(address)
        .await
        .with_context(|| format!("Failed to connect to endpoint: {}", address))?;
    debug!(address, bytes = payload.len(), "connected, sending payload");

    frame::write_payload(&mut stream, payload)
        .await
        .context("Failed to send payload")?;
    frame::read_ack(&mut stream)
        .await
        .context("Server did not acknowledge the payload")?;
    Ok(())
}
