use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error};

use super::endpoint::Endpoint;
use super::frame::{self, FrameError};
use crate::core::Document;
use crate::error::{ExtractError, ExtractResult};
use crate::process::{ExitSignal, ProcessExit, ScannerProcess};

/// How long to wait for the exit signal after a peer hung up without sending.
const PEER_EXIT_SETTLE: Duration = Duration::from_millis(500);

/// Single-use server side of one scanner exchange.
///
/// The endpoint is bound before the scanner is launched, so the peer always
/// connects to a name that is already listening. [`IpcChannel::retrieve`]
/// consumes the channel; the endpoint is closed on every exit path.
#[derive(Debug)]
pub struct IpcChannel {
    endpoint: Endpoint,
}

impl IpcChannel {
    pub fn bind(name: &str) -> ExtractResult<Self> {
        Ok(Self {
            endpoint: Endpoint::bind(name)?,
        })
    }

    pub fn address(&self) -> &str {
        self.endpoint.address()
    }

    /// Launch the scanner through `launch` and receive its document.
    ///
    /// `launch` gets the endpoint address to hand to the scanner. Resolves
    /// with `CancelledByPeerExit` if the scanner exits before its payload has
    /// been read; there is no timeout otherwise.
    pub async fn retrieve<F>(self, launch: F) -> ExtractResult<Option<Document>>
    where
        F: FnOnce(&str) -> ExtractResult<ScannerProcess>,
    {
        let mut endpoint = self.endpoint;
        let process = launch(endpoint.address())?;

        let received = exchange(&mut endpoint, &process).await;

        drop(endpoint);
        process.dispose().await;

        Document::parse(&received?)
    }
}

async fn exchange(endpoint: &mut Endpoint, process: &ScannerProcess) -> ExtractResult<Vec<u8>> {
    let mut exit = process.exit_signal();

    let mut stream = tokio::select! {
        biased;
        stream = endpoint.accept() => stream?,
        exit = exit.exited() => return Err(peer_exited(process.program(), exit)),
    };
    debug!(program = process.program(), "peer connected");

    receive(&mut stream, exit, process.program()).await
}

/// Read the framed payload and acknowledge it, racing every read against
/// the peer's exit.
async fn receive<S>(stream: &mut S, mut exit: ExitSignal, program: &str) -> ExtractResult<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let read = tokio::select! {
        biased;
        read = frame::read_payload(&mut *stream) => read,
        exit = exit.exited() => return Err(peer_exited(program, exit)),
    };

    let payload = match read {
        Ok(payload) => payload,
        Err(FrameError::ClosedBeforePrefix) => {
            // A peer that hangs up without sending is usually on its way out.
            return Err(
                match tokio::time::timeout(PEER_EXIT_SETTLE, exit.exited()).await {
                    Ok(exit) => peer_exited(program, exit),
                    Err(_) => framing(FrameError::ClosedBeforePrefix),
                },
            );
        }
        Err(e) => return Err(framing(e)),
    };

    // Normal completion no longer needs the exit observer.
    drop(exit);
    debug!(bytes = payload.len(), "payload received");

    frame::write_ack(stream)
        .await
        .map_err(|e| ExtractError::io("failed to acknowledge scanner payload", e))?;
    Ok(payload)
}

fn peer_exited(program: &str, exit: ProcessExit) -> ExtractError {
    error!(program, exit = %exit, "scanner halted early, extraction cancelled");
    ExtractError::CancelledByPeerExit {
        program: program.to_string(),
        exit: exit.to_string(),
    }
}

fn framing(err: FrameError) -> ExtractError {
    match err {
        FrameError::Io(e) => ExtractError::io("failed to read scanner payload", e),
        other => ExtractError::ProtocolFraming(other.to_string()),
    }
}
