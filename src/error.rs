//! Error taxonomy for an extraction pass.
//!
//! Every variant except the catalog ones aborts the whole pass. Missing
//! translations are deliberately absent: lookups recover locally with a
//! sentinel value (see [`crate::core::TextDictionary::lookup`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by extraction, the IPC channel and the entry store.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A pass was requested while another one is still running.
    #[error("extraction already in progress")]
    AlreadyInProgress,

    /// The scanner process exited before it delivered its payload.
    #[error("scanner '{program}' exited before delivering its payload ({exit})")]
    CancelledByPeerExit { program: String, exit: String },

    /// Truncated or invalid length prefix or payload.
    #[error("protocol framing error: {0}")]
    ProtocolFraming(String),

    /// The payload is not valid UTF-8 JSON of the expected document shape.
    #[error("failed to decode scanner document: {0}")]
    DecodeFailure(String),

    #[error("no localization entries configured, add at least one path to 'entries'")]
    NoEntriesConfigured,

    #[error("endpoint '{address}' is already in use by another server")]
    EndpointInUse { address: String },

    #[error("failed to open endpoint '{address}'")]
    Endpoint {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch scanner '{program}'")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// An in-process text source failed.
    #[error("text source '{name}' failed")]
    Source {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to load entry '{}': {message}", path.display())]
    EntryLoad { path: PathBuf, message: String },

    #[error("failed to save entry '{}'", path.display())]
    EntrySave {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no entry titled '{0}'")]
    UnknownEntry(String),

    #[error("more than one entry is titled '{0}'")]
    DuplicateEntry(String),
}

impl ExtractError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        ExtractError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for failures caused by the scanner peer rather than local state.
    pub fn is_peer_failure(&self) -> bool {
        matches!(
            self,
            ExtractError::CancelledByPeerExit { .. }
                | ExtractError::ProtocolFraming(_)
                | ExtractError::DecodeFailure(_)
        )
    }
}

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
