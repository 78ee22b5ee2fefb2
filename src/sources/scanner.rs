use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::TextSource;
use crate::config::ScannerConfig;
use crate::core::DiscoverySet;
use crate::error::ExtractResult;
use crate::ipc::IpcChannel;
use crate::process::{ScannerProcess, resolve_executable};

/// Out-of-process static-analysis scanner, reached over the IPC channel.
///
/// Invoked as `executable <context-path> <endpoint-address>`.
#[derive(Debug, Clone)]
pub struct ScannerSource {
    executable: PathBuf,
    context_path: PathBuf,
    endpoint_name: String,
}

impl ScannerSource {
    pub fn new(
        executable: impl Into<PathBuf>,
        context_path: impl Into<PathBuf>,
        endpoint_name: impl Into<String>,
    ) -> Self {
        Self {
            executable: executable.into(),
            context_path: context_path.into(),
            endpoint_name: endpoint_name.into(),
        }
    }

    pub fn from_config(config: &ScannerConfig, root: &Path) -> Self {
        Self::new(
            resolve_executable(root, &config.executable),
            root.join(&config.context_path),
            config.endpoint_name.clone(),
        )
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl TextSource for ScannerSource {
    fn name(&self) -> &str {
        "scanner"
    }

    /// Bind, launch the scanner and decode the document it sends.
    ///
    /// An empty payload yields an empty set, with only a warning. Reconciling
    /// against it prunes every key, so a scanner that sends nothing by
    /// mistake looks the same as a project with no text.
    async fn discover(&self) -> ExtractResult<DiscoverySet> {
        let channel = IpcChannel::bind(&self.endpoint_name)?;
        let document = channel
            .retrieve(|address| {
                ScannerProcess::launch(
                    &self.executable,
                    [self.context_path.as_os_str(), OsStr::new(address)],
                )
            })
            .await?;

        match document {
            Some(document) => {
                debug!(texts = document.text.len(), "scanner document decoded");
                Ok(document.text)
            }
            None => {
                warn!(program = %self.executable.display(), "scanner sent an empty document");
                Ok(DiscoverySet::new())
            }
        }
    }
}
