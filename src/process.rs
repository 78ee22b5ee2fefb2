//! Launching the scanner and watching it exit.
//!
//! The child is owned by a monitor task. When the child exits the task
//! publishes a [`ProcessExit`] on a watch channel; IPC reads race against that
//! signal so they never wait on a dead peer.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};

/// How long [`ScannerProcess::dispose`] lets a peer finish on its own.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// How the scanner process ended.
#[derive(Debug, Clone)]
pub enum ProcessExit {
    Exited(ExitStatus),
    WaitFailed(String),
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessExit::Exited(status) => write!(f, "{}", status),
            ProcessExit::WaitFailed(err) => write!(f, "wait failed: {}", err),
        }
    }
}

/// Observer of a process exit. Dropping it deregisters the observer.
#[derive(Debug, Clone)]
pub struct ExitSignal {
    rx: watch::Receiver<Option<ProcessExit>>,
}

impl ExitSignal {
    /// Resolve once the process has exited.
    pub async fn exited(&mut self) -> ProcessExit {
        loop {
            if let Some(exit) = self.rx.borrow_and_update().clone() {
                return exit;
            }
            if self.rx.changed().await.is_err() {
                // Monitor gone without a verdict; only happens after dispose.
                return ProcessExit::WaitFailed("process monitor stopped".to_string());
            }
        }
    }

    pub fn has_exited(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// A signal driven by hand instead of a process.
    #[cfg(test)]
    pub(crate) fn detached() -> (watch::Sender<Option<ProcessExit>>, ExitSignal) {
        let (tx, rx) = watch::channel(None);
        (tx, ExitSignal { rx })
    }
}

/// A running scanner process.
///
/// Dropping the handle starts the same shutdown as [`ScannerProcess::dispose`]
/// without waiting for it: the child gets a short grace period and is then
/// killed.
#[derive(Debug)]
pub struct ScannerProcess {
    program: String,
    pid: Option<u32>,
    exit_rx: watch::Receiver<Option<ProcessExit>>,
    shutdown: Option<oneshot::Sender<()>>,
    monitor: Option<JoinHandle<()>>,
}

impl ScannerProcess {
    /// Spawn `executable` with exactly `args`, no shell, no console window.
    pub fn launch<I, S>(executable: &Path, args: I) -> ExtractResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = executable.display().to_string();

        let mut command = Command::new(executable);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let child = command.spawn().map_err(|source| ExtractError::Launch {
            program: program.clone(),
            source,
        })?;
        let pid = child.id();
        debug!(program = %program, pid, "scanner launched");

        let (exit_tx, exit_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let monitor = tokio::spawn(monitor(child, program.clone(), exit_tx, shutdown_rx));

        Ok(Self {
            program,
            pid,
            exit_rx,
            shutdown: Some(shutdown_tx),
            monitor: Some(monitor),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Register an exit observer.
    pub fn exit_signal(&self) -> ExitSignal {
        ExitSignal {
            rx: self.exit_rx.clone(),
        }
    }

    /// Stop supervising: wait briefly for the process to exit on its own,
    /// then kill it.
    pub async fn dispose(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(monitor) = self.monitor.take() {
            if let Err(e) = monitor.await {
                warn!(program = %self.program, "process monitor failed: {}", e);
            }
        }
    }
}

async fn monitor(
    mut child: Child,
    program: String,
    exit_tx: watch::Sender<Option<ProcessExit>>,
    shutdown: oneshot::Receiver<()>,
) {
    let exit = tokio::select! {
        status = child.wait() => Some(status),
        // Also fires when the handle is dropped without dispose.
        _ = shutdown => None,
    };

    let exit = match exit {
        Some(status) => status,
        None => match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                debug!(program = %program, "scanner still running after grace period, killing");
                if let Err(e) = child.kill().await {
                    warn!(program = %program, "failed to kill scanner: {}", e);
                }
                child.wait().await
            }
        },
    };

    let exit = match exit {
        Ok(status) => ProcessExit::Exited(status),
        Err(e) => ProcessExit::WaitFailed(e.to_string()),
    };
    debug!(program = %program, exit = %exit, "scanner exited");
    let _ = exit_tx.send(Some(exit));
}

/// Resolve a configured scanner executable.
///
/// Relative paths are taken from `root`; a bare program name that does not
/// exist under `root` is left for the `PATH` search.
pub fn resolve_executable(root: &Path, executable: &str) -> PathBuf {
    let path = Path::new(executable);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let joined = root.join(path);
    if joined.exists() || path.components().count() > 1 {
        joined
    } else {
        path.to_path_buf()
    }
}
