//! Named duplex endpoint the scanner connects to.
//!
//! On Unix the name maps to a domain socket in the temp directory, on Windows
//! to a named pipe. The endpoint is closed when dropped.

use tracing::debug;

use crate::error::{ExtractError, ExtractResult};

pub use imp::{ClientStream, ServerStream};

/// A bound, listening server endpoint. Accepts a single connection.
#[derive(Debug)]
pub struct Endpoint {
    address: String,
    listener: imp::Listener,
}

impl Endpoint {
    /// Bind the endpoint for `name`. Fails with `EndpointInUse` if a live
    /// server already listens on it.
    pub fn bind(name: &str) -> ExtractResult<Self> {
        let address = address_for(name);
        let listener = imp::bind(&address)?;
        debug!(address = %address, "endpoint bound");
        Ok(Self { address, listener })
    }

    /// The address a peer passes to [`connect`].
    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn accept(&mut self) -> ExtractResult<ServerStream> {
        imp::accept(&mut self.listener)
            .await
            .map_err(|source| ExtractError::Endpoint {
                address: self.address.clone(),
                source,
            })
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        debug!(address = %self.address, "endpoint closed");
    }
}

/// Resolve an endpoint name to the platform address.
pub fn address_for(name: &str) -> String {
    imp::address_for(name)
}

/// Connect to a server endpoint (peer side).
pub async fn connect(address: &str) -> std::io::Result<ClientStream> {
    imp::connect(address).await
}

/// Keep names usable as a single path component.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}

#[cfg(unix)]
mod imp {
    use std::fs::{self, File, OpenOptions};
    use std::io;
    use std::path::{Path, PathBuf};

    use fs2::FileExt;
    use tokio::net::{UnixListener, UnixStream};
    use tracing::warn;

    use super::sanitize;
    use crate::error::{ExtractError, ExtractResult};

    pub type ServerStream = UnixStream;
    pub type ClientStream = UnixStream;

    /// Socket listener plus the advisory lock that marks it live.
    ///
    /// The lock is held for the listener's lifetime, so liveness is checked
    /// without ever connecting to a server that accepts only once.
    #[derive(Debug)]
    pub struct Listener {
        listener: UnixListener,
        path: PathBuf,
        _lock: File,
    }

    impl Drop for Listener {
        // Socket goes first; the lock is released when `_lock` closes.
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.path);
        }
    }

    pub fn address_for(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("{}.sock", sanitize(name)))
            .to_string_lossy()
            .into_owned()
    }

    /// `/tmp/x.sock` -> `/tmp/x.sock.lock`
    pub fn lock_path_for(path: &Path) -> PathBuf {
        let mut lock = path.as_os_str().to_owned();
        lock.push(".lock");
        PathBuf::from(lock)
    }

    pub fn bind(address: &str) -> ExtractResult<Listener> {
        let path = PathBuf::from(address);
        let endpoint_err = |source: io::Error| ExtractError::Endpoint {
            address: address.to_string(),
            source,
        };

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path_for(&path))
            .map_err(endpoint_err)?;
        // fs2's method, not std's `File::try_lock_exclusive`.
        match FileExt::try_lock_exclusive(&lock) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                return Err(ExtractError::EndpointInUse {
                    address: address.to_string(),
                });
            }
            Err(e) => return Err(endpoint_err(e)),
        }

        // Holding the lock: any socket file left here belongs to a dead run.
        if path.exists() {
            warn!(address, "removing stale endpoint socket");
            fs::remove_file(&path).map_err(endpoint_err)?;
        }
        let listener = UnixListener::bind(&path).map_err(endpoint_err)?;

        Ok(Listener {
            listener,
            path,
            _lock: lock,
        })
    }

    pub async fn accept(listener: &mut Listener) -> io::Result<ServerStream> {
        let (stream, _) = listener.listener.accept().await?;
        Ok(stream)
    }

    pub async fn connect(address: &str) -> io::Result<ClientStream> {
        UnixStream::connect(address).await
    }
}

#[cfg(windows)]
mod imp {
    use std::io;
    use std::time::Duration;

    use tokio::net::windows::named_pipe::{
        ClientOptions, NamedPipeClient, NamedPipeServer, PipeMode, ServerOptions,
    };

    use super::sanitize;
    use crate::error::{ExtractError, ExtractResult};

    const ERROR_PIPE_BUSY: i32 = 231;

    pub type ServerStream = NamedPipeServer;
    pub type ClientStream = NamedPipeClient;

    #[derive(Debug)]
    pub struct Listener {
        server: Option<NamedPipeServer>,
    }

    pub fn address_for(name: &str) -> String {
        format!(r"\\.\pipe\{}", sanitize(name))
    }

    pub fn bind(address: &str) -> ExtractResult<Listener> {
        let server = ServerOptions::new()
            .first_pipe_instance(true)
            .max_instances(1)
            .pipe_mode(PipeMode::Byte)
            .create(address)
            .map_err(|source| {
                if source.kind() == io::ErrorKind::PermissionDenied {
                    ExtractError::EndpointInUse {
                        address: address.to_string(),
                    }
                } else {
                    ExtractError::Endpoint {
                        address: address.to_string(),
                        source,
                    }
                }
            })?;
        Ok(Listener {
            server: Some(server),
        })
    }

    pub async fn accept(listener: &mut Listener) -> io::Result<ServerStream> {
        let server = listener.server.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "endpoint already accepted")
        })?;
        server.connect().await?;
        Ok(server)
    }

    pub async fn connect(address: &str) -> io::Result<ClientStream> {
        loop {
            match ClientOptions::new().open(address) {
                Ok(client) => return Ok(client),
                Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
