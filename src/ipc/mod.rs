//! Inter-process exchange with an external scanner.
//!
//! ## Module Structure
//!
//! - `endpoint`: platform named endpoint (Unix socket / Windows named pipe)
//! - `frame`: length-prefixed payload and acknowledgment byte
//! - `channel`: server side of one exchange, cancelled by peer exit
//! - `peer`: scanner side, used by `loctext-scan`

pub mod channel;
pub mod endpoint;
pub mod frame;
pub mod peer;

pub use channel::IpcChannel;
pub use endpoint::{Endpoint, address_for};
