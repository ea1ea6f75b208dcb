//! Delivery of protocol lines to individual connections.
//!
//! The engine never touches sockets directly. It hands every outgoing line
//! to a [`Transport`], and any error coming back is taken as proof that the
//! connection is gone.

use crate::client_manager::ClientId;
use std::io;

/// Outgoing side of the connection set.
pub trait Transport {
    /// Hands one complete message to the connection. Delivery is attempted
    /// once; an error means the connection must be dropped.
    fn send(&mut self, id: ClientId, message: &str) -> io::Result<()>;

    /// Releases everything held for the connection and closes it.
    fn close(&mut self, id: ClientId);
}

#[cfg(test)]
pub use memory::MemoryTransport;
