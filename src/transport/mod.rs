//! Transport Module
//!
//! Send strategies for packed commands.
//!
//! ## Strategies
//! - [`MonolithicTransport`]: one buffer, one write per command. Peak
//!   memory is the full frame.
//! - [`ChunkedTransport`]: bounded chunks, one write per chunk. Large
//!   arguments are never copied next to anything else.
//!
//! Both frame identically; only the grouping into writes differs. On any
//! write failure the connection is dropped before the error is returned and
//! the rest of the command is abandoned. There is no retry at this layer.

mod monolithic;
mod chunked;

pub use monolithic::MonolithicTransport;
pub use chunked::ChunkedTransport;

use std::sync::Arc;

use crate::config::{Config, SendStrategy};
use crate::encoder::{Argument, DefaultEncoder, Encoder};
use crate::error::{ConnectionError, Result};
use crate::network::Connection;
use crate::protocol::PackedCommand;

/// Packs commands and sends them over a connection
pub trait CommandTransport: Send + Sync {
    /// Which strategy this transport implements
    fn strategy(&self) -> SendStrategy;

    /// Pack a single command
    fn pack(&self, args: &[Argument]) -> Result<PackedCommand>;

    /// Pack several commands to be written back to back
    fn pack_pipeline(&self, commands: &[Vec<Argument>]) -> Result<PackedCommand>;

    /// Send a packed command, connecting first if needed
    fn send(
        &self,
        conn: &mut dyn Connection,
        packed: &PackedCommand,
    ) -> std::result::Result<(), ConnectionError>;
}

/// Build the transport selected by `config`, using the default encoder
pub fn transport_for(config: &Config) -> Box<dyn CommandTransport> {
    transport_with_encoder(config, DefaultEncoder)
}

/// Build the transport selected by `config` around a custom encoder
pub fn transport_with_encoder<E>(config: &Config, encoder: E) -> Box<dyn CommandTransport>
where
    E: Encoder + 'static,
{
    let encoder = Arc::new(encoder);
    match config.strategy {
        SendStrategy::Monolithic => Box::new(MonolithicTransport::with_encoder(encoder)),
        SendStrategy::Chunked => Box::new(ChunkedTransport::with_encoder(
            encoder,
            config.chunk_threshold,
        )),
    }
}

/// Connect if the socket is not held yet
fn ensure_connected(conn: &mut dyn Connection) -> std::result::Result<(), ConnectionError> {
    if conn.is_connected() {
        return Ok(());
    }
    conn.connect().map_err(|e| {
        // leave nothing half-open behind a failed connect
        conn.disconnect();
        tracing::warn!("Connect failed: {}", e);
        ConnectionError::from(&e)
    })
}

/// Write one buffer, dropping the connection on failure
fn write_or_disconnect(
    conn: &mut dyn Connection,
    buf: &[u8],
) -> std::result::Result<(), ConnectionError> {
    conn.write_all(buf).map_err(|e| {
        conn.disconnect();
        let err = ConnectionError::from(&e);
        tracing::warn!("Write of {} bytes failed, connection closed: {}", buf.len(), err);
        err
    })
}
