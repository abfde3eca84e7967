//! Monolithic send strategy

use std::sync::Arc;

use crate::config::SendStrategy;
use crate::encoder::{Argument, DefaultEncoder, Encoder};
use crate::error::{ConnectionError, Result};
use crate::network::Connection;
use crate::protocol::{pack_monolithic, pack_monolithic_pipeline, PackedCommand};
use super::{ensure_connected, write_or_disconnect, CommandTransport};

/// Packs each command into one buffer and writes it with a single call
#[derive(Clone)]
pub struct MonolithicTransport<E: Encoder = DefaultEncoder> {
    encoder: Arc<E>,
}

impl MonolithicTransport<DefaultEncoder> {
    /// Default encoder
    pub fn new() -> Self {
        Self::with_encoder(Arc::new(DefaultEncoder))
    }
}

impl Default for MonolithicTransport<DefaultEncoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Encoder> MonolithicTransport<E> {
    /// Custom encoder, shared with other transports through the `Arc`
    pub fn with_encoder(encoder: Arc<E>) -> Self {
        Self { encoder }
    }
}

impl<E: Encoder> CommandTransport for MonolithicTransport<E> {
    fn strategy(&self) -> SendStrategy {
        SendStrategy::Monolithic
    }

    fn pack(&self, args: &[Argument]) -> Result<PackedCommand> {
        pack_monolithic(self.encoder.as_ref(), args).map(PackedCommand::Monolithic)
    }

    fn pack_pipeline(&self, commands: &[Vec<Argument>]) -> Result<PackedCommand> {
        pack_monolithic_pipeline(self.encoder.as_ref(), commands).map(PackedCommand::Monolithic)
    }

    fn send(
        &self,
        conn: &mut dyn Connection,
        packed: &PackedCommand,
    ) -> std::result::Result<(), ConnectionError> {
        ensure_connected(conn)?;
        // chunked input is joined so the whole command still goes out in one write
        let buf = packed.to_bytes();
        tracing::trace!("Writing {} bytes in one buffer", buf.len());
        write_or_disconnect(conn, &buf)
    }
}
