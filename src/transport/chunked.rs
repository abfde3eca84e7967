//! Chunked send strategy

use std::sync::Arc;

use crate::config::{SendStrategy, DEFAULT_CHUNK_THRESHOLD};
use crate::encoder::{Argument, DefaultEncoder, Encoder};
use crate::error::{ConnectionError, Result};
use crate::network::Connection;
use crate::protocol::{pack_chunked, pack_chunked_pipeline, PackedCommand};
use super::{ensure_connected, write_or_disconnect, CommandTransport};

/// Packs commands into bounded chunks and writes each chunk separately
#[derive(Clone)]
pub struct ChunkedTransport<E: Encoder = DefaultEncoder> {
    encoder: Arc<E>,
    threshold: usize,
}

impl ChunkedTransport<DefaultEncoder> {
    /// Default encoder, default threshold
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_CHUNK_THRESHOLD)
    }

    /// Default encoder, custom threshold
    pub fn with_threshold(threshold: usize) -> Self {
        Self::with_encoder(Arc::new(DefaultEncoder), threshold)
    }
}

impl Default for ChunkedTransport<DefaultEncoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Encoder> ChunkedTransport<E> {
    /// Custom encoder, custom threshold
    pub fn with_encoder(encoder: Arc<E>, threshold: usize) -> Self {
        Self { encoder, threshold }
    }

    /// Size boundary above which arguments get their own chunk
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl<E: Encoder> CommandTransport for ChunkedTransport<E> {
    fn strategy(&self) -> SendStrategy {
        SendStrategy::Chunked
    }

    fn pack(&self, args: &[Argument]) -> Result<PackedCommand> {
        pack_chunked(self.encoder.as_ref(), args, self.threshold).map(PackedCommand::chunked)
    }

    fn pack_pipeline(&self, commands: &[Vec<Argument>]) -> Result<PackedCommand> {
        pack_chunked_pipeline(self.encoder.as_ref(), commands, self.threshold)
            .map(PackedCommand::chunked)
    }

    fn send(
        &self,
        conn: &mut dyn Connection,
        packed: &PackedCommand,
    ) -> std::result::Result<(), ConnectionError> {
        ensure_connected(conn)?;
        for (i, chunk) in packed.chunks().enumerate() {
            tracing::trace!("Writing chunk {} ({} bytes)", i, chunk.len());
            write_or_disconnect(conn, chunk)?;
        }
        Ok(())
    }
}
