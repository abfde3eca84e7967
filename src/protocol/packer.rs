//! Command packers
//!
//! Pure functions turning argument lists into framed commands. Nothing here
//! touches a socket.

use bytes::{Bytes, BytesMut};

use crate::encoder::{Argument, Encoder};
use crate::error::Result;
use super::framing::{frame_len, write_array_header, write_bulk_prefix, CRLF};

// =============================================================================
// Monolithic Packing
// =============================================================================

/// Pack a command into one contiguous buffer
pub fn pack_monolithic<E>(encoder: &E, args: &[Argument]) -> Result<Bytes>
where
    E: Encoder + ?Sized,
{
    let encoded = encode_all(encoder, args)?;

    let mut buf = BytesMut::with_capacity(frame_len(encoded.iter().map(Bytes::len)));
    write_array_header(&mut buf, encoded.len());
    for arg in &encoded {
        write_bulk_prefix(&mut buf, arg.len());
        buf.extend_from_slice(arg);
        buf.extend_from_slice(CRLF);
    }

    Ok(buf.freeze())
}

/// Pack several commands back to back into one contiguous buffer
pub fn pack_monolithic_pipeline<E>(encoder: &E, commands: &[Vec<Argument>]) -> Result<Bytes>
where
    E: Encoder + ?Sized,
{
    let mut buf = BytesMut::new();
    for args in commands {
        buf.extend_from_slice(&pack_monolithic(encoder, args)?);
    }
    Ok(buf.freeze())
}

fn encode_all<E>(encoder: &E, args: &[Argument]) -> Result<Vec<Bytes>>
where
    E: Encoder + ?Sized,
{
    args.iter().map(|arg| encoder.encode(arg)).collect()
}

// =============================================================================
// Chunked Packing
// =============================================================================

/// Fold state for the chunked packer.
///
/// `pending` collects small frames; completed chunks are never touched again.
#[derive(Debug)]
pub struct ChunkAccumulator {
    threshold: usize,
    pending: BytesMut,
    chunks: Vec<Bytes>,
}

impl ChunkAccumulator {
    /// Start a command of `argc` arguments
    pub fn new(argc: usize, threshold: usize) -> Self {
        let mut pending = BytesMut::new();
        write_array_header(&mut pending, argc);
        Self {
            threshold,
            pending,
            chunks: Vec::new(),
        }
    }

    /// Fold one encoded argument into the accumulator
    pub fn push(mut self, arg: Bytes) -> Self {
        if self.pending.len() > self.threshold || arg.len() > self.threshold {
            write_bulk_prefix(&mut self.pending, arg.len());
            self.chunks.push(self.pending.split().freeze());
            // the argument rides alone, uncopied
            self.chunks.push(arg);
            self.pending.extend_from_slice(CRLF);
        } else {
            write_bulk_prefix(&mut self.pending, arg.len());
            self.pending.extend_from_slice(&arg);
            self.pending.extend_from_slice(CRLF);
        }
        self
    }

    /// Flush whatever is pending as the final chunk
    pub fn finish(mut self) -> Vec<Bytes> {
        self.chunks.push(self.pending.freeze());
        self.chunks
    }
}

/// Pack a command into chunks bounded by `threshold`
pub fn pack_chunked<E>(encoder: &E, args: &[Argument], threshold: usize) -> Result<Vec<Bytes>>
where
    E: Encoder + ?Sized,
{
    let acc = args
        .iter()
        .try_fold(ChunkAccumulator::new(args.len(), threshold), |acc, arg| {
            encoder.encode(arg).map(|encoded| acc.push(encoded))
        })?;
    Ok(acc.finish())
}

// =============================================================================
// Chunked Pipeline Packing
// =============================================================================

/// Fold state regrouping the chunks of several commands.
///
/// Small chunks are coalesced; once the shared buffer grows past the
/// threshold, or a chunk alone is past it, the shared buffer is flushed.
#[derive(Debug)]
pub struct PipelineAccumulator {
    threshold: usize,
    pieces: BytesMut,
    output: Vec<Bytes>,
}

impl PipelineAccumulator {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            pieces: BytesMut::new(),
            output: Vec::new(),
        }
    }

    /// Fold one chunk of some command into the accumulator
    pub fn push(mut self, chunk: Bytes) -> Self {
        let oversized = chunk.len() > self.threshold;
        if self.pieces.len() > self.threshold || oversized {
            self.flush_pieces();
        }

        if oversized {
            self.output.push(chunk);
        } else {
            self.pieces.extend_from_slice(&chunk);
        }
        self
    }

    /// Flush the shared buffer and return the chunk list
    pub fn finish(mut self) -> Vec<Bytes> {
        self.flush_pieces();
        self.output
    }

    fn flush_pieces(&mut self) {
        if !self.pieces.is_empty() {
            self.output.push(self.pieces.split().freeze());
        }
    }
}

/// Pack several commands into one chunk list bounded by `threshold`
pub fn pack_chunked_pipeline<E>(
    encoder: &E,
    commands: &[Vec<Argument>],
    threshold: usize,
) -> Result<Vec<Bytes>>
where
    E: Encoder + ?Sized,
{
    let mut acc = PipelineAccumulator::new(threshold);
    for args in commands {
        for chunk in pack_chunked(encoder, args, threshold)? {
            acc = acc.push(chunk);
        }
    }
    Ok(acc.finish())
}
