//! Packed command definitions
//!
//! The two wire shapes a framed command can take.

use bytes::{Bytes, BytesMut};

/// One or more commands, framed and ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedCommand {
    /// The whole frame in one buffer
    Monolithic(Bytes),

    /// Ordered, non-empty buffers; their concatenation is the frame
    Chunked(Vec<Bytes>),
}

impl PackedCommand {
    /// Build a chunked command, keeping the sequence non-empty
    pub fn chunked(mut chunks: Vec<Bytes>) -> Self {
        if chunks.is_empty() {
            chunks.push(Bytes::new());
        }
        PackedCommand::Chunked(chunks)
    }

    /// Total number of bytes on the wire
    pub fn len(&self) -> usize {
        match self {
            PackedCommand::Monolithic(buf) => buf.len(),
            PackedCommand::Chunked(chunks) => chunks.iter().map(Bytes::len).sum(),
        }
    }

    /// True if nothing would be written
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buffers (and therefore socket writes for the chunked send)
    pub fn chunk_count(&self) -> usize {
        match self {
            PackedCommand::Monolithic(_) => 1,
            PackedCommand::Chunked(chunks) => chunks.len(),
        }
    }

    /// Buffers in wire order. A monolithic command yields exactly one.
    pub fn chunks(&self) -> std::slice::Iter<'_, Bytes> {
        match self {
            PackedCommand::Monolithic(buf) => std::slice::from_ref(buf).iter(),
            PackedCommand::Chunked(chunks) => chunks.iter(),
        }
    }

    /// Contiguous copy of the frame.
    ///
    /// Free for monolithic commands and single-chunk commands.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            PackedCommand::Monolithic(buf) => buf.clone(),
            PackedCommand::Chunked(chunks) if chunks.len() == 1 => chunks[0].clone(),
            PackedCommand::Chunked(chunks) => {
                let mut joined = BytesMut::with_capacity(self.len());
                for chunk in chunks {
                    joined.extend_from_slice(chunk);
                }
                joined.freeze()
            }
        }
    }
}

impl From<Bytes> for PackedCommand {
    fn from(buf: Bytes) -> Self {
        PackedCommand::Monolithic(buf)
    }
}
