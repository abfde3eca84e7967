//! Protocol Module
//!
//! RESP command framing and the two packers built on it.
//!
//! ## Command Format (RESP array of bulk strings)
//! ```text
//! ┌───┬──────────┬──────┐
//! │ * │ argc     │ CRLF │                      header, once
//! └───┴──────────┴──────┘
//! ┌───┬──────────┬──────┬───────────────┬──────┐
//! │ $ │ len      │ CRLF │ encoded bytes │ CRLF │  per argument
//! └───┴──────────┴──────┴───────────────┴──────┘
//! ```
//! `argc` and `len` are decimal ASCII. `len` is always the length of the
//! encoded argument.
//!
//! ## Packing Strategies
//! - Monolithic: the whole frame in one contiguous buffer
//! - Chunked: an ordered list of buffers whose concatenation is the frame;
//!   arguments above the threshold travel in a chunk of their own

mod framing;
mod packed;
mod packer;
mod codec;

pub use framing::{frame_len, write_array_header, write_bulk_prefix, CRLF, SYM_DOLLAR, SYM_STAR};
pub use packed::PackedCommand;
pub use packer::{
    pack_chunked, pack_chunked_pipeline, pack_monolithic, pack_monolithic_pipeline,
    ChunkAccumulator, PipelineAccumulator,
};
pub use codec::{decode_command, parse_command, read_command, write_packed, MAX_BULK_LEN};
