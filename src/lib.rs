//! # respack
//!
//! RESP command packing with two socket send strategies:
//! - Monolithic: the whole command in one buffer, one write
//! - Chunked: bounded buffers, large arguments isolated, one write per chunk
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Arguments (text, binary, numbers)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  once per argument, in order
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Encoder                               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Monolithic  │          │   Chunked   │
//!   │   Packer    │          │   Packer    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ one write   │          │ write/chunk │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌──────────────┐
//!               │  Connection  │
//!               └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod encoder;
pub mod protocol;
pub mod network;
pub mod transport;
pub mod writer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ConnectionError, RespackError, Result};
pub use config::{Config, SendStrategy};
pub use encoder::{Argument, DefaultEncoder, Encoder};
pub use protocol::PackedCommand;
pub use network::{Connection, TcpConnection};
pub use transport::{ChunkedTransport, CommandTransport, MonolithicTransport};
pub use writer::CommandWriter;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of respack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
