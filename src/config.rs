//! Configuration for respack
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::{RespackError, Result};

/// Default size boundary for the chunked packer (bytes)
pub const DEFAULT_CHUNK_THRESHOLD: usize = 6000;

/// Main configuration for a command writer
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block until the OS accepts)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Packing Configuration
    // -------------------------------------------------------------------------
    /// How packed commands are grouped into socket writes
    pub strategy: SendStrategy,

    /// Arguments (or pending buffers) larger than this are flushed as their
    /// own chunk by the chunked strategy
    pub chunk_threshold: usize,
}

/// Send strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStrategy {
    /// One contiguous buffer, one write per command
    Monolithic,

    /// Bounded chunks, one write per chunk
    Chunked,
}

impl fmt::Display for SendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStrategy::Monolithic => f.write_str("monolithic"),
            SendStrategy::Chunked => f.write_str("chunked"),
        }
    }
}

impl FromStr for SendStrategy {
    type Err = RespackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "monolithic" => Ok(SendStrategy::Monolithic),
            "chunked" => Ok(SendStrategy::Chunked),
            other => Err(RespackError::Config(format!(
                "Unknown send strategy: {} (expected monolithic or chunked)",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            strategy: SendStrategy::Chunked,
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration for values that can never work
    pub fn validate(&self) -> Result<()> {
        if self.server_addr.trim().is_empty() {
            return Err(RespackError::Config("Server address is empty".to_string()));
        }
        if self.chunk_threshold == 0 {
            return Err(RespackError::Config(
                "Chunk threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the send strategy
    pub fn strategy(mut self, strategy: SendStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the chunk threshold (in bytes)
    pub fn chunk_threshold(mut self, bytes: usize) -> Self {
        self.config.chunk_threshold = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
