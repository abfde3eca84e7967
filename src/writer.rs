//! Command Writer
//!
//! Pairs one connection with one transport. Every send borrows the writer
//! mutably, so at most one command is in flight per connection.

use crate::config::{Config, SendStrategy};
use crate::encoder::Argument;
use crate::error::Result;
use crate::network::{Connection, TcpConnection};
use crate::protocol::PackedCommand;
use crate::transport::{transport_for, CommandTransport};

/// Writes commands to a single connection
pub struct CommandWriter<C: Connection> {
    /// Socket the commands go to
    conn: C,

    /// Strategy used to pack and send
    transport: Box<dyn CommandTransport>,
}

impl CommandWriter<TcpConnection> {
    /// Create a writer for the TCP server and strategy named in `config`.
    ///
    /// Nothing is connected until the first send.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            TcpConnection::from_config(config),
            transport_for(config),
        ))
    }
}

impl<C: Connection> CommandWriter<C> {
    pub fn new(conn: C, transport: Box<dyn CommandTransport>) -> Self {
        Self { conn, transport }
    }

    /// Pack and send one command, returning the number of bytes written
    pub fn write_command(&mut self, args: &[Argument]) -> Result<usize> {
        let packed = self.transport.pack(args)?;
        self.send_packed(&packed)?;
        Ok(packed.len())
    }

    /// Pack and send several commands back to back
    pub fn write_pipeline(&mut self, commands: &[Vec<Argument>]) -> Result<usize> {
        let packed = self.transport.pack_pipeline(commands)?;
        self.send_packed(&packed)?;
        Ok(packed.len())
    }

    /// Send an already packed command
    pub fn send_packed(&mut self, packed: &PackedCommand) -> Result<()> {
        tracing::trace!(
            "Sending {} bytes in {} chunk(s) via {}",
            packed.len(),
            packed.chunk_count(),
            self.transport.strategy()
        );
        self.transport.send(&mut self.conn, packed)?;
        Ok(())
    }

    /// Strategy in use
    pub fn strategy(&self) -> SendStrategy {
        self.transport.strategy()
    }

    /// Whether the underlying socket is currently held
    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Drop the socket; the next send reconnects
    pub fn disconnect(&mut self) {
        self.conn.disconnect();
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}
