//! Connection Handling
//!
//! The socket lifecycle the transports drive: lazy connect, raw writes,
//! forced disconnect.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;

/// A stream socket as seen by the send path
pub trait Connection {
    /// True while a socket is held
    fn is_connected(&self) -> bool;

    /// Open the socket. Only called while disconnected.
    fn connect(&mut self) -> io::Result<()>;

    /// Release the socket. Safe to call when already disconnected.
    fn disconnect(&mut self);

    /// Write the whole buffer, blocking until the OS accepts it or fails
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
}

/// Blocking TCP connection
pub struct TcpConnection {
    /// Server address (host:port)
    addr: String,

    /// Connect timeout, none = OS default
    connect_timeout: Option<Duration>,

    /// Write timeout, none = block
    write_timeout: Option<Duration>,

    /// Disable Nagle's algorithm
    nodelay: bool,

    /// Open socket, if any
    stream: Option<TcpStream>,
}

impl TcpConnection {
    /// Create a disconnected connection to `addr`
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: None,
            write_timeout: None,
            nodelay: true,
            stream: None,
        }
    }

    /// Create a disconnected connection from config
    pub fn from_config(config: &Config) -> Self {
        Self {
            addr: config.server_addr.clone(),
            connect_timeout: millis(config.connect_timeout_ms),
            write_timeout: millis(config.write_timeout_ms),
            nodelay: config.nodelay,
            stream: None,
        }
    }

    /// Address of the connected peer
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().and_then(|s| s.peer_addr().ok())
    }

    fn open(&self) -> io::Result<TcpStream> {
        let stream = match self.connect_timeout {
            None => TcpStream::connect(self.addr.as_str())?,
            Some(timeout) => {
                let mut last_err = None;
                let mut connected = None;
                for addr in self.addr.to_socket_addrs()? {
                    match TcpStream::connect_timeout(&addr, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(e) => last_err = Some(e),
                    }
                }
                match connected {
                    Some(stream) => stream,
                    None => {
                        return Err(last_err.unwrap_or_else(|| {
                            io::Error::new(
                                io::ErrorKind::InvalidInput,
                                format!("could not resolve {}", self.addr),
                            )
                        }))
                    }
                }
            }
        };

        stream.set_nodelay(self.nodelay)?;
        stream.set_write_timeout(self.write_timeout)?;
        Ok(stream)
    }
}

impl Connection for TcpConnection {
    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn connect(&mut self) -> io::Result<()> {
        let stream = self.open()?;
        tracing::debug!("Connected to {}", self.addr);
        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            // Peer may already be gone; the socket is dropped either way
            let _ = stream.shutdown(Shutdown::Both);
            tracing::debug!("Disconnected from {}", self.addr);
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.write_all(buf),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "socket is not connected",
            )),
        }
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
