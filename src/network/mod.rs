//! Network Module
//!
//! Stream socket handling for the send path.
//!
//! ## Lifecycle
//! ```text
//! Disconnected --connect()--> Connected --write fails--> Disconnected
//!                             Connected --write ok-----> Connected
//! ```
//! Sockets are opened lazily on the first send and dropped on any write
//! error.

mod connection;

pub use connection::{Connection, TcpConnection};
