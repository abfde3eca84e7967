//! Encoder Module
//!
//! Turns caller-supplied argument values into the raw bytes that get framed
//! on the wire.
//!
//! ## Responsibilities
//! - [`Argument`]: the value types a command may carry
//! - [`Encoder`]: the injected capability mapping one argument to bytes
//! - [`DefaultEncoder`]: UTF-8 text, pass-through binary, decimal numbers
//!
//! Packers call the encoder exactly once per argument, in order.

mod argument;
mod default;

pub use argument::Argument;
pub use default::DefaultEncoder;

use bytes::Bytes;
use crate::error::Result;

/// Maps one argument value to its wire bytes
pub trait Encoder: Send + Sync {
    /// Encode a single argument
    fn encode(&self, arg: &Argument) -> Result<Bytes>;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(&self, arg: &Argument) -> Result<Bytes> {
        (**self).encode(arg)
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn encode(&self, arg: &Argument) -> Result<Bytes> {
        (**self).encode(arg)
    }
}

impl<E: Encoder + ?Sized> Encoder for std::sync::Arc<E> {
    fn encode(&self, arg: &Argument) -> Result<Bytes> {
        (**self).encode(arg)
    }
}
