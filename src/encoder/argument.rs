//! Argument definitions
//!
//! Represents one positional value of a command.

use bytes::Bytes;

/// A single command argument
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Raw binary, sent as-is
    Bytes(Bytes),

    /// Text
    Text(String),

    /// Signed integer
    Int(i64),

    /// Unsigned integer
    UInt(u64),

    /// Floating point number
    Float(f64),
}

impl From<Bytes> for Argument {
    fn from(value: Bytes) -> Self {
        Argument::Bytes(value)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(value: Vec<u8>) -> Self {
        Argument::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Argument {
    fn from(value: &[u8]) -> Self {
        Argument::Bytes(Bytes::copy_from_slice(value))
    }
}

impl<const N: usize> From<&[u8; N]> for Argument {
    fn from(value: &[u8; N]) -> Self {
        Argument::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Text(value)
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Argument::Text(value.clone())
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Text(value.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Argument {
            fn from(value: $t) -> Self {
                Argument::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Argument {
            fn from(value: $t) -> Self {
                Argument::UInt(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Argument {
    fn from(value: isize) -> Self {
        Argument::Int(value as i64)
    }
}

impl From<usize> for Argument {
    fn from(value: usize) -> Self {
        Argument::UInt(value as u64)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Float(value)
    }
}
