//! Default argument encoder

use bytes::Bytes;

use crate::error::{RespackError, Result};
use super::{Argument, Encoder};

/// Encodes text as UTF-8 and numbers as decimal ASCII.
///
/// Binary arguments are passed through without copying.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEncoder;

impl Encoder for DefaultEncoder {
    fn encode(&self, arg: &Argument) -> Result<Bytes> {
        match arg {
            Argument::Bytes(b) => Ok(b.clone()),
            Argument::Text(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
            Argument::Int(n) => Ok(decimal(*n)),
            Argument::UInt(n) => Ok(decimal(*n)),
            Argument::Float(f) => {
                if !f.is_finite() {
                    return Err(RespackError::Encode(format!(
                        "Invalid input of type float: {}",
                        f
                    )));
                }
                // Debug gives the shortest round-trip form and keeps the
                // decimal point on whole numbers ("1.0", not "1").
                Ok(Bytes::from(format!("{:?}", f)))
            }
        }
    }
}

fn decimal<I: itoa::Integer>(n: I) -> Bytes {
    Bytes::copy_from_slice(itoa::Buffer::new().format(n).as_bytes())
}
