//! Protocol codec
//!
//! Decoding of framed commands and stream-based I/O helpers.
//!
//! The packers only ever produce frames; decoding exists so a frame can be
//! checked (or served back, in tests) without a real server.
//!
//! ## Accepted Input
//! ```text
//! *<argc>\r\n  ( $<len>\r\n <len bytes> \r\n ){argc}
//! ```

use std::io::{BufRead, Write};

use bytes::Bytes;

use crate::error::{RespackError, Result};
use super::framing::{CRLF, SYM_DOLLAR, SYM_STAR};
use super::PackedCommand;

/// Largest bulk string accepted by the decoder (512 MB, the Redis limit)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Longest header line accepted (`*` or `$`, 20 digits, CRLF)
const MAX_LINE_LEN: usize = 1 + 20 + 2;

// =============================================================================
// Buffer Decoding
// =============================================================================

/// Parse one command from the front of `buf`.
///
/// Returns `Ok(None)` when `buf` holds only part of a frame, otherwise the
/// arguments and the number of bytes consumed.
pub fn parse_command(buf: &[u8]) -> Result<Option<(Vec<Bytes>, usize)>> {
    let (argc, mut pos) = match parse_line(buf, SYM_STAR)? {
        Some(header) => header,
        None => return Ok(None),
    };

    let mut args = Vec::with_capacity(argc.min(1024));
    for _ in 0..argc {
        let (len, consumed) = match parse_line(&buf[pos..], SYM_DOLLAR)? {
            Some(prefix) => prefix,
            None => return Ok(None),
        };
        if len > MAX_BULK_LEN {
            return Err(RespackError::Protocol(format!(
                "Bulk string too large: {} bytes (max {})",
                len, MAX_BULK_LEN
            )));
        }
        pos += consumed;

        if buf.len() < pos + len + CRLF.len() {
            return Ok(None);
        }
        args.push(Bytes::copy_from_slice(&buf[pos..pos + len]));
        pos += len;

        if &buf[pos..pos + CRLF.len()] != CRLF {
            return Err(RespackError::Protocol(format!(
                "Missing CRLF after bulk string at offset {}",
                pos
            )));
        }
        pos += CRLF.len();
    }

    Ok(Some((args, pos)))
}

/// Decode exactly one complete command from `bytes`
pub fn decode_command(bytes: &[u8]) -> Result<Vec<Bytes>> {
    match parse_command(bytes)? {
        Some((args, consumed)) if consumed == bytes.len() => Ok(args),
        Some((_, consumed)) => Err(RespackError::Protocol(format!(
            "Trailing bytes after command: {} of {} consumed",
            consumed,
            bytes.len()
        ))),
        None => Err(RespackError::Protocol(format!(
            "Incomplete command: {} bytes",
            bytes.len()
        ))),
    }
}

/// Parse `<marker><decimal>\r\n` from the front of `buf`
fn parse_line(buf: &[u8], marker: u8) -> Result<Option<(usize, usize)>> {
    let end = match find_crlf(buf) {
        Some(end) => end,
        None if buf.len() >= MAX_LINE_LEN => {
            return Err(RespackError::Protocol(
                "Header line too long".to_string(),
            ))
        }
        None => return Ok(None),
    };

    let line = &buf[..end];
    if line.first() != Some(&marker) {
        return Err(RespackError::Protocol(format!(
            "Expected '{}', got {:?}",
            marker as char,
            line.first().map(|b| *b as char)
        )));
    }

    let value = parse_decimal(&line[1..])?;
    Ok(Some((value, end + CRLF.len())))
}

/// Index of the first `\r\n` in `buf`
fn find_crlf(buf: &[u8]) -> Option<usize> {
    let mut pos = 0;
    while let Some(offset) = memchr::memchr(b'\r', &buf[pos..]) {
        let cr = pos + offset;
        if buf.get(cr + 1) == Some(&b'\n') {
            return Some(cr);
        }
        pos = cr + 1;
    }
    None
}

fn parse_decimal(digits: &[u8]) -> Result<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(RespackError::Protocol(format!(
            "Invalid length: {:?}",
            String::from_utf8_lossy(digits)
        )));
    }
    digits.iter().try_fold(0usize, |acc, d| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(usize::from(d - b'0')))
            .ok_or_else(|| RespackError::Protocol("Length overflow".to_string()))
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Vec<Bytes>> {
    let argc = read_line(reader, SYM_STAR)?;

    let mut args = Vec::with_capacity(argc.min(1024));
    for _ in 0..argc {
        let len = read_line(reader, SYM_DOLLAR)?;
        if len > MAX_BULK_LEN {
            return Err(RespackError::Protocol(format!(
                "Bulk string too large: {} bytes (max {})",
                len, MAX_BULK_LEN
            )));
        }

        let mut data = vec![0u8; len + CRLF.len()];
        reader.read_exact(&mut data)?;
        if &data[len..] != CRLF {
            return Err(RespackError::Protocol(
                "Missing CRLF after bulk string".to_string(),
            ));
        }
        data.truncate(len);
        args.push(Bytes::from(data));
    }

    Ok(args)
}

fn read_line<R: BufRead>(reader: &mut R, marker: u8) -> Result<usize> {
    let mut line = Vec::with_capacity(MAX_LINE_LEN);
    let n = reader.read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(RespackError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stream closed before command header",
        )));
    }
    match parse_line(&line, marker)? {
        Some((value, consumed)) if consumed == line.len() => Ok(value),
        _ => Err(RespackError::Protocol(format!(
            "Malformed header line: {:?}",
            String::from_utf8_lossy(&line)
        ))),
    }
}

/// Write a packed command to a stream, one `write_all` per chunk
pub fn write_packed<W: Write>(writer: &mut W, packed: &PackedCommand) -> Result<()> {
    for chunk in packed.chunks() {
        writer.write_all(chunk)?;
    }
    writer.flush()?;
    Ok(())
}
