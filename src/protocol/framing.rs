//! Framing primitives shared by both packers.

use bytes::{BufMut, BytesMut};

/// Array marker
pub const SYM_STAR: u8 = b'*';

/// Bulk string marker
pub const SYM_DOLLAR: u8 = b'$';

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Append `*<argc>\r\n`
pub fn write_array_header(buf: &mut BytesMut, argc: usize) {
    buf.put_u8(SYM_STAR);
    buf.put_slice(itoa::Buffer::new().format(argc).as_bytes());
    buf.put_slice(CRLF);
}

/// Append `$<len>\r\n`
pub fn write_bulk_prefix(buf: &mut BytesMut, len: usize) {
    buf.put_u8(SYM_DOLLAR);
    buf.put_slice(itoa::Buffer::new().format(len).as_bytes());
    buf.put_slice(CRLF);
}

/// Total framed size of a command whose encoded arguments have these lengths
pub fn frame_len<I>(arg_lens: I) -> usize
where
    I: IntoIterator<Item = usize>,
{
    let mut argc = 0;
    let mut total = 0;
    for len in arg_lens {
        argc += 1;
        total += 1 + decimal_width(len) + CRLF.len() + len + CRLF.len();
    }
    total + 1 + decimal_width(argc) + CRLF.len()
}

fn decimal_width(n: usize) -> usize {
    itoa::Buffer::new().format(n).len()
}
