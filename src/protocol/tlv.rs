//! Tag–length–value record codec
//!
//! Record-level decode and encode, independent of field semantics. Decode
//! understands both the short length form and the extended length-of-length
//! form; encode only emits the short form, which is sufficient for the small
//! values carried in outgoing control directives.

use bytes::{BufMut, BytesMut};

use crate::core::{Error, Result};
use super::EOL_TAG;

/// Decodes one TLV record from the front of `buf`.
///
/// Returns the wire tag, the value bytes, and the remaining bytes after the
/// record. The EOL tag consumes a single byte and carries no value.
pub fn decode_record(buf: &[u8]) -> Result<(u8, &[u8], &[u8])> {
    let (&tag, rest) = buf
        .split_first()
        .ok_or_else(|| Error::decode("empty buffer at record start"))?;

    if tag == EOL_TAG {
        return Ok((tag, &[], rest));
    }

    let (&len_byte, rest) = rest
        .split_first()
        .ok_or_else(|| Error::decode(format!("truncated record: tag {} has no length", tag)))?;

    let (value_len, rest) = if len_byte < 0x80 {
        (len_byte as usize, rest)
    } else {
        // Extended form: the low bits give the count of big-endian length
        // bytes that follow (1..=4)
        let n = (len_byte - 0x80) as usize;
        if n == 0 || n > 4 {
            return Err(Error::decode(format!(
                "invalid length-of-length byte {:#04x} for tag {}",
                len_byte, tag
            )));
        }
        if rest.len() < n {
            return Err(Error::decode(format!(
                "truncated extended length for tag {}: need {} bytes, have {}",
                tag,
                n,
                rest.len()
            )));
        }
        let mut len = 0usize;
        for &b in &rest[..n] {
            len = (len << 8) | b as usize;
        }
        (len, &rest[n..])
    };

    if rest.len() < value_len {
        return Err(Error::decode(format!(
            "truncated value for tag {}: declared {} bytes, have {}",
            tag,
            value_len,
            rest.len()
        )));
    }

    Ok((tag, &rest[..value_len], &rest[value_len..]))
}

/// Appends one TLV record, trimming leading zero bytes from the value.
///
/// Big-endian numeric values are canonicalized to their shortest form; an
/// all-zero value encodes with length 0.
///
/// # Panics
///
/// Panics if the trimmed value exceeds 127 bytes; a length byte of 0x80 or
/// above would be read back as an extended length-of-length marker.
pub fn put_record(buf: &mut BytesMut, tag: u8, value: &[u8]) {
    let start = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    let trimmed = &value[start..];
    assert!(
        trimmed.len() < 0x80,
        "value for tag {} is {} bytes; at most 127 fit the short length form",
        tag,
        trimmed.len()
    );

    buf.put_u8(tag);
    buf.put_u8(trimmed.len() as u8);
    buf.put_slice(trimmed);
}

/// Appends a string record; string bytes are not trimmed.
///
/// # Panics
///
/// Panics if the string exceeds 127 bytes, the limit of the short length
/// form.
pub fn put_text(buf: &mut BytesMut, tag: u8, value: &str) {
    let bytes = value.as_bytes();
    assert!(
        bytes.len() < 0x80,
        "string for tag {} is {} bytes; at most 127 fit the short length form",
        tag,
        bytes.len()
    );
    buf.put_u8(tag);
    buf.put_u8(bytes.len() as u8);
    buf.put_slice(bytes);
}

/// Appends a double record; NaN is never transmitted
pub fn put_double(buf: &mut BytesMut, tag: u8, value: f64) {
    if value.is_nan() {
        return;
    }
    put_record(buf, tag, &value.to_be_bytes());
}

/// Appends an unsigned integer record in minimal big-endian form
pub fn put_u64(buf: &mut BytesMut, tag: u8, value: u64) {
    put_record(buf, tag, &value.to_be_bytes());
}

/// Appends the end-of-list marker
pub fn put_eol(buf: &mut BytesMut) {
    buf.put_u8(EOL_TAG);
}
