//! Packet-level codec
//!
//! Decodes a full datagram into a map of schema fields and builds outgoing
//! packets. Values are dispatched on the schema wire-type category; short
//! numeric values are zero-extended on the left back to their natural width.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::core::{Error, Result};
use super::schema::{FieldKind, FieldTag};
use super::{tlv, EOL_TAG};

/// A decoded field value, tagged by wire-type category
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Double(f64),
    Float(f32),
    Uint(u64),
    Bool(bool),
    Text(String),
    Blob(Vec<u8>),
    Socket(SocketAddr),
}

impl FieldValue {
    /// Returns the value as an f64 if it is a double or float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(v) => Some(*v),
            FieldValue::Float(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the value as a u64 if it is an unsigned integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a bool if it is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as a socket address if it is one
    pub fn as_socket(&self) -> Option<SocketAddr> {
        match self {
            FieldValue::Socket(v) => Some(*v),
            _ => None,
        }
    }
}

/// Mapping from schema field to decoded value; one per packet or cached
/// per-SSRC snapshot
pub type FieldMap = HashMap<FieldTag, FieldValue>;

/// Decodes a big-endian double, zero-extending short values on the left
fn decode_double(vb: &[u8]) -> f64 {
    let mut raw = [0u8; 8];
    let n = vb.len().min(8);
    raw[8 - n..].copy_from_slice(&vb[..n]);
    f64::from_be_bytes(raw)
}

/// Decodes a big-endian float, zero-extending short values on the left
fn decode_float(vb: &[u8]) -> f32 {
    let mut raw = [0u8; 4];
    let n = vb.len().min(4);
    raw[4 - n..].copy_from_slice(&vb[..n]);
    f32::from_be_bytes(raw)
}

/// Decodes a big-endian unsigned integer of up to 8 bytes
fn decode_u64(vb: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    let n = vb.len().min(8);
    raw[8 - n..].copy_from_slice(&vb[..n]);
    u64::from_be_bytes(raw)
}

/// Decodes a single unsigned byte; an empty value is zero
fn decode_byte(vb: &[u8]) -> u64 {
    vb.first().copied().unwrap_or(0) as u64
}

/// Decodes a network socket address value.
///
/// 6 bytes are an IPv4 address and port; 10 bytes are treated as an 8-byte
/// IPv6 prefix and port (provisional, unverified against real IPv6 traffic).
/// Any other length is malformed.
fn decode_socket(vb: &[u8]) -> Result<SocketAddr> {
    match vb.len() {
        6 => {
            let addr = Ipv4Addr::new(vb[0], vb[1], vb[2], vb[3]);
            let port = u16::from_be_bytes([vb[4], vb[5]]);
            Ok(SocketAddr::new(IpAddr::V4(addr), port))
        }
        10 => {
            let mut octets = [0u8; 16];
            octets[8..].copy_from_slice(&vb[..8]);
            let port = u16::from_be_bytes([vb[8], vb[9]]);
            Ok(SocketAddr::new(IpAddr::V6(Ipv6Addr::from(octets)), port))
        }
        n => Err(Error::decode(format!(
            "socket address value has invalid length {}",
            n
        ))),
    }
}

/// Decodes one value according to its schema entry
fn decode_value(field: FieldTag, vb: &[u8]) -> Result<FieldValue> {
    Ok(match field.kind() {
        FieldKind::Double => FieldValue::Double(decode_double(vb)),
        FieldKind::Float => FieldValue::Float(decode_float(vb)),
        FieldKind::Uint => {
            if field.min_len() == 1 {
                FieldValue::Uint(decode_byte(vb))
            } else {
                FieldValue::Uint(decode_u64(vb))
            }
        }
        FieldKind::Bool => FieldValue::Bool(decode_u64(vb) != 0),
        FieldKind::Text => {
            let text = std::str::from_utf8(vb)
                .map_err(|e| Error::decode(format!("invalid UTF-8 in field {:?}: {}", field, e)))?;
            FieldValue::Text(text.to_string())
        }
        FieldKind::Blob => FieldValue::Blob(vb.to_vec()),
        FieldKind::Socket => FieldValue::Socket(decode_socket(vb)?),
    })
}

/// Decodes a datagram into a field map.
///
/// An EOL marker before any field has been accumulated is skipped, which also
/// swallows the leading 0x00 opcode byte of a status packet. An EOL after at
/// least one field terminates the packet. Tags outside the schema range are
/// logged and skipped with their bytes consumed so the record stream stays
/// aligned. Duplicate tags overwrite earlier occurrences.
pub fn decode_packet(buf: &[u8]) -> Result<FieldMap> {
    let mut fields = FieldMap::new();
    let mut remaining = buf;

    while remaining.len() >= 2 {
        let (tag, value, rest) = tlv::decode_record(remaining)?;
        remaining = rest;

        if tag == EOL_TAG {
            if !fields.is_empty() {
                break;
            }
            continue;
        }

        let field = match FieldTag::from_u8(tag) {
            Some(field) => field,
            None => {
                debug!(tag, len = value.len(), "skipping unknown field tag");
                continue;
            }
        };

        fields.insert(field, decode_value(field, value)?);
    }

    Ok(fields)
}

/// Builds an outgoing packet: opcode byte, TLV records, EOL marker
pub struct PacketBuilder {
    buf: BytesMut,
}

impl PacketBuilder {
    /// Starts a new packet with the given opcode byte
    pub fn new(opcode: u8) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u8(opcode);
        PacketBuilder { buf }
    }

    /// Appends a double field; NaN values are omitted
    pub fn double(mut self, tag: FieldTag, value: f64) -> Self {
        tlv::put_double(&mut self.buf, tag as u8, value);
        self
    }

    /// Appends a float field
    pub fn float(mut self, tag: FieldTag, value: f32) -> Self {
        tlv::put_record(&mut self.buf, tag as u8, &value.to_be_bytes());
        self
    }

    /// Appends an unsigned integer field
    pub fn uint(mut self, tag: FieldTag, value: u64) -> Self {
        tlv::put_u64(&mut self.buf, tag as u8, value);
        self
    }

    /// Appends a boolean field
    pub fn boolean(mut self, tag: FieldTag, value: bool) -> Self {
        tlv::put_u64(&mut self.buf, tag as u8, value as u64);
        self
    }

    /// Appends a string field
    pub fn text(mut self, tag: FieldTag, value: &str) -> Self {
        tlv::put_text(&mut self.buf, tag as u8, value);
        self
    }

    /// Appends a raw blob field without zero trimming.
    ///
    /// # Panics
    ///
    /// Panics if the blob exceeds 127 bytes, the limit of the short length
    /// form.
    pub fn blob(mut self, tag: FieldTag, value: &[u8]) -> Self {
        self.blob_raw(tag, value);
        self
    }

    /// Appends an IPv4 socket address field
    pub fn socket(mut self, tag: FieldTag, addr: Ipv4Addr, port: u16) -> Self {
        let mut raw = [0u8; 6];
        raw[..4].copy_from_slice(&addr.octets());
        raw[4..].copy_from_slice(&port.to_be_bytes());
        self.blob_raw(tag, &raw);
        self
    }

    fn blob_raw(&mut self, tag: FieldTag, value: &[u8]) {
        assert!(
            value.len() < 0x80,
            "value for {:?} is {} bytes; at most 127 fit the short length form",
            tag,
            value.len()
        );
        self.buf.put_u8(tag as u8);
        self.buf.put_u8(value.len() as u8);
        self.buf.put_slice(value);
    }

    /// Terminates the packet with the EOL marker and returns the bytes
    pub fn finish(mut self) -> Bytes {
        tlv::put_eol(&mut self.buf);
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{OPCODE_CONTROL, OPCODE_STATUS};

    fn from_hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_roundtrip_double() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .double(FieldTag::RadioFrequency, 7093000.0)
            .double(FieldTag::FirstLoFrequency, 0.0)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(
            fields[&FieldTag::RadioFrequency],
            FieldValue::Double(7093000.0)
        );
        assert_eq!(fields[&FieldTag::FirstLoFrequency], FieldValue::Double(0.0));
    }

    #[test]
    fn test_roundtrip_float() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .float(FieldTag::LowEdge, -1500.0)
            .float(FieldTag::HighEdge, 1500.0)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(fields[&FieldTag::LowEdge], FieldValue::Float(-1500.0));
        assert_eq!(fields[&FieldTag::HighEdge], FieldValue::Float(1500.0));
    }

    #[test]
    fn test_roundtrip_uint() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .uint(FieldTag::OutputSsrc, 9999991)
            .uint(FieldTag::OutputSamprate, 0)
            .uint(FieldTag::InputSamples, u64::MAX)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(fields[&FieldTag::OutputSsrc], FieldValue::Uint(9999991));
        assert_eq!(fields[&FieldTag::OutputSamprate], FieldValue::Uint(0));
        assert_eq!(fields[&FieldTag::InputSamples], FieldValue::Uint(u64::MAX));
    }

    #[test]
    fn test_roundtrip_bool() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .boolean(FieldTag::AgcEnable, true)
            .boolean(FieldTag::PllEnable, false)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(fields[&FieldTag::AgcEnable], FieldValue::Bool(true));
        assert_eq!(fields[&FieldTag::PllEnable], FieldValue::Bool(false));
    }

    #[test]
    fn test_roundtrip_text() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .text(FieldTag::Preset, "lsb")
            .text(FieldTag::Description, "")
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(fields[&FieldTag::Preset].as_str(), Some("lsb"));
        assert_eq!(fields[&FieldTag::Description].as_str(), Some(""));
    }

    #[test]
    fn test_roundtrip_blob_preserves_leading_zeros() {
        let data = [0u8, 0, 1, 2, 3];
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .blob(FieldTag::BinData, &data)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(fields[&FieldTag::BinData], FieldValue::Blob(data.to_vec()));
    }

    #[test]
    #[should_panic(expected = "short length form")]
    fn test_oversized_blob_panics() {
        let _ = PacketBuilder::new(OPCODE_STATUS).blob(FieldTag::BinData, &[0x2Fu8; 200]);
    }

    #[test]
    fn test_roundtrip_socket() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .socket(FieldTag::StatusDestSocket, Ipv4Addr::new(239, 135, 38, 120), 5006)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(
            fields[&FieldTag::StatusDestSocket].as_socket(),
            Some("239.135.38.120:5006".parse().unwrap())
        );
    }

    #[test]
    fn test_decode_socket_value() {
        let sock = decode_socket(&[0xEF, 0x87, 0x26, 0x78, 0x13, 0x8E]).unwrap();
        assert_eq!(sock, "239.135.38.120:5006".parse().unwrap());
    }

    #[test]
    fn test_decode_socket_wrong_size_fails() {
        assert!(matches!(
            decode_socket(&[1, 2, 3, 4, 5]),
            Err(crate::Error::Decode(_))
        ));
    }

    #[test]
    fn test_nan_double_is_omitted() {
        let pkt = PacketBuilder::new(OPCODE_CONTROL)
            .double(FieldTag::RadioFrequency, f64::NAN)
            .uint(FieldTag::OutputSsrc, 42)
            .finish();
        let fields = decode_packet(&pkt[1..]).unwrap();
        assert!(!fields.contains_key(&FieldTag::RadioFrequency));
        assert_eq!(fields[&FieldTag::OutputSsrc], FieldValue::Uint(42));
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        // Tag 200 is outside the schema; its record must be consumed without
        // aborting the rest of the packet
        let mut buf = vec![200u8, 2, 0xDE, 0xAD];
        buf.extend_from_slice(&PacketBuilder::new(OPCODE_STATUS)
            .double(FieldTag::RadioFrequency, 7093000.0)
            .finish()[1..]);
        let fields = decode_packet(&buf).unwrap();
        assert_eq!(
            fields[&FieldTag::RadioFrequency],
            FieldValue::Double(7093000.0)
        );
    }

    #[test]
    fn test_truncated_packet_fails() {
        // Declared length runs past the end of the buffer
        let buf = [0u8, 33, 8, 0x41, 0x5B];
        assert!(matches!(decode_packet(&buf), Err(crate::Error::Decode(_))));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let buf = [0u8, 85, 2, 0xFF, 0xFE, 0];
        assert!(matches!(decode_packet(&buf), Err(crate::Error::Decode(_))));
    }

    #[test]
    fn test_duplicate_tag_last_wins() {
        let pkt = PacketBuilder::new(OPCODE_STATUS)
            .uint(FieldTag::OutputSsrc, 1)
            .uint(FieldTag::OutputSsrc, 2)
            .finish();
        let fields = decode_packet(&pkt).unwrap();
        assert_eq!(fields[&FieldTag::OutputSsrc], FieldValue::Uint(2));
    }

    #[test]
    fn test_eol_terminates_after_fields() {
        let mut buf = Vec::from(
            &PacketBuilder::new(OPCODE_STATUS)
                .uint(FieldTag::OutputSsrc, 7)
                .finish()[..],
        );
        // Anything after the EOL marker must be ignored
        buf.extend_from_slice(&[33, 1, 0x41]);
        let fields = decode_packet(&buf).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[&FieldTag::OutputSsrc], FieldValue::Uint(7));
    }

    // Status datagram captured from a live ka9q-radio daemon
    const CAPTURED_STATUS: &str = "0012020f05010002000416766b34746d7a2034306d20454648572040206b6139710804ab891dc80506ef872678138e03081417480b804c216d0d0607b5a26000000a0403dcc4ff660101180062043fbbb29861006e04bfb33333630019001a001b006404466a600065044be85c605201102108414d55c40000000022002308c14d55c4000000002a0313c6802b0304f1a14d002d04c1387f3c68020b306c0506be762ed32f04c2f6dc743000550375736239003300530441000000540440e00000380024003e010140043f8ccccd4304c1700000410441a0000032002704424800002804453b8000140255f0160363cd6f2904413000002c002e04c2af3d954504c1e697764404426aee024604ab8916c847003f04c170000025002600310101100600000000a26d1106efcdcd2f138c1300150303fdff6901626a01196b010248004f0447bbbe8050043d730abf6701190600170000";

    #[test]
    fn test_decode_captured_status_packet() {
        let data = from_hex(CAPTURED_STATUS);
        let fields = decode_packet(&data).unwrap();

        assert_eq!(fields[&FieldTag::OutputSsrc], FieldValue::Uint(3845));
        assert_eq!(
            fields[&FieldTag::RadioFrequency],
            FieldValue::Double(3_845_000.0)
        );
        assert_eq!(fields[&FieldTag::Preset].as_str(), Some("usb"));
        assert_eq!(
            fields[&FieldTag::Description].as_str(),
            Some("vk4tmz 40m EFHW @ ka9q")
        );
        assert_eq!(
            fields[&FieldTag::StatusDestSocket].as_socket(),
            Some("239.135.38.120:5006".parse().unwrap())
        );
        assert_eq!(fields[&FieldTag::AgcEnable], FieldValue::Bool(true));
    }
}
