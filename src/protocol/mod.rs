//! Wire protocol implementation
//!
//! This module implements the ka9q-radio metadata protocol: the static field
//! schema, the TLV record codec, and the packet codec that turns a datagram
//! into a field map and back.

pub mod packet;
pub mod schema;
pub mod tlv;

pub use self::packet::{decode_packet, FieldMap, FieldValue, PacketBuilder};
pub use self::schema::{FieldKind, FieldTag};

/// Reserved tag value marking the end of a field sequence
pub const EOL_TAG: u8 = 0;

/// Highest tag currently defined by the schema; anything above is skipped
pub const MAX_FIELD_TAG: u8 = 110;

/// Leading opcode byte of a status update packet
pub const OPCODE_STATUS: u8 = 0;

/// Leading opcode byte of a control directive packet
pub const OPCODE_CONTROL: u8 = 1;

/// Mode presets understood by ka9q-radio daemons
pub const KA9Q_PRESETS: &[&str] = &[
    "lsb", "usb", "cwl", "cwu", "am", "sam", "dsb", "amsq", "fm", "nfm", "wfm", "pm", "npm",
    "wpm", "iq", "ame", "wspr", "spectrum",
];

/// Converts a dB value to a power ratio
pub fn db_to_power(x: f64) -> f64 {
    10.0_f64.powf(x / 10.0)
}

/// Converts a power ratio to dB
pub fn power_to_db(x: f64) -> f64 {
    10.0 * x.log10()
}

/// Converts a dB value to a voltage ratio
pub fn db_to_voltage(x: f64) -> f64 {
    10.0_f64.powf(x / 20.0)
}

/// Converts a voltage ratio to dB
pub fn voltage_to_db(x: f64) -> f64 {
    20.0 * x.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversions() {
        assert!((db_to_power(10.0) - 10.0).abs() < 1e-12);
        assert!((power_to_db(100.0) - 20.0).abs() < 1e-12);
        assert!((db_to_voltage(20.0) - 10.0).abs() < 1e-12);
        assert!((voltage_to_db(10.0) - 20.0).abs() < 1e-12);
    }
}
