//! ka9q-link: multicast control and status channels for ka9q-radio style SDR daemons
//!
//! This library implements the self-describing TLV metadata protocol spoken by
//! ka9q-radio receivers: a control channel for tuning commands and a status
//! channel that caches the latest telemetry snapshot per SSRC.

pub mod channel;
pub mod core;
pub mod protocol;

// Re-export commonly used items
pub use crate::core::{ChannelConfig, Error, Result};
pub use channel::{ControlChannel, StatusChannel};
pub use protocol::{FieldKind, FieldMap, FieldTag, FieldValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
