//! Core types and constants shared across the library
//!
//! This module contains the error type, channel configuration, and the
//! protocol-wide constants used by both channels.

pub mod error;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::ChannelConfig;

/// Default multicast group name advertised by ka9q-radio daemons
pub const DEFAULT_MCAST_GROUP: &str = "hf.local";

/// Default RTP data port on the multicast group
pub const DEFAULT_RTP_PORT: u16 = 5004;

/// Default RTCP port on the multicast group
pub const DEFAULT_RTCP_PORT: u16 = 5005;

/// Default status/control port on the multicast group
pub const DEFAULT_STAT_PORT: u16 = 5006;

/// Maximum datagram size accepted by the receive loop
pub const MAX_PACKET_SIZE: usize = 2048;

/// Multicast TTL for outbound control traffic; directives must stay on the
/// local network segment
pub const CONTROL_TTL: u32 = 1;

/// Datagrams at or below this size are not status packets
pub const STATUS_SIZE_MIN: usize = 300;

/// Datagrams at or above this size are spectrum/IQ traffic, not status
pub const STATUS_SIZE_MAX: usize = 500;
