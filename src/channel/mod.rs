//! Multicast control and status channels
//!
//! This module provides the outbound control channel, the inbound status
//! channel with its per-SSRC cache, and the shared socket and name-resolution
//! plumbing both are built on.

mod control;
mod resolve;
mod socket;
mod status;

pub use self::control::ControlChannel;
pub use self::resolve::resolve_group;
pub use self::status::StatusChannel;
