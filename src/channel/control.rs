use std::net::IpAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::debug;

use crate::core::{ChannelConfig, Error, Result};
use crate::protocol::{FieldTag, PacketBuilder, OPCODE_CONTROL};

use super::{resolve, socket};

/// Outbound multicast sender for control directives
pub struct ControlChannel {
    /// Resolved multicast group address
    group_ip: IpAddr,
    /// Status/control port on the group
    status_port: u16,
    /// Bound on a single send so a full socket buffer cannot block forever
    send_timeout: Duration,
    /// Outbound socket, multicast TTL 1
    socket: UdpSocket,
}

impl ControlChannel {
    /// Creates a new control channel for the configured multicast group.
    ///
    /// Fails if the group name cannot be resolved.
    pub async fn new(config: &ChannelConfig) -> Result<Self> {
        let group_ip = resolve::resolve_group(&config.group).await?;
        let socket = socket::multicast_sender()?;

        Ok(ControlChannel {
            group_ip,
            status_port: config.status_port,
            send_timeout: config.socket_timeout,
            socket,
        })
    }

    /// Requests a retune of the given stream to `frequency_hz` with the given
    /// mode preset.
    ///
    /// Returns the randomly generated command tag so a caller can correlate a
    /// future response; response correlation itself is not implemented here.
    /// Transient send errors surface to the caller; retry policy is a caller
    /// concern.
    pub async fn set_frequency(&self, frequency_hz: f64, preset: &str, ssrc: u32) -> Result<u32> {
        let command_tag: u32 = rand::random();
        let packet = Self::tune_command(frequency_hz, preset, ssrc, command_tag);

        debug!(
            frequency_hz,
            preset,
            ssrc,
            command_tag,
            len = packet.len(),
            "sending tune directive"
        );

        timeout(
            self.send_timeout,
            self.socket.send_to(&packet, (self.group_ip, self.status_port)),
        )
        .await
        .map_err(|_| Error::transport("control send timed out"))?
        .map_err(|e| Error::transport(format!("failed to send control directive: {}", e)))?;

        Ok(command_tag)
    }

    /// Builds a tune directive packet
    fn tune_command(frequency_hz: f64, preset: &str, ssrc: u32, command_tag: u32) -> Bytes {
        PacketBuilder::new(OPCODE_CONTROL)
            .double(FieldTag::RadioFrequency, frequency_hz)
            .text(FieldTag::Preset, preset)
            .uint(FieldTag::OutputSsrc, ssrc as u64)
            .uint(FieldTag::CommandTag, command_tag as u64)
            .finish()
    }
}
