use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::core::{Result, CONTROL_TTL};

/// Creates a socket joined to the status multicast group.
///
/// The address and port are shared with other listeners on the host, so the
/// socket is bound with SO_REUSEADDR (and SO_REUSEPORT where available)
/// before joining the group on all interfaces.
pub fn multicast_listener(group: Ipv4Addr, port: u16) -> Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    socket.bind(&bind_addr.into())?;
    socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
    socket.set_nonblocking(true)?;

    Ok(UdpSocket::from_std(socket.into())?)
}

/// Creates the outbound control socket with multicast TTL 1 so directives
/// never cross a routed network boundary.
pub fn multicast_sender() -> Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_multicast_ttl_v4(CONTROL_TTL)?;
    socket.set_nonblocking(true)?;

    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
    socket.bind(&bind_addr.into())?;

    Ok(UdpSocket::from_std(socket.into())?)
}
