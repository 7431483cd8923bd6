use std::net::IpAddr;

use tracing::warn;
use trust_dns_resolver::TokioAsyncResolver;

use crate::core::{Error, Result};

/// Resolves a multicast group name to an IP address.
///
/// Literal addresses short-circuit the resolver. A group that cannot be
/// resolved is fatal to channel construction; both channels are useless
/// without it.
pub async fn resolve_group(name: &str) -> Result<IpAddr> {
    if let Ok(addr) = name.parse::<IpAddr>() {
        return Ok(addr);
    }

    let resolver = TokioAsyncResolver::tokio_from_system_conf()
        .map_err(|e| Error::resolve(format!("failed to build resolver: {}", e)))?;

    let response = resolver
        .lookup_ip(name)
        .await
        .map_err(|e| Error::resolve(format!("failed to resolve group {}: {}", name, e)))?;

    let mut addrs = response.iter();
    let addr = addrs
        .next()
        .ok_or_else(|| Error::resolve(format!("no addresses for group {}", name)))?;
    if addrs.next().is_some() {
        warn!(group = name, %addr, "multiple addresses for group, using first");
    }

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_literal_address_short_circuits() {
        let addr = resolve_group("239.135.38.120").await.unwrap();
        assert_eq!(addr, IpAddr::V4(Ipv4Addr::new(239, 135, 38, 120)));
    }
}
