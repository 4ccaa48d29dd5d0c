use super::*;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;

/// `Resolver` fetches the current members of a service.
///
/// It is called once when a watch starts and then once per tick.
/// Implementations are shared between watchers so they must be safe to call concurrently.
#[async_trait::async_trait]
pub trait Resolver: Sync + Send + 'static {
    async fn resolve_members(&self, service: &ServiceName) -> Result<MemberSet>;
}

#[async_trait::async_trait]
impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    async fn resolve_members(&self, service: &ServiceName) -> Result<MemberSet> {
        (**self).resolve_members(service).await
    }
}

/// `DnsResolver` looks the service name up with the platform resolver.
/// Every address record becomes one member.
#[derive(Clone, Copy, Debug, Default)]
pub struct DnsResolver;

#[async_trait::async_trait]
impl Resolver for DnsResolver {
    async fn resolve_members(&self, service: &ServiceName) -> Result<MemberSet> {
        // The port is required by the lookup but ignored.
        let addrs = tokio::net::lookup_host((service.as_str(), 0u16))
            .await
            .with_context(|| format!("could not retrieve peer ip addresses of {service}"))?;
        let members = addrs.map(|addr| addr.ip().to_string()).collect();
        Ok(members)
    }
}

/// Returns the IP address of the interface used for outbound traffic.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub async fn local_ip() -> Result<String> {
    let probe = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0u16)).await?;
    socket
        .connect(probe)
        .await
        .context("attempt to connect to derive local ip failed")?;
    let local_addr = socket.local_addr()?;
    Ok(local_addr.ip().to_string())
}
