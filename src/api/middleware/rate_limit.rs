//! Rate limiting middleware using token bucket algorithm.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// How the client IP used as rate-limit key is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIp {
    /// Socket peer address. Requires `ConnectInfo<SocketAddr>`.
    Peer,
    /// `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling back to the peer
    /// address. Only safe behind a trusted reverse proxy.
    Forwarded,
}

impl ClientIp {
    pub fn from_proxy_flag(behind_proxy: bool) -> Self {
        if behind_proxy {
            ClientIp::Forwarded
        } else {
            ClientIp::Peer
        }
    }
}

impl KeyExtractor for ClientIp {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        match self {
            ClientIp::Peer => PeerIpKeyExtractor.extract(req),
            ClientIp::Forwarded => SmartIpKeyExtractor.extract(req),
        }
    }
}

pub type RateLimitLayer = GovernorLayer<ClientIp, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build(client_ip: ClientIp, per_second: u64, burst_size: u32) -> RateLimitLayer {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(client_ip)
        .per_second(per_second)
        .burst_size(burst_size)
        .finish()
        .expect("rate limit period and burst size are non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}

/// Rate limiter for public pages.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer(client_ip: ClientIp) -> RateLimitLayer {
    build(client_ip, 2, 100)
}

/// Stricter rate limiter for the admin API and admin pages.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 30 requests
pub fn secure_layer(client_ip: ClientIp) -> RateLimitLayer {
    build(client_ip, 1, 30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ConnectInfo;
    use std::net::SocketAddr;

    fn request(forwarded_for: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/");
        if let Some(ip) = forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        let mut req = builder.body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo("10.0.0.1:4000".parse::<SocketAddr>().unwrap()));
        req
    }

    #[test]
    fn test_peer_ignores_forwarded_header() {
        let ip = ClientIp::Peer.extract(&request(Some("203.0.113.7"))).unwrap();
        assert_eq!(ip, "10.0.0.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_forwarded_prefers_header() {
        let ip = ClientIp::Forwarded
            .extract(&request(Some("203.0.113.7")))
            .unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_from_proxy_flag() {
        assert_eq!(ClientIp::from_proxy_flag(true), ClientIp::Forwarded);
        assert_eq!(ClientIp::from_proxy_flag(false), ClientIp::Peer);
    }
}
