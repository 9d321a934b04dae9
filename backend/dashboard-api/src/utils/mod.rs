// Request helpers shared by handlers

use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::HeaderMap};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Parse a path id, naming the entity in the error.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {entity} ID")))
}

/// Caller address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|ConnectInfo(addr)| addr.ip().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        let peer = ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000)));

        assert_eq!(client_ip(&headers, Some(&peer)).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let peer = ConnectInfo(SocketAddr::from(([192, 168, 1, 5], 4000)));
        assert_eq!(
            client_ip(&HeaderMap::new(), Some(&peer)).as_deref(),
            Some("192.168.1.5")
        );
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8", "app").is_ok());
        match parse_id("42", "app") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid app ID"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
