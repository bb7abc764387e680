//! Client identification utilities
//!
//! Derives the rate-limit partition key for a request from proxy headers.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Identifier returned when nothing in the request names the client
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers carrying a single client address, in precedence order
/// after `x-forwarded-for`.
const SINGLE_ADDRESS_HEADERS: [&str; 3] = ["cf-connecting-ip", "fly-client-ip", "true-client-ip"];

/// Resolve a stable per-client identifier
///
/// Precedence, first non-empty match wins:
/// 1. first entry of `x-forwarded-for`
/// 2. `cf-connecting-ip`, `fly-client-ip`, `true-client-ip`
/// 3. the socket's remote address
/// 4. `"unknown"`
///
/// Values are not validated as IP addresses. The result is a best-effort
/// partition key and must not be treated as an authenticated identity.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `remote_ip` - Address of the directly connected peer, if known
pub fn get_client_identifier(headers: &HeaderMap, remote_ip: Option<IpAddr>) -> String {
    if let Some(first) = header_str(headers, "x-forwarded-for")
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return first.to_string();
    }

    SINGLE_ADDRESS_HEADERS
        .iter()
        .find_map(|name| header_str(headers, name).filter(|v| !v.is_empty()))
        .map(str::to_string)
        .or_else(|| remote_ip.map(|ip| ip.to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_xff_wins_over_cloudflare() {
        let headers = headers(&[
            ("x-forwarded-for", "203.0.113.1, 203.0.113.2"),
            ("cf-connecting-ip", "198.51.100.1"),
        ]);
        assert_eq!(get_client_identifier(&headers, None), "203.0.113.1");
    }

    #[test]
    fn test_xff_is_trimmed() {
        let headers = headers(&[("x-forwarded-for", "   192.0.2.7   ,10.0.0.1")]);
        assert_eq!(get_client_identifier(&headers, None), "192.0.2.7");
    }

    #[test]
    fn test_blank_xff_falls_through() {
        let headers = headers(&[
            ("x-forwarded-for", " , 10.0.0.1"),
            ("fly-client-ip", "198.51.100.9"),
        ]);
        assert_eq!(get_client_identifier(&headers, None), "198.51.100.9");
    }

    #[test]
    fn test_single_address_header_order() {
        let headers_all = headers(&[
            ("true-client-ip", "192.0.2.3"),
            ("fly-client-ip", "192.0.2.2"),
            ("cf-connecting-ip", "192.0.2.1"),
        ]);
        assert_eq!(get_client_identifier(&headers_all, None), "192.0.2.1");

        let headers_fly = headers(&[
            ("true-client-ip", "192.0.2.3"),
            ("fly-client-ip", "192.0.2.2"),
        ]);
        assert_eq!(get_client_identifier(&headers_fly, None), "192.0.2.2");

        let headers_true = headers(&[("true-client-ip", "192.0.2.3")]);
        assert_eq!(get_client_identifier(&headers_true, None), "192.0.2.3");
    }

    #[test]
    fn test_values_are_not_validated() {
        let headers = headers(&[("cf-connecting-ip", "not-an-ip")]);
        assert_eq!(get_client_identifier(&headers, None), "not-an-ip");
    }

    #[test]
    fn test_socket_fallback() {
        let remote: IpAddr = "10.0.0.5".parse().unwrap();
        assert_eq!(
            get_client_identifier(&HeaderMap::new(), Some(remote)),
            "10.0.0.5"
        );
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(get_client_identifier(&HeaderMap::new(), None), "unknown");
    }
}
