//! Client address extraction
//!
//! Scan and visit records take the first X-Forwarded-For entry verbatim.
//! The login limiter keys on the socket peer unless that peer is a
//! configured proxy.

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 缺少转发头时的占位值，照常参与哈希
pub const UNKNOWN_IP: &str = "unknown";

/// RFC 1918 / ULA / link-local / loopback; GeoIP is skipped for these
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            let head = v6.segments()[0];
            v6.is_loopback() || head & 0xfe00 == 0xfc00 || head & 0xffc0 == 0xfe80
        }
    }
}

/// `ip` or `ip:port`
fn parse_host(addr: &str) -> Option<IpAddr> {
    addr.parse::<SocketAddr>()
        .map(|sock| sock.ip())
        .or_else(|_| addr.parse::<IpAddr>())
        .ok()
}

pub fn is_trusted_proxy(peer: &str, trusted_proxies: &[String]) -> bool {
    let Some(peer) = parse_host(peer) else {
        return false;
    };
    trusted_proxies.iter().any(|entry| match entry.parse::<IpAddr>() {
        Ok(single) => single == peer,
        Err(_) => ip_in_cidr(&peer, entry),
    })
}

/// 前缀比较：`bits` 为地址位宽
fn same_prefix(a: u128, b: u128, bits: u32, prefix: u32) -> bool {
    if prefix > bits {
        return false;
    }
    if prefix == 0 {
        return true;
    }
    let shift = bits - prefix;
    (a >> shift) == (b >> shift)
}

pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let parsed = cidr
        .split_once('/')
        .and_then(|(net, len)| Some((net.parse::<IpAddr>().ok()?, len.parse::<u32>().ok()?)));
    let Some((network, prefix)) = parsed else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(a), IpAddr::V4(b)) => {
            same_prefix(u32::from(*a).into(), u32::from(b).into(), 32, prefix)
        }
        (IpAddr::V6(a), IpAddr::V6(b)) => same_prefix(u128::from(*a), u128::from(b), 128, prefix),
        _ => false,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// X-Forwarded-For 最左侧地址
pub fn first_forwarded_for(headers: &HeaderMap) -> Option<String> {
    let first = header_str(headers, "x-forwarded-for")?.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// Address recorded with scans and page visits
pub fn visitor_ip(headers: &HeaderMap) -> String {
    first_forwarded_for(headers).unwrap_or_else(|| UNKNOWN_IP.to_string())
}

/// Key for the login limiter
///
/// Forwarding headers count only when the socket peer is a trusted proxy.
pub fn rate_limit_ip(peer_ip: &str, headers: &HeaderMap, trusted_proxies: &[String]) -> String {
    if !is_trusted_proxy(peer_ip, trusted_proxies) {
        return peer_ip.to_string();
    }

    match first_forwarded_for(headers).or_else(|| header_str(headers, "x-real-ip").map(str::to_string)) {
        Some(client) => {
            debug!("Trusted proxy {} forwarded for {}", peer_ip, client);
            client
        }
        None => peer_ip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                HeaderName::from_static(k),
                HeaderValue::from_static(v),
            );
        }
        map
    }

    #[test]
    fn test_is_private_or_local() {
        assert!(is_private_or_local(&"10.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"192.168.1.1".parse().unwrap()));
        assert!(is_private_or_local(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"::1".parse().unwrap()));
        assert!(is_private_or_local(&"fd00::1".parse().unwrap()));
        assert!(!is_private_or_local(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_or_local(
            &"2001:4860:4860::8888".parse().unwrap()
        ));
    }

    #[test]
    fn test_ip_in_cidr() {
        let ip: IpAddr = "192.168.1.100".parse().unwrap();
        assert!(ip_in_cidr(&ip, "192.168.1.0/24"));
        assert!(!ip_in_cidr(&ip, "192.168.2.0/24"));
        assert!(!ip_in_cidr(&ip, "192.168.1.0/40"));
        assert!(ip_in_cidr(&ip, "0.0.0.0/0"));
        assert!(!ip_in_cidr(&ip, "garbage"));

        let ip6: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(ip_in_cidr(&ip6, "2001:db8::/32"));
        assert!(!ip_in_cidr(&ip6, "10.0.0.0/8"));
    }

    #[test]
    fn test_is_trusted_proxy() {
        let proxies = vec!["127.0.0.1".to_string(), "10.0.0.0/8".to_string()];
        assert!(is_trusted_proxy("127.0.0.1:8080", &proxies));
        assert!(is_trusted_proxy("10.1.2.3", &proxies));
        assert!(!is_trusted_proxy("8.8.8.8", &proxies));
        assert!(!is_trusted_proxy("not-an-ip", &proxies));
    }

    #[test]
    fn test_visitor_ip_uses_first_forwarded_entry() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(visitor_ip(&h), "203.0.113.7");
    }

    #[test]
    fn test_visitor_ip_unknown_without_header() {
        assert_eq!(visitor_ip(&HeaderMap::new()), UNKNOWN_IP);
        let h = headers(&[("x-real-ip", "203.0.113.7")]);
        assert_eq!(visitor_ip(&h), UNKNOWN_IP);
    }

    #[test]
    fn test_rate_limit_ip_ignores_forwarded_from_untrusted_peer() {
        let h = headers(&[("x-forwarded-for", "1.2.3.4")]);
        assert_eq!(rate_limit_ip("8.8.8.8", &h, &[]), "8.8.8.8");

        let proxies = vec!["10.0.0.0/8".to_string()];
        assert_eq!(rate_limit_ip("8.8.8.8", &h, &proxies), "8.8.8.8");
        assert_eq!(rate_limit_ip("10.0.0.5", &h, &proxies), "1.2.3.4");
    }
}
