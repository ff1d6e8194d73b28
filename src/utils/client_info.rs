//! 访客信息：IP 哈希与 User-Agent 粗分类

use serde::Serialize;
use sha2::{Digest, Sha256};

/// IP 哈希保留的十六进制字符数
pub const IP_HASH_LEN: usize = 16;

/// SHA-256(ip) 的十六进制前 16 位，不保存原始 IP
pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(IP_HASH_LEN);
    digest
}

/// 由 User-Agent 推断出的设备 / 浏览器 / 系统
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub device: String,
    pub browser: String,
    pub os: String,
}

/// 子串匹配分类，大小写不敏感，按固定顺序取第一个命中
///
/// 顺序有意义：Edge 的 UA 同时包含 "chrome"，Android 的 UA 同时包含 "linux"，
/// 因此 Android 设备会被归为 Linux。
pub fn parse_user_agent(user_agent: &str) -> ClientInfo {
    let ua = user_agent.to_lowercase();

    let device = if ua.contains("mobile") {
        "mobile"
    } else if ua.contains("tablet") || ua.contains("ipad") {
        "tablet"
    } else {
        "desktop"
    };

    let browser = if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("edg") {
        "Edge"
    } else if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else if ua.contains("opera") || ua.contains("opr") {
        "Opera"
    } else {
        "unknown"
    };

    let os = if ua.contains("windows") {
        "Windows"
    } else if ua.contains("macintosh") || ua.contains("mac os") {
        "macOS"
    } else if ua.contains("linux") {
        "Linux"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        "iOS"
    } else {
        "unknown"
    };

    ClientInfo {
        device: device.to_string(),
        browser: browser.to_string(),
        os: os.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const EDGE_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const CHROME_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

    #[test]
    fn test_hash_ip_is_stable_and_truncated() {
        let a = hash_ip("203.0.113.7");
        let b = hash_ip("203.0.113.7");
        assert_eq!(a, b);
        assert_eq!(a.len(), IP_HASH_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_ip("203.0.113.8"));
    }

    #[test]
    fn test_hash_ip_known_value() {
        // sha256("unknown") = b23a6a84...
        let h = hash_ip("unknown");
        assert_eq!(h, "b23a6a8439c0dde5");
    }

    #[test]
    fn test_chrome_on_windows() {
        let info = parse_user_agent(CHROME_WIN);
        assert_eq!(info.device, "desktop");
        assert_eq!(info.browser, "Chrome");
        assert_eq!(info.os, "Windows");
    }

    #[test]
    fn test_edge_wins_over_chrome() {
        assert_eq!(parse_user_agent(EDGE_WIN).browser, "Edge");
    }

    #[test]
    fn test_iphone_safari() {
        let info = parse_user_agent(SAFARI_IPHONE);
        assert_eq!(info.device, "mobile");
        assert_eq!(info.browser, "Safari");
        // "like Mac OS X" 先命中 macOS
        assert_eq!(info.os, "macOS");
    }

    #[test]
    fn test_firefox_on_linux() {
        let info = parse_user_agent(FIREFOX_LINUX);
        assert_eq!(info.device, "desktop");
        assert_eq!(info.browser, "Firefox");
        assert_eq!(info.os, "Linux");
    }

    #[test]
    fn test_android_reports_linux() {
        let info = parse_user_agent(CHROME_ANDROID);
        assert_eq!(info.device, "mobile");
        assert_eq!(info.os, "Linux");
    }

    #[test]
    fn test_android_without_linux_token() {
        assert_eq!(parse_user_agent("SomeApp (Android 14)").os, "Android");
        assert_eq!(parse_user_agent("Tablet; iPad").device, "tablet");
    }

    #[test]
    fn test_empty_user_agent() {
        let info = parse_user_agent("");
        assert_eq!(info.device, "desktop");
        assert_eq!(info.browser, "unknown");
        assert_eq!(info.os, "unknown");
    }
}
