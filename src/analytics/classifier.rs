//! User-agent classification.
//!
//! Pure, deterministic substring tests; first match wins. The label
//! sets and test order are fixed: changing either silently reshuffles
//! every stored breakdown, so treat them as part of the data contract.

/// Device category for a raw user-agent string.
///
/// `mobile` before `tablet`: an Android tablet UA containing "Mobi"
/// counts as mobile.
pub fn device(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();
    if ua.contains("mobi") || ua.contains("android") {
        "mobile"
    } else if ua.contains("tablet") || ua.contains("ipad") {
        "tablet"
    } else {
        "desktop"
    }
}

/// Browser name for a raw user-agent string.
///
/// Chrome is tested first, so Chromium-based Edge and Opera UAs (which
/// also advertise "Chrome") classify as Chrome.
pub fn browser(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();
    if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("safari") {
        "Safari"
    } else if ua.contains("edge") {
        "Edge"
    } else if ua.contains("opera") {
        "Opera"
    } else {
        "unknown"
    }
}

/// Operating system for a raw user-agent string.
///
/// Not stored on click events; the aggregator re-derives it from the
/// raw user-agent. Tests are case-sensitive and ordered, so an Android
/// UA advertising "Linux" classifies as Linux.
pub fn os(user_agent: &str) -> &'static str {
    if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("Mac") {
        "macOS"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else if user_agent.contains("Android") {
        "Android"
    } else if user_agent.contains("iOS") {
        "iOS"
    } else {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_is_mobile() {
        assert_eq!(device("Mozilla/5.0 (Linux; Android 10)"), "mobile");
    }

    #[test]
    fn ipad_is_tablet() {
        assert_eq!(device("Mozilla/5.0 (iPad; CPU OS 14_0)"), "tablet");
    }

    #[test]
    fn plain_ua_is_desktop() {
        assert_eq!(device("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"), "desktop");
        assert_eq!(device(""), "desktop");
    }

    #[test]
    fn chrome_wins_over_safari_token() {
        // Chrome UAs also advertise Safari; Chrome is tested first.
        assert_eq!(
            browser("Mozilla/5.0 AppleWebKit/537.36 Chrome/91.0 Safari/537.36"),
            "Chrome"
        );
    }

    #[test]
    fn safari_without_chrome() {
        assert_eq!(
            browser("Mozilla/5.0 (Macintosh) AppleWebKit/605.1.15 Version/14.0 Safari/605.1.15"),
            "Safari"
        );
    }

    #[test]
    fn firefox_and_unknown() {
        assert_eq!(browser("Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/89.0"), "Firefox");
        assert_eq!(browser("curl/8.0"), "unknown");
        assert_eq!(browser(""), "unknown");
    }

    #[test]
    fn chromium_edge_reports_chrome() {
        assert_eq!(
            browser("Mozilla/5.0 AppleWebKit/537.36 Chrome/91.0 Safari/537.36 Edg/91.0"),
            "Chrome"
        );
    }

    #[test]
    fn os_order_is_fixed() {
        assert_eq!(os("Mozilla/5.0 (Windows NT 10.0)"), "Windows");
        assert_eq!(os("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15)"), "macOS");
        // Android UAs advertise Linux, which is tested first.
        assert_eq!(os("Mozilla/5.0 (Linux; Android 10)"), "Linux");
        assert_eq!(os("Android 10 Dalvik"), "Android");
        assert_eq!(os(""), "Unknown");
    }

    #[test]
    fn classification_is_deterministic() {
        let ua = "Mozilla/5.0 (Linux; Android 10) Chrome/91.0";
        for _ in 0..3 {
            assert_eq!(device(ua), "mobile");
            assert_eq!(browser(ua), "Chrome");
            assert_eq!(os(ua), "Linux");
        }
    }
}
