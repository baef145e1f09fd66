//! Navigation policy helpers shared by every integration
//!
//! These sit around the engine: which pages are never checked, which visits
//! are reported, and where a blocked navigation is sent.

use ::url::Url;

/// Reason passed to the notice page when the matched rule has none.
pub const DEFAULT_NOTICE_REASON: &str = "This site has been blocked";

/// File name of the notice page; navigations to it are never checked.
pub const NOTICE_PAGE: &str = "blocked.html";

const INTERNAL_PREFIXES: [&str; 2] = ["chrome://", "chrome-extension://"];
const UNTRACKED_SCHEMES: [&str; 3] = ["chrome", "chrome-extension", "about"];
const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Error type for policy helpers.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Invalid notice page URL: {0}")]
    InvalidNoticePage(#[from] ::url::ParseError),
}

/// Browser-internal pages are never checked against the blocklist.
#[inline]
pub fn is_internal_page(url: &str) -> bool {
    INTERNAL_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Navigations to the notice page itself are never checked.
#[inline]
pub fn is_notice_page(url: &str) -> bool {
    url.contains(NOTICE_PAGE)
}

/// Whether a visit to `url` should be reported to the tracking server.
pub fn should_track_url(url: &str, track_local: bool) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if UNTRACKED_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }

    let host = parsed.host_str().unwrap_or("");
    if !track_local && LOCAL_HOSTS.contains(&host) {
        log::debug!("skipping local URL {}", url);
        return false;
    }

    true
}

/// Build the notice page URL for a blocked navigation.
///
/// Adds `url`, `reason` and, when known, `referrer` as query parameters.
pub fn notice_url(
    notice_page: &str,
    blocked_url: &str,
    reason: Option<&str>,
    referrer: Option<&str>,
) -> Result<Url, PolicyError> {
    let mut url = Url::parse(notice_page)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("url", blocked_url);
        query.append_pair("reason", reason.unwrap_or(DEFAULT_NOTICE_REASON));
        if let Some(referrer) = referrer.filter(|r| !r.is_empty()) {
            query.append_pair("referrer", referrer);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_internal_page() {
        assert!(is_internal_page("chrome://settings"));
        assert!(is_internal_page("chrome-extension://abc/ui/options.html"));
        assert!(!is_internal_page("https://chrome.google.com/"));
    }

    #[test]
    fn test_is_notice_page() {
        assert!(is_notice_page("chrome-extension://abc/ui/blocked/blocked.html?url=x"));
        assert!(!is_notice_page("https://example.com/"));
    }

    #[test]
    fn test_should_track_url() {
        assert!(should_track_url("https://example.com/a", false));
        assert!(!should_track_url("chrome://history", false));
        assert!(!should_track_url("chrome-extension://abc/popup.html", false));
        assert!(!should_track_url("about:blank", false));
        assert!(!should_track_url("not a url", false));
    }

    #[test]
    fn test_should_track_local() {
        assert!(!should_track_url("http://localhost:1978/", false));
        assert!(!should_track_url("http://127.0.0.1/x", false));
        assert!(should_track_url("http://localhost:1978/", true));
        assert!(should_track_url("http://127.0.0.1/x", true));
    }

    #[test]
    fn test_notice_url() {
        let url = notice_url(
            "chrome-extension://abc/ui/blocked/blocked.html",
            "https://example.com/a?b=c&d",
            Some("Stay focused"),
            None,
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("url".to_string(), "https://example.com/a?b=c&d".to_string()),
                ("reason".to_string(), "Stay focused".to_string()),
            ]
        );
        assert!(url.as_str().starts_with("chrome-extension://abc/ui/blocked/blocked.html?url="));
        assert!(is_notice_page(url.as_str()));
    }

    #[test]
    fn test_notice_url_defaults() {
        let url = notice_url("chrome-extension://abc/blocked.html", "https://x.com/", None, Some("https://prev.com/"))
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[1], ("reason".to_string(), DEFAULT_NOTICE_REASON.to_string()));
        assert_eq!(pairs[2], ("referrer".to_string(), "https://prev.com/".to_string()));

        let url = notice_url("chrome-extension://abc/blocked.html", "https://x.com/", None, Some("")).unwrap();
        assert_eq!(url.query_pairs().count(), 2);
    }

    #[test]
    fn test_notice_url_invalid_base() {
        assert!(matches!(
            notice_url("blocked.html", "https://x.com/", None, None),
            Err(PolicyError::InvalidNoticePage(_))
        ));
    }
}
