//! Presentation helpers for blocklist entries.

use crate::pattern::DOMAIN_PREFIX;

/// Shown wherever a rule has no reason.
pub const NO_REASON_PLACEHOLDER: &str = "No reason provided";

/// Reason text for display.
pub fn display_reason(reason: Option<&str>) -> &str {
    reason.unwrap_or(NO_REASON_PLACEHOLDER)
}

/// Pattern as shown in lists: `domain:` rules show the bare domain.
pub fn display_pattern(pattern: &str) -> &str {
    pattern.strip_prefix(DOMAIN_PREFIX).unwrap_or(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reason() {
        assert_eq!(display_reason(Some("focus")), "focus");
        assert_eq!(display_reason(None), "No reason provided");
        assert_eq!(display_reason(Some("")), "");
    }

    #[test]
    fn test_display_pattern() {
        assert_eq!(display_pattern("domain:example.com"), "example.com");
        assert_eq!(display_pattern("*.ads.net/*"), "*.ads.net/*");
        assert_eq!(display_pattern("https://a.com/"), "https://a.com/");
    }
}
