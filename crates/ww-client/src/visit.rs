use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use ts_rs::TS;

/// A page visit reported to the tracking server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Visit {
    pub url: String,
    pub title: String,
    /// Page markup, empty when it could not be captured
    pub content: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub incognito: bool,
}

impl Visit {
    /// Create a visit stamped with the current time.
    pub fn new(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>, incognito: bool) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            timestamp: now_rfc3339(),
            incognito,
        }
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_wire_format() {
        let mut visit = Visit::new("https://example.com/", "Example", "<html></html>", false);
        assert!(OffsetDateTime::parse(&visit.timestamp, &Rfc3339).is_ok());

        visit.timestamp = "2024-05-01T10:00:00Z".to_string();
        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com/",
                "title": "Example",
                "content": "<html></html>",
                "timestamp": "2024-05-01T10:00:00Z",
                "incognito": false,
            })
        );
    }
}
