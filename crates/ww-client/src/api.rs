//! REST client for the tracking server
//!
//! Endpoints live under `<server>/api`: the blocklist collection and the
//! visit log.

use std::fmt;
use std::str::FromStr;

use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;
use ww_core::Rule;

use crate::error::ClientError;
use crate::visit::Visit;

/// Identifies a blocklist entry for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKey {
    /// The entry's pattern, as stored
    Pattern(String),
    /// Position in the served list
    Index(usize),
}

impl FromStr for RuleKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Pattern(s.to_string()),
        })
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => f.write_str(pattern),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the blocklist and visit endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(server_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::NotABase(server_url.to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("WebWatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base, http })
    }

    /// `GET /api/blocklist`, order preserved.
    pub async fn fetch_blocklist(&self) -> Result<Vec<Rule>, ClientError> {
        let url = self.endpoint(&["api", "blocklist"]);
        log::debug!("fetching blocklist from {}", url);

        let resp = self.http.get(url).send().await?;
        let rules = check_status(resp).await?.json::<Vec<Rule>>().await?;

        log::debug!("blocklist loaded: {} entries", rules.len());
        Ok(rules)
    }

    /// `POST /api/blocklist`.
    pub async fn add_rule(&self, pattern: &str, reason: Option<&str>) -> Result<(), ClientError> {
        let body = Rule {
            pattern: pattern.to_string(),
            reason: reason.map(str::to_string),
        };

        let resp = self
            .http
            .post(self.endpoint(&["api", "blocklist"]))
            .json(&body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// `DELETE /api/blocklist/{key}`, the key percent-encoded as one segment.
    pub async fn remove_rule(&self, key: &RuleKey) -> Result<(), ClientError> {
        let key = key.to_string();
        let resp = self
            .http
            .delete(self.endpoint(&["api", "blocklist", &key]))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// `POST /api/visits`.
    pub async fn report_visit(&self, visit: &Visit) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.endpoint(&["api", "visits"]))
            .json(visit)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Turn non-2xx responses into `ClientError::Status`, preferring the
/// server's `{"error": ...}` message.
async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if !text.trim().is_empty() => text.trim().to_string(),
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };

    Err(ClientError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    #[test]
    fn test_rule_key_parse() {
        assert_eq!("3".parse::<RuleKey>().unwrap(), RuleKey::Index(3));
        assert_eq!(
            "domain:a.com".parse::<RuleKey>().unwrap(),
            RuleKey::Pattern("domain:a.com".to_string())
        );
        assert_eq!(RuleKey::Index(7).to_string(), "7");
    }

    #[test]
    fn test_endpoint() {
        let client = ApiClient::new("http://localhost:1978").unwrap();
        assert_eq!(
            client.endpoint(&["api", "blocklist"]).as_str(),
            "http://localhost:1978/api/blocklist"
        );

        let client = ApiClient::new("http://host/prefix/").unwrap();
        assert_eq!(client.endpoint(&["api", "visits"]).as_str(), "http://host/prefix/api/visits");

        let client = ApiClient::new("http://localhost:1978").unwrap();
        assert_eq!(
            client.endpoint(&["api", "blocklist", "https://a.com/x?y"]).as_str(),
            "http://localhost:1978/api/blocklist/https:%2F%2Fa.com%2Fx%3Fy"
        );
    }

    #[test]
    fn test_invalid_server_url() {
        assert!(matches!(ApiClient::new("localhost"), Err(ClientError::InvalidServerUrl(_))));
        assert!(matches!(ApiClient::new("mailto:a@b.c"), Err(ClientError::NotABase(_))));
    }

    #[tokio::test]
    async fn test_fetch_blocklist_preserves_order() {
        let server = StubServer::start(vec![
            serde_json::json!({"url": "*", "reason": "all", "added": "2024-01-01T00:00:00"}),
            serde_json::json!({"url": "domain:b.com"}),
            serde_json::json!({"url": "https://a.com/"}),
        ])
        .await;
        let client = ApiClient::new(&server.url()).unwrap();

        let rules = client.fetch_blocklist().await.unwrap();
        let patterns: Vec<&str> = rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["*", "domain:b.com", "https://a.com/"]);
        assert_eq!(rules[0].reason.as_deref(), Some("all"));
        assert_eq!(rules[1].reason, None);
    }

    #[tokio::test]
    async fn test_add_and_remove_rule() {
        let server = StubServer::start(Vec::new()).await;
        let client = ApiClient::new(&server.url()).unwrap();

        client.add_rule("domain:a.com", Some("focus")).await.unwrap();
        client.add_rule("https://b.com/*", None).await.unwrap();

        let rules = client.fetch_blocklist().await.unwrap();
        assert_eq!(rules, vec![Rule::with_reason("domain:a.com", "focus"), Rule::new("https://b.com/*")]);

        client
            .remove_rule(&RuleKey::Pattern("https://b.com/*".to_string()))
            .await
            .unwrap();
        assert_eq!(server.deleted(), vec!["https://b.com/*".to_string()]);

        let rules = client.fetch_blocklist().await.unwrap();
        assert_eq!(rules, vec![Rule::with_reason("domain:a.com", "focus")]);
    }

    #[tokio::test]
    async fn test_error_message_from_server() {
        let server = StubServer::start(vec![serde_json::json!({"url": "domain:a.com"})]).await;
        let client = ApiClient::new(&server.url()).unwrap();

        let err = client.add_rule("domain:a.com", None).await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(message, "URL is already blocked");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = client.remove_rule(&RuleKey::Index(9)).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status, .. } if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_report_visit() {
        let server = StubServer::start(Vec::new()).await;
        let client = ApiClient::new(&server.url()).unwrap();

        let visit = Visit::new("https://example.com/", "Example", "", true);
        client.report_visit(&visit).await.unwrap();

        let visits = server.visits();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0]["url"], "https://example.com/");
        assert_eq!(visits[0]["incognito"], true);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(client.fetch_blocklist().await, Err(ClientError::Http(_))));
    }
}
