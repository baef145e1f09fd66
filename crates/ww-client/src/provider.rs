//! Rule-set provider
//!
//! Owns the refresh cadence of the blocklist. The engine never sees the
//! provider; callers take a snapshot with `refresh()` or `current()` and pass
//! it to `evaluate`.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use ww_core::Rule;

use crate::api::ApiClient;
use crate::error::ClientError;

/// Anything that can produce an ordered rule set.
#[async_trait::async_trait]
pub trait RuleSource: Send + Sync {
    async fn fetch_rules(&self) -> Result<Vec<Rule>, ClientError>;
}

#[async_trait::async_trait]
impl RuleSource for ApiClient {
    async fn fetch_rules(&self) -> Result<Vec<Rule>, ClientError> {
        self.fetch_blocklist().await
    }
}

/// A fixed rule set, e.g. loaded from a file.
#[derive(Debug, Clone, Default)]
pub struct StaticRules(pub Vec<Rule>);

#[async_trait::async_trait]
impl RuleSource for StaticRules {
    async fn fetch_rules(&self) -> Result<Vec<Rule>, ClientError> {
        Ok(self.0.clone())
    }
}

/// What `refresh()` installs when the source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchFailurePolicy {
    /// Treat the blocklist as empty
    #[default]
    Empty,
    /// Keep the last successfully fetched set
    KeepLast,
}

/// Holds the current rule set and refreshes it from a source.
pub struct RuleSetProvider<S> {
    source: S,
    policy: FetchFailurePolicy,
    current: RwLock<Arc<[Rule]>>,
}

impl<S: RuleSource> RuleSetProvider<S> {
    pub fn new(source: S, policy: FetchFailurePolicy) -> Self {
        Self {
            source,
            policy,
            current: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Fetch a fresh rule set and make it current. Never fails: on error the
    /// failure policy decides what becomes current.
    pub async fn refresh(&self) -> Arc<[Rule]> {
        match self.source.fetch_rules().await {
            Ok(rules) => {
                log::info!("Blocklist refreshed: {} rules", rules.len());
                let rules: Arc<[Rule]> = Arc::from(rules);
                self.store(rules.clone());
                rules
            }
            Err(e) => {
                log::warn!("Failed to fetch blocklist: {}", e);
                match self.policy {
                    FetchFailurePolicy::Empty => {
                        let empty: Arc<[Rule]> = Arc::from(Vec::new());
                        self.store(empty.clone());
                        empty
                    }
                    FetchFailurePolicy::KeepLast => self.current(),
                }
            }
        }
    }

    /// The last stored rule set, without I/O.
    pub fn current(&self) -> Arc<[Rule]> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, rules: Arc<[Rule]>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = rules;
    }
}
