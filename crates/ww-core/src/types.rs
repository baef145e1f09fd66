//! Core type definitions for WebWatch
//!
//! These types map directly to the blocklist wire format served by the
//! tracking server and are used throughout the match engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::display::NO_REASON_PLACEHOLDER;

// =============================================================================
// Rules
// =============================================================================

/// One blocklist entry.
///
/// On the wire the pattern travels as `url`, matching the server's
/// `{url, reason?}` objects. Extra fields the server attaches (`added`,
/// `updated`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rule {
    /// Pattern in one of the four supported forms
    #[serde(rename = "url")]
    pub pattern: String,
    /// Human-readable reason; absent stays absent until presentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reason: Option<String>,
}

impl Rule {
    /// Create a rule without a reason.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: None,
        }
    }

    /// Create a rule with a reason.
    pub fn with_reason(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: Some(reason.into()),
        }
    }
}

// =============================================================================
// Match Kinds
// =============================================================================

/// Which sub-check of a rule produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Pattern equals the candidate string
    Exact,
    /// `domain:` pattern contains the candidate host
    Domain,
    /// `*.host/*` pattern contains the candidate host
    WildcardSubdomain,
    /// Glob regex matched the full candidate URL
    Glob,
    /// `*.` glob whose remainder contains the candidate host
    GlobSubdomain,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Domain => "domain",
            Self::WildcardSubdomain => "wildcard-subdomain",
            Self::Glob => "glob",
            Self::GlobSubdomain => "glob-subdomain",
        }
    }
}

/// Host comparison mode for the domain containment checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostCase {
    /// Byte-for-byte comparison
    #[default]
    Exact,
    /// ASCII case folded on both sides
    IgnoreAscii,
}

// =============================================================================
// Decisions
// =============================================================================

/// Final decision for a candidate URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Decision {
    /// No rule matched
    #[default]
    Allow,
    /// A rule matched; carries that rule's reason
    Block { reason: Option<String> },
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// The matched rule's reason, if it had one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Block { reason } => reason.as_deref(),
        }
    }

    /// Reason text for display, falling back to the placeholder.
    pub fn display_reason(&self) -> &str {
        self.reason().unwrap_or(NO_REASON_PLACEHOLDER)
    }

    pub fn to_record(&self) -> DecisionRecord {
        DecisionRecord::from(self)
    }
}

/// Wire form of a [`Decision`]: `{"blocked":false}` or
/// `{"blocked":true,"reason":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, rename = "Decision")]
pub struct DecisionRecord {
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reason: Option<String>,
}

impl From<&Decision> for DecisionRecord {
    fn from(decision: &Decision) -> Self {
        Self {
            blocked: decision.is_blocked(),
            reason: decision.reason().map(str::to_string),
        }
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// Diagnostic view of the rule that decided a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'r> {
    /// Position of the rule in the evaluated sequence
    pub index: usize,
    pub rule: &'r Rule,
    pub kind: MatchKind,
}

impl RuleMatch<'_> {
    pub fn decision(&self) -> Decision {
        Decision::Block {
            reason: self.rule.reason.clone(),
        }
    }
}
