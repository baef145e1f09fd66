//! WebWatch Core Library
//!
//! This crate provides the URL match engine for the WebWatch blocker. It
//! decides, for any candidate URL and an ordered blocklist, whether the URL
//! is blocked and by which rule's reason.
//!
//! # Architecture
//!
//! The engine owns no state between calls: rules are handed in fresh on
//! every evaluation and the first matching rule decides. Malformed input
//! never fails; it resolves to "not blocked".
//!
//! # Modules
//!
//! - `types`: Rules, decisions and match diagnostics
//! - `url`: Candidate parsing and host containment
//! - `pattern`: Pattern form detection and glob compilation
//! - `matcher`: Core evaluation
//! - `display`: Presentation helpers for blocklist entries
//! - `policy`: Navigation policy shared by all integrations
//!
//! # Examples
//!
//! ```
//! use ww_core::{evaluate, Rule};
//!
//! let rules = vec![Rule::with_reason("domain:example.com", "focus time")];
//! let decision = evaluate("https://news.example.com/today", &rules);
//! assert!(decision.is_blocked());
//! assert_eq!(decision.reason(), Some("focus time"));
//! ```

pub mod display;
pub mod matcher;
pub mod pattern;
pub mod policy;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use display::{display_pattern, display_reason, NO_REASON_PLACEHOLDER};
pub use matcher::{evaluate, is_listed, Matcher};
pub use policy::{is_internal_page, is_notice_page, notice_url, should_track_url, PolicyError};
pub use types::{Decision, DecisionRecord, HostCase, MatchKind, Rule, RuleMatch};
