//! Core Matching Engine
//!
//! Every navigation check goes through here. Evaluation is a pure function
//! of the candidate and the rule sequence: rules are tried in order and the
//! first one that matches decides.

use crate::pattern::{compile_glob, domain_rule, glob_subdomain, is_glob, wildcard_subdomain_rule, DOMAIN_PREFIX};
use crate::types::{Decision, HostCase, MatchKind, Rule, RuleMatch};
use crate::url::{host_within, Candidate};

// =============================================================================
// Matcher
// =============================================================================

/// The core matching engine.
///
/// Holds only comparison options; rules are passed on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    host_case: HostCase,
}

impl Matcher {
    /// Create a matcher with legacy (case-sensitive) comparisons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with the given host comparison mode.
    pub fn with_host_case(host_case: HostCase) -> Self {
        Self { host_case }
    }

    /// Evaluate a candidate URL against an ordered rule sequence.
    pub fn evaluate(&self, candidate: &str, rules: &[Rule]) -> Decision {
        match self.find_match(candidate, rules) {
            Some(found) => found.decision(),
            None => Decision::Allow,
        }
    }

    /// Find the first rule that matches the candidate, with the sub-check that fired.
    pub fn find_match<'r>(&self, candidate: &str, rules: &'r [Rule]) -> Option<RuleMatch<'r>> {
        let candidate = Candidate::parse(candidate);

        for (index, rule) in rules.iter().enumerate() {
            if let Some(kind) = self.match_rule(&rule.pattern, &candidate) {
                log::debug!(
                    "{} match for {:?}: rule #{} {:?}",
                    kind.as_str(),
                    candidate.raw(),
                    index,
                    rule.pattern
                );
                return Some(RuleMatch { index, rule, kind });
            }
        }

        None
    }

    /// Try the four pattern forms of a single rule, in priority order.
    fn match_rule(&self, pattern: &str, candidate: &Candidate<'_>) -> Option<MatchKind> {
        // A1: Exact string match, applies even to unparseable input
        if pattern == candidate.raw() {
            return Some(MatchKind::Exact);
        }

        // Everything below needs a host
        let host = candidate.host()?;

        // A2: domain: rules
        if let Some(domain) = domain_rule(pattern) {
            if host_within(host, domain, self.host_case) {
                return Some(MatchKind::Domain);
            }
        }

        // A3: *.host/* rules, path ignored
        if let Some(domain) = wildcard_subdomain_rule(pattern) {
            if host_within(host, domain, self.host_case) {
                return Some(MatchKind::WildcardSubdomain);
            }
        }

        // A4: general glob against the full URL, then the *. host re-check
        if is_glob(pattern) {
            if let Some(regex) = compile_glob(pattern) {
                if regex.is_match(candidate.raw()) {
                    return Some(MatchKind::Glob);
                }
            }

            if let Some(domain) = glob_subdomain(pattern) {
                if host_within(host, domain, self.host_case) {
                    return Some(MatchKind::GlobSubdomain);
                }
            }
        }

        None
    }

    /// Whether an entry is already covered by the rule set.
    ///
    /// `domain:` entries are compared literally against existing patterns;
    /// anything else is treated as a candidate URL.
    pub fn is_listed(&self, entry: &str, rules: &[Rule]) -> bool {
        if entry.starts_with(DOMAIN_PREFIX) {
            return rules.iter().any(|rule| rule.pattern == entry);
        }
        self.find_match(entry, rules).is_some()
    }
}

/// Evaluate with the default matcher.
pub fn evaluate(candidate: &str, rules: &[Rule]) -> Decision {
    Matcher::new().evaluate(candidate, rules)
}

/// Listing check with the default matcher.
pub fn is_listed(entry: &str, rules: &[Rule]) -> bool {
    Matcher::new().is_listed(entry, rules)
}
