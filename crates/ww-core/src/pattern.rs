//! Rule pattern forms
//!
//! A pattern may qualify for several forms at once (`*.a.com/*` is both a
//! wildcard-subdomain pattern and a glob). The matcher tries each form in a
//! fixed order; this module only answers "does this pattern have form N, and
//! what does it extract".

use regex::Regex;

/// Prefix marking a domain rule.
pub const DOMAIN_PREFIX: &str = "domain:";

/// Prefix marking a wildcard-subdomain pattern.
pub const WILDCARD_PREFIX: &str = "*.";

/// Separator between host and path in a wildcard-subdomain pattern.
pub const WILDCARD_PATH: &str = "/*";

/// Domain of a `domain:` rule.
#[inline]
pub fn domain_rule(pattern: &str) -> Option<&str> {
    pattern.strip_prefix(DOMAIN_PREFIX)
}

/// Domain of a `*.host/*` rule: everything between `*.` and the first `/*`.
///
/// Whatever follows `/*` is not used for matching.
#[inline]
pub fn wildcard_subdomain_rule(pattern: &str) -> Option<&str> {
    let rest = pattern.strip_prefix(WILDCARD_PREFIX)?;
    let end = pattern.find(WILDCARD_PATH)?;
    // `/*` cannot overlap the `*.` prefix, so `end >= 2`.
    Some(&rest[..end - WILDCARD_PREFIX.len()])
}

/// Whether the pattern takes the general glob path.
#[inline]
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains('*')
}

/// Remainder of a `*.` glob checked against the candidate host.
///
/// This keeps any path, so `*.a.com/*` yields `a.com/*`, which no host can
/// equal.
#[inline]
pub fn glob_subdomain(pattern: &str) -> Option<&str> {
    pattern.strip_prefix(WILDCARD_PREFIX)
}

/// Regex source for a glob: `.` escaped, `*` widened to `.*`, anchored.
///
/// Other characters pass through with their regex meaning.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    for ch in pattern.chars() {
        match ch {
            '.' => out.push_str("\\."),
            '*' => out.push_str(".*"),
            _ => out.push(ch),
        }
    }
    out.push('$');
    out
}

/// Escape `{` and `}` in a regex source.
///
/// Browsers read a brace that does not form a `{n}`/`{n,m}` quantifier as a
/// literal; the `regex` crate rejects it.
fn escape_braces(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 4);
    for ch in source.chars() {
        if matches!(ch, '{' | '}') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Compile a glob. Patterns that do not form a valid regex yield `None`.
///
/// A source that fails to compile is retried once with its braces taken
/// literally, so `{id}` in a path works while `a{2}` stays a quantifier.
pub fn compile_glob(pattern: &str) -> Option<Regex> {
    let source = glob_to_regex(pattern);
    let err = match Regex::new(&source) {
        Ok(regex) => return Some(regex),
        Err(err) => err,
    };

    if source.contains(['{', '}']) {
        if let Ok(regex) = Regex::new(&escape_braces(&source)) {
            return Some(regex);
        }
    }

    log::debug!("glob {:?} does not compile ({}), skipping regex test", pattern, err);
    None
}
