//! Candidate URL parsing and host containment
//!
//! Candidates are parsed once per evaluation with the WHATWG parser so the
//! host seen by the engine is the same one a browser would report.

use ::url::Url;

use crate::types::HostCase;

// =============================================================================
// Candidate
// =============================================================================

/// A candidate URL: the raw string plus its parsed form, if any.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    raw: &'a str,
    parsed: Option<Url>,
}

impl<'a> Candidate<'a> {
    /// Parse a candidate. Never fails; unparseable input keeps only the raw string.
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            parsed: Url::parse(raw).ok(),
        }
    }

    /// The string exactly as supplied.
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    #[inline]
    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    /// Hostname with port and userinfo stripped.
    ///
    /// URLs that parse but carry no host (`mailto:`, `data:`) report an
    /// empty host. Returns `None` only for unparseable input.
    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.parsed.as_ref().map(|url| url.host_str().unwrap_or(""))
    }

    /// Scheme without the trailing `:`.
    #[inline]
    pub fn scheme(&self) -> Option<&str> {
        self.parsed.as_ref().map(Url::scheme)
    }
}

// =============================================================================
// Host Containment
// =============================================================================

/// Check whether `host` is `domain` or one of its subdomains.
///
/// The match must fall on a label boundary: `evilexample.com` is not
/// inside `example.com`.
#[inline]
pub fn host_within(host: &str, domain: &str, case: HostCase) -> bool {
    let (host, domain) = (host.as_bytes(), domain.as_bytes());

    let eq = |a: &[u8], b: &[u8]| match case {
        HostCase::Exact => a == b,
        HostCase::IgnoreAscii => a.eq_ignore_ascii_case(b),
    };

    if eq(host, domain) {
        return true;
    }

    if host.len() <= domain.len() {
        return false;
    }

    let split = host.len() - domain.len();
    host[split - 1] == b'.' && eq(&host[split..], domain)
}
