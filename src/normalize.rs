//! Canonicalization of raw list entries into comparable keys.
//!
//! Two key shapes exist:
//! - networks, parsed with [`ipnet`] and truncated to their prefix
//!   (a bare address becomes a `/32` or `/128`)
//! - domains, lowercased with surrounding whitespace and dots removed,
//!   optionally carrying a leftmost `*` wildcard label

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::fmt;
use std::net::IpAddr;

use crate::{Error, Result};

/// Wildcard label accepted in the leftmost position of a domain.
pub const WILDCARD_LABEL: &str = "*";

/// Canonical form of a domain entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainKey {
    /// Labels left to right, without the wildcard label
    labels: Vec<String>,
    wildcard: bool,
}

impl DomainKey {
    /// Labels of the target domain, leftmost first.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Whether the entry was written as `*.<target>`.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Labels in trie order: TLD first.
    pub fn reversed_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().rev().map(String::as_str)
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "{}.", WILDCARD_LABEL)?;
        }
        write!(f, "{}", self.labels.join("."))
    }
}

/// Canonical form of any entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedKey {
    Network(IpNet),
    Domain(DomainKey),
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedKey::Network(net) => write!(f, "{}", net),
            NormalizedKey::Domain(domain) => write!(f, "{}", domain),
        }
    }
}

/// Normalize an entry of unknown kind.
///
/// Anything that parses as an address or CIDR is a network. Entries with a
/// `/` are always networks, so a malformed CIDR is rejected rather than read
/// as a domain. Everything else must be a structurally valid domain.
pub fn normalize(raw: &str) -> Result<NormalizedKey> {
    let trimmed = raw.trim();
    if trimmed.contains('/') {
        return normalize_network(raw).map(NormalizedKey::Network);
    }
    if let Some(net) = parse_network(trimmed) {
        return Ok(NormalizedKey::Network(net));
    }
    normalize_domain(raw).map(NormalizedKey::Domain)
}

/// Normalize an IPv4/IPv6 address or CIDR block.
///
/// Host bits below the prefix are cleared, so `10.1.2.3/8` becomes `10.0.0.0/8`.
pub fn normalize_network(raw: &str) -> Result<IpNet> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(raw));
    }
    parse_network(trimmed).ok_or_else(|| Error::invalid(raw))
}

fn parse_network(s: &str) -> Option<IpNet> {
    if s.contains('/') {
        return s.parse::<IpNet>().ok().map(|net| net.trunc());
    }

    match s.parse::<IpAddr>().ok()? {
        IpAddr::V4(addr) => Ipv4Net::new(addr, 32).ok().map(IpNet::V4),
        IpAddr::V6(addr) => Ipv6Net::new(addr, 128).ok().map(IpNet::V6),
    }
}

/// Normalize a domain or `*.`-wildcard domain.
pub fn normalize_domain(raw: &str) -> Result<DomainKey> {
    let lowered = raw.trim().to_lowercase();
    let cleaned = lowered.trim_matches('.');
    if cleaned.is_empty() {
        return Err(Error::invalid(raw));
    }

    let mut labels: Vec<&str> = cleaned.split('.').collect();
    let wildcard = labels[0] == WILDCARD_LABEL;
    if wildcard {
        labels.remove(0);
    }

    // "*" alone has no target
    if labels.is_empty() {
        return Err(Error::invalid(raw));
    }

    let malformed = labels
        .iter()
        .any(|label| label.is_empty() || !label.chars().all(is_label_char));
    // an all-digit TLD is a mistyped address, e.g. 300.1.1.1
    let numeric_tld = labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()));
    if malformed || numeric_tld {
        return Err(Error::invalid(raw));
    }

    Ok(DomainKey {
        labels: labels.into_iter().map(str::to_string).collect(),
        wildcard,
    })
}

/// Letters, digits, `-` and `_`; non-ASCII is left to IDNA-aware consumers.
fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
