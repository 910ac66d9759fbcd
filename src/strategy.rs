//! Deduplication strategy names.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Strategy selects which deduplicator backs a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Exact-match set of normalized strings
    #[default]
    Set,
    /// CIDR-aware radix aggregation (IPv4 and IPv6)
    Radix,
    /// Domain trie with leftmost-label wildcards
    Domain,
}

impl Strategy {
    /// Parse a strategy from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "set" | "simpleset" | "simple" => Some(Strategy::Set),
            "radix" | "pytricia" => Some(Strategy::Radix),
            "domain" | "domaintrie" => Some(Strategy::Domain),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Set => "set",
            Strategy::Radix => "radix",
            Strategy::Domain => "domain",
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::parse(s).ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
