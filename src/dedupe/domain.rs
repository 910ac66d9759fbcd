//! Domain deduplicator with leftmost-label wildcard coverage.

use super::Deduplicator;
use crate::normalize::normalize_domain;
use crate::trie::DomainTrie;
use crate::{Result, Strategy};

/// DomainDedupe stores domains in a [`DomainTrie`].
///
/// # Pattern Formats
/// - Exact: `example.com` - stores only `example.com`
/// - Wildcard: `*.example.com` - covers `foo.example.com`, not `a.b.example.com`
///
/// # Examples
/// ```
/// use netdedupe::{Deduplicator, DomainDedupe};
///
/// let mut domains = DomainDedupe::new();
/// domains.add("foo.example.com").unwrap();
/// domains.add("*.example.com").unwrap();
/// assert!(!domains.add("bar.example.com").unwrap());
/// assert_eq!(domains.all(), vec!["*.example.com"]);
/// ```
#[derive(Debug, Default)]
pub struct DomainDedupe {
    trie: DomainTrie,
}

impl DomainDedupe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the underlying trie.
    pub fn trie(&self) -> &DomainTrie {
        &self.trie
    }
}

impl Deduplicator for DomainDedupe {
    fn strategy(&self) -> Strategy {
        Strategy::Domain
    }

    fn add(&mut self, entry: &str) -> Result<bool> {
        let key = normalize_domain(entry)?;
        Ok(self.trie.insert(&key))
    }

    fn remove(&mut self, entry: &str) -> Result<bool> {
        let key = normalize_domain(entry)?;
        Ok(self.trie.remove(&key))
    }

    fn contains(&self, entry: &str) -> Result<bool> {
        let key = normalize_domain(entry)?;
        Ok(self.trie.contains(&key))
    }

    fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = self.trie.iter().collect();
        all.sort();
        all
    }

    fn reset(&mut self) {
        self.trie.clear();
    }

    fn len(&self) -> usize {
        self.trie.len()
    }
}
