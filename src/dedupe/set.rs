//! Exact-match set deduplicator.

use ahash::AHashSet;

use super::Deduplicator;
use crate::normalize::normalize;
use crate::{Result, Strategy};

/// SetDedupe stores canonical strings with no subsumption logic.
///
/// # Examples
/// ```
/// use netdedupe::{Deduplicator, SetDedupe};
///
/// let mut dedupe = SetDedupe::new();
/// assert!(dedupe.add("Example.COM.").unwrap());
/// assert!(!dedupe.add("example.com").unwrap());
/// assert!(dedupe.add("www.example.com").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct SetDedupe {
    seen: AHashSet<String>,
}

impl SetDedupe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deduplicator for SetDedupe {
    fn strategy(&self) -> Strategy {
        Strategy::Set
    }

    fn add(&mut self, entry: &str) -> Result<bool> {
        let key = normalize(entry)?.to_string();
        Ok(self.seen.insert(key))
    }

    fn remove(&mut self, entry: &str) -> Result<bool> {
        let key = normalize(entry)?.to_string();
        Ok(self.seen.remove(&key))
    }

    fn contains(&self, entry: &str) -> Result<bool> {
        let key = normalize(entry)?.to_string();
        Ok(self.seen.contains(&key))
    }

    fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = self.seen.iter().cloned().collect();
        all.sort();
        all
    }

    fn reset(&mut self) {
        self.seen.clear();
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}
