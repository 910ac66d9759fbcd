//! Deduplicator trait and strategy implementations.

mod domain;
mod radix;
mod set;

pub use domain::DomainDedupe;
pub use radix::CidrAggregator;
pub use set::SetDedupe;

use crate::{Result, Strategy};

/// Deduplicator defines the contract shared by every strategy.
///
/// Entries are raw strings; each strategy normalizes them before use and
/// rejects malformed input with [`Error::InvalidFormat`](crate::Error::InvalidFormat)
/// without touching its state.
pub trait Deduplicator {
    /// The strategy implemented by this deduplicator.
    fn strategy(&self) -> Strategy;

    /// Add an entry.
    ///
    /// # Returns
    /// `true` if stored state changed, `false` if the entry was already
    /// present or logically covered.
    fn add(&mut self, entry: &str) -> Result<bool>;

    /// Remove an entry. Absent entries are a silent no-op returning `false`.
    fn remove(&mut self, entry: &str) -> Result<bool>;

    /// Membership test, with exact or coverage semantics per strategy.
    fn contains(&self, entry: &str) -> Result<bool>;

    /// All stored entries as canonical strings, lexicographically sorted.
    fn all(&self) -> Vec<String>;

    /// Drop every stored entry.
    fn reset(&mut self);

    /// Number of distinct stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add entries in order, returning how many were newly added.
    ///
    /// Stops at the first malformed entry; earlier entries stay applied.
    fn add_many<I, S>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        let mut added = 0;
        for entry in entries {
            if self.add(entry.as_ref())? {
                added += 1;
            }
        }
        Ok(added)
    }
}

/// A deduplicator of any strategy, selected at construction time.
#[derive(Debug)]
pub enum Dedupe {
    Set(SetDedupe),
    Radix(CidrAggregator),
    Domain(DomainDedupe),
}

impl Dedupe {
    /// Create an empty deduplicator for the given strategy.
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Set => Dedupe::Set(SetDedupe::new()),
            Strategy::Radix => Dedupe::Radix(CidrAggregator::new()),
            Strategy::Domain => Dedupe::Domain(DomainDedupe::new()),
        }
    }

    fn inner(&self) -> &dyn Deduplicator {
        match self {
            Dedupe::Set(d) => d,
            Dedupe::Radix(d) => d,
            Dedupe::Domain(d) => d,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Deduplicator {
        match self {
            Dedupe::Set(d) => d,
            Dedupe::Radix(d) => d,
            Dedupe::Domain(d) => d,
        }
    }
}

impl Deduplicator for Dedupe {
    fn strategy(&self) -> Strategy {
        self.inner().strategy()
    }

    fn add(&mut self, entry: &str) -> Result<bool> {
        self.inner_mut().add(entry)
    }

    fn remove(&mut self, entry: &str) -> Result<bool> {
        self.inner_mut().remove(entry)
    }

    fn contains(&self, entry: &str) -> Result<bool> {
        self.inner().contains(entry)
    }

    fn all(&self) -> Vec<String> {
        self.inner().all()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn len(&self) -> usize {
        self.inner().len()
    }
}

/// Create an empty deduplicator from a strategy name.
///
/// # Examples
/// ```
/// use netdedupe::{create, Deduplicator};
///
/// let mut dedupe = create("radix").unwrap();
/// dedupe.add_many(["10.1.2.3", "10.0.0.0/8"]).unwrap();
/// assert_eq!(dedupe.all(), vec!["10.0.0.0/8"]);
/// assert!(create("bloom").is_err());
/// ```
pub fn create(name: &str) -> Result<Dedupe> {
    let strategy: Strategy = name.parse()?;
    log::debug!("Created {} deduplicator", strategy);
    Ok(Dedupe::new(strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_create_each_strategy() {
        for (name, strategy) in [
            ("set", Strategy::Set),
            ("radix", Strategy::Radix),
            ("domain", Strategy::Domain),
        ] {
            let dedupe = create(name).unwrap();
            assert_eq!(dedupe.strategy(), strategy);
            assert!(dedupe.is_empty());
        }
    }

    #[test]
    fn test_create_unknown_strategy() {
        assert!(matches!(create("trie"), Err(Error::UnknownStrategy(_))));
    }

    #[test]
    fn test_trait_object() {
        let mut boxed: Box<dyn Deduplicator> = Box::new(Dedupe::new(Strategy::Domain));
        assert!(boxed.add("example.com").unwrap());
        assert!(boxed.contains("EXAMPLE.com").unwrap());
        assert_eq!(boxed.len(), 1);
    }

    #[test]
    fn test_add_many_stops_at_invalid() {
        let mut dedupe = Dedupe::new(Strategy::Radix);
        let result = dedupe.add_many(["10.0.0.0/8", "not-an-ip", "192.168.0.0/16"]);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
        assert_eq!(dedupe.all(), vec!["10.0.0.0/8"]);
    }

    #[test]
    fn test_add_many_counts_new_entries() {
        let mut dedupe = Dedupe::new(Strategy::Set);
        let added = dedupe
            .add_many(vec!["a.com".to_string(), "A.com".to_string(), "b.com".to_string()])
            .unwrap();
        assert_eq!(added, 2);
    }

    #[test]
    fn test_reset() {
        let mut dedupe = Dedupe::new(Strategy::Domain);
        dedupe.add("*.example.com").unwrap();
        dedupe.reset();
        assert!(dedupe.is_empty());
        assert!(!dedupe.contains("a.example.com").unwrap());
        assert!(dedupe.add("*.example.com").unwrap());
    }
}
