//! Thread-safe handle around a single deduplicator.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::dedupe::{Dedupe, Deduplicator};
use crate::{Result, Strategy};

/// SharedDeduplicator serializes every operation through one exclusive lock.
///
/// Insertions are order-dependent (later entries can evict or be covered
/// by earlier ones), so the whole instance is locked per operation.
/// Cloning yields another handle to the same deduplicator.
#[derive(Debug, Clone)]
pub struct SharedDeduplicator {
    inner: Arc<Mutex<Dedupe>>,
}

impl SharedDeduplicator {
    pub fn new(dedupe: Dedupe) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dedupe)),
        }
    }

    /// Create an empty deduplicator for the given strategy.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self::new(Dedupe::new(strategy))
    }

    pub fn strategy(&self) -> Strategy {
        self.inner.lock().strategy()
    }

    pub fn add(&self, entry: &str) -> Result<bool> {
        self.inner.lock().add(entry)
    }

    /// Add entries under a single lock acquisition.
    pub fn add_many<I, S>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.lock().add_many(entries)
    }

    pub fn remove(&self, entry: &str) -> Result<bool> {
        self.inner.lock().remove(entry)
    }

    pub fn contains(&self, entry: &str) -> Result<bool> {
        self.inner.lock().contains(entry)
    }

    pub fn all(&self) -> Vec<String> {
        self.inner.lock().all()
    }

    pub fn reset(&self) {
        self.inner.lock().reset()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take the deduplicator back if this is the last handle.
    pub fn into_inner(self) -> Option<Dedupe> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_adds() {
        let shared = SharedDeduplicator::with_strategy(Strategy::Radix);

        let handles: Vec<_> = (0..4u8)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..64u8 {
                        shared.add(&format!("10.{}.{}.0/24", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.len(), 256);

        shared.add("10.0.0.0/8").unwrap();
        assert_eq!(shared.all(), vec!["10.0.0.0/8"]);
    }

    #[test]
    fn test_into_inner() {
        let shared = SharedDeduplicator::with_strategy(Strategy::Domain);
        shared.add_many(["a.com", "b.com"]).unwrap();
        let other = shared.clone();
        assert!(other.contains("a.com").unwrap());
        drop(other);

        let dedupe = shared.into_inner().unwrap();
        assert_eq!(dedupe.len(), 2);
    }
}
