//! Tree structures backing the aggregating deduplicators.

mod domain;
mod radix;

pub use domain::DomainTrie;
pub use radix::PrefixTree;
