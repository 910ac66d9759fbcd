//! netdedupe - Deduplication and aggregation of network blocklists.
//!
//! This crate reduces large sets of IP/CIDR blocks and domain names to a
//! minimal list with no redundant or logically-subsumed entries.
//!
//! # Features
//!
//! - **Set dedupe**: Exact matching over normalized entries
//! - **CIDR aggregation**: IPv4 and IPv6 prefix trees that keep only maximal prefixes
//! - **Domain trie**: Exact domains plus single-level `*.` wildcards
//! - **List pipeline**: Download sources, parse, apply exclusions, write output files
//! - **Size verification**: Guard generated lists against large swings versus git `HEAD`
//!
//! # Quick Start
//!
//! ```
//! use netdedupe::{create, Deduplicator};
//!
//! let mut cidrs = create("radix").unwrap();
//! cidrs.add_many(["10.1.2.3", "10.0.0.0/8", "2001:db8::/32"]).unwrap();
//! assert_eq!(cidrs.all(), vec!["10.0.0.0/8", "2001:db8::/32"]);
//!
//! let mut domains = create("domain").unwrap();
//! domains.add("*.example.com").unwrap();
//! assert!(domains.contains("ads.example.com").unwrap());
//! assert!(!domains.contains("a.ads.example.com").unwrap());
//! ```
//!
//! # Strategies
//!
//! - **set**: `SetDedupe`, exact membership, no subsumption
//! - **radix**: `CidrAggregator`, a covered prefix is never stored
//! - **domain**: `DomainDedupe`, wildcards cover exactly one extra label
//!
//! # Building Lists
//!
//! ```ignore
//! use netdedupe::{generate, ListsConfig};
//! use std::path::Path;
//!
//! let config = ListsConfig::load(Path::new("lists.yaml"))?;
//! for report in generate(&config, Path::new("lists"))? {
//!     println!("{}: {} entries", report.name, report.entries);
//! }
//! ```

mod error;
mod shared;
mod strategy;

pub mod config;
pub mod dedupe;
pub mod fetch;
pub mod input;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod trie;
pub mod verify;

// Re-export core types
pub use error::{Error, Result};
pub use strategy::Strategy;

// Re-export deduplicators
pub use dedupe::{create, CidrAggregator, Dedupe, Deduplicator, DomainDedupe, SetDedupe};
pub use shared::SharedDeduplicator;

// Re-export normalization
pub use normalize::{normalize, DomainKey, NormalizedKey};

// Re-export pipeline types
pub use config::{ListConfig, ListsConfig, OutputConfig, SourceConfig};
pub use input::InputFormat;
pub use output::OutputFormat;
pub use pipeline::{build_list, generate, ListReport};
pub use verify::{verify, VerifyReport};
