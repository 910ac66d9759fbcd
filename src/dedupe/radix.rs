//! CIDR-aware aggregating deduplicator.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::Deduplicator;
use crate::normalize::normalize_network;
use crate::trie::PrefixTree;
use crate::{Result, Strategy};

/// CidrAggregator keeps only maximal, non-redundant prefixes.
///
/// Supports both IPv4 and IPv6; each family has its own prefix tree and
/// entries are routed by the parsed network's family.
///
/// # Examples
/// ```
/// use netdedupe::{CidrAggregator, Deduplicator};
///
/// let mut cidrs = CidrAggregator::new();
/// cidrs.add("192.168.1.0/24").unwrap();
/// cidrs.add("192.168.0.0/16").unwrap();
/// cidrs.add("2001:db8::/32").unwrap();
/// assert_eq!(cidrs.all(), vec!["192.168.0.0/16", "2001:db8::/32"]);
/// ```
#[derive(Debug)]
pub struct CidrAggregator {
    v4: PrefixTree,
    v6: PrefixTree,
}

impl Default for CidrAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// MSB-aligned tree key for a network.
fn tree_key(net: &IpNet) -> (u128, u8) {
    match net {
        IpNet::V4(n) => ((u32::from(n.network()) as u128) << 96, n.prefix_len()),
        IpNet::V6(n) => (u128::from(n.network()), n.prefix_len()),
    }
}

impl CidrAggregator {
    pub fn new() -> Self {
        Self {
            v4: PrefixTree::new(32),
            v6: PrefixTree::new(128),
        }
    }

    fn tree(&self, net: &IpNet) -> &PrefixTree {
        match net {
            IpNet::V4(_) => &self.v4,
            IpNet::V6(_) => &self.v6,
        }
    }

    fn tree_mut(&mut self, net: &IpNet) -> &mut PrefixTree {
        match net {
            IpNet::V4(_) => &mut self.v4,
            IpNet::V6(_) => &mut self.v6,
        }
    }

    /// Get the number of stored IPv4 prefixes.
    pub fn v4_len(&self) -> usize {
        self.v4.len()
    }

    /// Get the number of stored IPv6 prefixes.
    pub fn v6_len(&self) -> usize {
        self.v6.len()
    }

    /// Insert an already-parsed network.
    pub fn insert(&mut self, net: IpNet) -> bool {
        let (bits, len) = tree_key(&net);
        self.tree_mut(&net).insert(bits, len)
    }

    /// Whether some stored prefix equals or contains `entry`.
    ///
    /// Unlike [`Deduplicator::contains`], which tests exact keys.
    pub fn covers(&self, entry: &str) -> Result<bool> {
        let net = normalize_network(entry)?;
        let (bits, len) = tree_key(&net);
        Ok(self.tree(&net).covers(bits, len))
    }

    /// Stored networks, IPv4 first, each family in address order.
    pub fn networks(&self) -> Vec<IpNet> {
        let v4 = self.v4.prefixes().into_iter().filter_map(|(bits, len)| {
            Ipv4Net::new(Ipv4Addr::from((bits >> 96) as u32), len)
                .ok()
                .map(IpNet::V4)
        });
        let v6 = self.v6.prefixes().into_iter().filter_map(|(bits, len)| {
            Ipv6Net::new(Ipv6Addr::from(bits), len).ok().map(IpNet::V6)
        });
        v4.chain(v6).collect()
    }
}

impl Deduplicator for CidrAggregator {
    fn strategy(&self) -> Strategy {
        Strategy::Radix
    }

    fn add(&mut self, entry: &str) -> Result<bool> {
        let net = normalize_network(entry)?;
        Ok(self.insert(net))
    }

    /// Removes only the exact stored prefix; networks that are merely
    /// covered by a broader stored prefix are left alone.
    fn remove(&mut self, entry: &str) -> Result<bool> {
        let net = normalize_network(entry)?;
        let (bits, len) = tree_key(&net);
        Ok(self.tree_mut(&net).remove(bits, len))
    }

    fn contains(&self, entry: &str) -> Result<bool> {
        let net = normalize_network(entry)?;
        let (bits, len) = tree_key(&net);
        Ok(self.tree(&net).contains(bits, len))
    }

    fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = self.networks().iter().map(IpNet::to_string).collect();
        all.sort();
        all
    }

    fn reset(&mut self) {
        self.v4.clear();
        self.v6.clear();
    }

    fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }
}
