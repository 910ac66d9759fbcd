//! Label-reversed domain trie with single-level wildcards.

use std::collections::BTreeMap;

use crate::normalize::{DomainKey, WILDCARD_LABEL};

#[derive(Debug, Default)]
struct Node {
    /// Children keyed by the next label toward the leftmost side
    children: BTreeMap<String, Node>,
    /// An exact domain ends here
    terminal: bool,
    /// `*.<this node>` is stored; implies no children
    wildcard: bool,
}

impl Node {
    fn has_marker(&self) -> bool {
        self.terminal || self.wildcard
    }

    fn is_empty(&self) -> bool {
        !self.has_marker() && self.children.is_empty()
    }

    /// Marked nodes strictly below this node.
    fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|child| usize::from(child.has_marker()) + child.descendant_count())
            .sum()
    }

    fn collect(&self, path: &mut Vec<String>, out: &mut Vec<String>) {
        if self.wildcard || self.terminal {
            let domain = path.iter().rev().cloned().collect::<Vec<_>>().join(".");
            if self.wildcard {
                out.push(format!("{}.{}", WILDCARD_LABEL, domain));
            }
            if self.terminal {
                out.push(domain);
            }
        }
        for (label, child) in &self.children {
            path.push(label.clone());
            child.collect(path, out);
            path.pop();
        }
    }
}

/// Domain trie indexed TLD first.
///
/// Stores exact domains and `*.`-wildcards. A wildcard covers exactly one
/// additional label: `*.example.com` covers `foo.example.com` but not
/// `bar.foo.example.com`, and not `example.com` itself.
#[derive(Debug, Default)]
pub struct DomainTrie {
    root: Node,
    len: usize,
}

impl DomainTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. A node marked both exact and wildcard counts once.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an exact domain or wildcard.
    ///
    /// Returns `false` when the trie was left unchanged: the entry sits
    /// below an existing wildcard, or its marker was already present.
    /// A wildcard insert drops every entry stored at or below its target,
    /// including the target's exact marker.
    pub fn insert(&mut self, key: &DomainKey) -> bool {
        if self.beneath_wildcard(key) {
            return false;
        }

        let mut node = &mut self.root;
        for label in key.reversed_labels() {
            node = node.children.entry(label.to_string()).or_default();
        }

        if key.is_wildcard() {
            if node.wildcard {
                return false;
            }
            let evicted = usize::from(node.terminal) + node.descendant_count();
            node.children.clear();
            node.terminal = false;
            node.wildcard = true;
            self.len = self.len + 1 - evicted;
        } else {
            if node.terminal {
                return false;
            }
            if !node.wildcard {
                self.len += 1;
            }
            node.terminal = true;
        }
        true
    }

    /// Whether a wildcard sits on the path above the key's target node.
    fn beneath_wildcard(&self, key: &DomainKey) -> bool {
        let mut node = &self.root;
        for label in key.reversed_labels() {
            if node.wildcard {
                return true;
            }
            match node.children.get(label) {
                Some(child) => node = child,
                None => return false,
            }
        }
        false
    }

    /// Coverage query.
    ///
    /// An exact key matches a terminal marker or a wildcard exactly one
    /// label above it. A wildcard key matches only a stored wildcard.
    pub fn contains(&self, key: &DomainKey) -> bool {
        if key.is_wildcard() {
            return self.find(key).is_some_and(|node| node.wildcard);
        }

        let total = key.labels().len();
        let mut node = &self.root;
        for (idx, label) in key.reversed_labels().enumerate() {
            node = match node.children.get(label) {
                Some(child) => child,
                None => return false,
            };
            if node.wildcard && total - idx - 1 == 1 {
                return true;
            }
        }
        node.terminal
    }

    fn find(&self, key: &DomainKey) -> Option<&Node> {
        let mut node = &self.root;
        for label in key.reversed_labels() {
            node = node.children.get(label)?;
        }
        Some(node)
    }

    /// Remove the exact marker (or wildcard marker for `*.` keys).
    ///
    /// Emptied nodes are pruned back toward the root. Returns `false` when
    /// the path or marker does not exist.
    pub fn remove(&mut self, key: &DomainKey) -> bool {
        let labels: Vec<&str> = key.reversed_labels().collect();
        let Some(still_marked) = Self::remove_at(&mut self.root, &labels, key.is_wildcard()) else {
            return false;
        };
        if !still_marked {
            self.len -= 1;
        }
        true
    }

    /// Returns `None` if nothing was removed, otherwise whether the target
    /// node still carries the other marker.
    fn remove_at(node: &mut Node, labels: &[&str], wildcard: bool) -> Option<bool> {
        let Some((label, rest)) = labels.split_first() else {
            let marker = if wildcard {
                &mut node.wildcard
            } else {
                &mut node.terminal
            };
            if !*marker {
                return None;
            }
            *marker = false;
            return Some(node.has_marker());
        };

        let child = node.children.get_mut(*label)?;
        let result = Self::remove_at(child, rest, wildcard)?;
        if child.is_empty() {
            node.children.remove(*label);
        }
        Some(result)
    }

    /// Stored entries in depth-first order: at each node the wildcard form,
    /// then the exact form, then children by label.
    pub fn iter(&self) -> impl Iterator<Item = String> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(&mut Vec::new(), &mut out);
        out.into_iter()
    }

    /// Whether the root has no children left.
    pub fn is_pruned_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
        self.len = 0;
    }
}
