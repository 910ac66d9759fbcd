//! Binary prefix tree storing only maximal, non-overlapping prefixes.

/// Prefix tree node. Each node exclusively owns its two children.
#[derive(Debug, Default)]
struct Node {
    children: [Option<Box<Node>>; 2],
    terminal: bool,
}

impl Node {
    fn is_empty(&self) -> bool {
        !self.terminal && self.children.iter().all(Option::is_none)
    }

    /// Terminal markers strictly below this node.
    fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .flatten()
            .map(|child| usize::from(child.terminal) + child.descendant_count())
            .sum()
    }

    fn collect(&self, bits: u128, depth: u8, out: &mut Vec<(u128, u8)>) {
        if self.terminal {
            out.push((bits, depth));
        }
        for (bit, child) in self.children.iter().enumerate() {
            if let Some(child) = child {
                let next = bits | ((bit as u128) << (127 - depth as u32));
                child.collect(next, depth + 1, out);
            }
        }
    }
}

/// Prefix tree keyed by MSB-aligned address bits.
///
/// A key is `(bits, prefix_len)` where `bits` holds the network address in
/// its most significant `width` bits. Invariant: no stored prefix is a
/// descendant of another stored prefix.
#[derive(Debug)]
pub struct PrefixTree {
    width: u8,
    root: Node,
    len: usize,
}

#[inline]
fn bit_at(bits: u128, depth: u8) -> usize {
    ((bits >> (127 - depth as u32)) & 1) as usize
}

impl PrefixTree {
    /// Create an empty tree for addresses `width` bits wide (32 or 128).
    pub fn new(width: u8) -> Self {
        debug_assert!(width > 0 && width <= 128);
        Self {
            width,
            root: Node::default(),
            len: 0,
        }
    }

    /// Number of stored prefixes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a stored prefix equals or contains the given prefix.
    pub fn covers(&self, bits: u128, prefix_len: u8) -> bool {
        let prefix_len = prefix_len.min(self.width);
        let mut node = &self.root;
        let mut depth = 0;
        loop {
            if node.terminal {
                return true;
            }
            if depth == prefix_len {
                return false;
            }
            match &node.children[bit_at(bits, depth)] {
                Some(child) => node = child,
                None => return false,
            }
            depth += 1;
        }
    }

    /// Whether exactly this prefix is stored.
    pub fn contains(&self, bits: u128, prefix_len: u8) -> bool {
        self.find(bits, prefix_len).is_some_and(|node| node.terminal)
    }

    fn find(&self, bits: u128, prefix_len: u8) -> Option<&Node> {
        let mut node = &self.root;
        for depth in 0..prefix_len.min(self.width) {
            node = node.children[bit_at(bits, depth)].as_deref()?;
        }
        Some(node)
    }

    /// Insert a prefix unless it is already covered.
    ///
    /// Stored prefixes that the new one contains are evicted. Returns
    /// `false` when the tree was left unchanged.
    pub fn insert(&mut self, bits: u128, prefix_len: u8) -> bool {
        if self.covers(bits, prefix_len) {
            return false;
        }

        let prefix_len = prefix_len.min(self.width);
        let mut node = &mut self.root;
        for depth in 0..prefix_len {
            node = node.children[bit_at(bits, depth)].get_or_insert_with(Box::default);
        }

        let evicted = node.descendant_count();
        node.children = [None, None];
        node.terminal = true;
        self.len = self.len + 1 - evicted;
        true
    }

    /// Remove exactly this prefix, pruning emptied nodes.
    ///
    /// Prefixes only covered by a broader stored prefix are not removed.
    pub fn remove(&mut self, bits: u128, prefix_len: u8) -> bool {
        let prefix_len = prefix_len.min(self.width);
        let removed = Self::remove_at(&mut self.root, bits, 0, prefix_len);
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn remove_at(node: &mut Node, bits: u128, depth: u8, prefix_len: u8) -> bool {
        if depth == prefix_len {
            let was_terminal = node.terminal;
            node.terminal = false;
            return was_terminal;
        }

        let slot = &mut node.children[bit_at(bits, depth)];
        let Some(child) = slot.as_deref_mut() else {
            return false;
        };
        let removed = Self::remove_at(child, bits, depth + 1, prefix_len);
        if removed && child.is_empty() {
            *slot = None;
        }
        removed
    }

    /// All stored prefixes in tree order.
    pub fn prefixes(&self) -> Vec<(u128, u8)> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(0, 0, &mut out);
        out
    }

    /// Whether the tree holds no nodes besides an unmarked root.
    pub fn is_pruned_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
        self.len = 0;
    }
}
