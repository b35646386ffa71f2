//!Prefix-range containment trie

use std::collections::BTreeSet;

use crate::base::Address;
use crate::ip::Ip;
use crate::ip6::Ip6;
use crate::prefix::{Prefix, PrefixRange};

//Arena node; child slots index into the arena
#[derive(Clone, Debug)]
struct Node<A: Address> {
    ranges: Vec<PrefixRange<A>>,
    left: Option<u32>,
    right: Option<u32>,
}

impl<A: Address> Node<A> {
    const fn new() -> Self {
        Self {
            ranges: Vec::new(),
            left: None,
            right: None,
        }
    }
}

///Trie of prefix ranges answering whole-prefix containment queries
///
///A range lives at the depth of its own prefix length, so every query it
///can include necessarily walks through its node. The stored set is kept
///minimal: a new range subsumed by an existing one is dropped, and ranges
///the new one subsumes are pruned from the subtree, followed by a
///post-order arena compaction that discards emptied subtrees.
#[derive(Clone, Debug)]
pub struct PrefixSpaceBase<A: Address> {
    nodes: Vec<Node<A>>,
}

///IPv4 prefix-range space
pub type PrefixSpace = PrefixSpaceBase<Ip>;
///IPv6 prefix-range space
pub type Prefix6Space = PrefixSpaceBase<Ip6>;

impl<A: Address> PrefixSpaceBase<A> {
    ///Creates an empty space
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }

    #[inline]
    ///Checks if no range is stored
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| node.ranges.is_empty())
    }

    #[inline(always)]
    fn child(&self, node: u32, bit: bool) -> Option<u32> {
        if bit {
            self.nodes[node as usize].right
        } else {
            self.nodes[node as usize].left
        }
    }

    fn child_or_insert(&mut self, node: u32, bit: bool) -> u32 {
        let slot = if bit {
            self.nodes[node as usize].right
        } else {
            self.nodes[node as usize].left
        };
        match slot {
            Some(child) => child,
            None => {
                let child = self.nodes.len() as u32;
                self.nodes.push(Node::new());
                if bit {
                    self.nodes[node as usize].right = Some(child);
                } else {
                    self.nodes[node as usize].left = Some(child);
                }
                child
            }
        }
    }

    ///Adds the degenerate single-length range for `prefix`
    pub fn add_prefix(&mut self, prefix: Prefix<A>) {
        self.add_prefix_range(PrefixRange::from_prefix(prefix));
    }

    ///Adds `range`, keeping the stored set minimal
    pub fn add_prefix_range(&mut self, range: PrefixRange<A>) {
        let addr = range.prefix().start_ip();
        let len = range.prefix().len();
        //Walk the insertion path first: an existing broader range along it
        //already answers every query the new one could
        let mut node = 0u32;
        let mut depth = 0u8;
        loop {
            if self.nodes[node as usize]
                .ranges
                .iter()
                .any(|stored| stored.includes(&range))
            {
                tracing::trace!(%range, "range already implied, skipping insert");
                return;
            }
            if depth == len {
                break;
            }
            match self.child(node, addr.bit(depth)) {
                Some(child) => node = child,
                None => break,
            }
            depth += 1;
        }
        //Re-walk allocating missing path nodes up to the range's own depth
        let mut node = 0u32;
        for depth in 0..len {
            node = self.child_or_insert(node, addr.bit(depth));
        }
        let pruned = self.prune_subtree(node, &range);
        self.nodes[node as usize].ranges.push(range);
        if pruned {
            self.compact();
        }
    }

    //Removes every stored range under `node` that `range` includes
    fn prune_subtree(&mut self, node: u32, range: &PrefixRange<A>) -> bool {
        let mut pruned = false;
        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            let before = self.nodes[idx as usize].ranges.len();
            self.nodes[idx as usize]
                .ranges
                .retain(|stored| !range.includes(stored));
            pruned |= self.nodes[idx as usize].ranges.len() != before;
            if let Some(left) = self.nodes[idx as usize].left {
                stack.push(left);
            }
            if let Some(right) = self.nodes[idx as usize].right {
                stack.push(right);
            }
        }
        pruned
    }

    //Post-order rebuild dropping subtrees with no stored ranges left
    fn compact(&mut self) {
        let mut fresh = vec![Node::new()];
        fresh[0].ranges = self.nodes[0].ranges.clone();
        self.copy_live(0, 0, &mut fresh);
        tracing::trace!(before = self.nodes.len(), after = fresh.len(), "compacted arena");
        self.nodes = fresh;
    }

    fn subtree_live(&self, node: u32) -> bool {
        if !self.nodes[node as usize].ranges.is_empty() {
            return true;
        }
        let left = self.nodes[node as usize].left;
        let right = self.nodes[node as usize].right;
        left.is_some_and(|child| self.subtree_live(child))
            || right.is_some_and(|child| self.subtree_live(child))
    }

    fn copy_live(&self, old: u32, fresh_idx: u32, fresh: &mut Vec<Node<A>>) {
        for bit in [false, true] {
            let child = if bit {
                self.nodes[old as usize].right
            } else {
                self.nodes[old as usize].left
            };
            let Some(child) = child else { continue };
            if !self.subtree_live(child) {
                continue;
            }
            let slot = fresh.len() as u32;
            let mut node = Node::new();
            node.ranges = self.nodes[child as usize].ranges.clone();
            fresh.push(node);
            if bit {
                fresh[fresh_idx as usize].right = Some(slot);
            } else {
                fresh[fresh_idx as usize].left = Some(slot);
            }
            self.copy_live(child, slot, fresh);
        }
    }

    ///Checks if some stored range includes `range`
    pub fn contains_prefix_range(&self, range: &PrefixRange<A>) -> bool {
        let addr = range.prefix().start_ip();
        let mut node = 0u32;
        let mut depth = 0u8;
        loop {
            if self.nodes[node as usize]
                .ranges
                .iter()
                .any(|stored| stored.includes(range))
            {
                return true;
            }
            if depth == range.prefix().len() {
                return false;
            }
            match self.child(node, addr.bit(depth)) {
                Some(child) => node = child,
                None => return false,
            }
            depth += 1;
        }
    }

    #[inline]
    ///Checks if some stored range includes exactly `prefix`
    pub fn contains_prefix(&self, prefix: Prefix<A>) -> bool {
        self.contains_prefix_range(&PrefixRange::from_prefix(prefix))
    }

    ///Materializes the stored ranges in canonical order
    pub fn prefix_ranges(&self) -> BTreeSet<PrefixRange<A>> {
        self.nodes
            .iter()
            .flat_map(|node| node.ranges.iter().copied())
            .collect()
    }

    ///Space of the other space's ranges that this space contains
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Self::new();
        for range in other.prefix_ranges() {
            if self.contains_prefix_range(&range) {
                out.add_prefix_range(range);
            }
        }
        out
    }

    ///Checks if the two spaces share any contained range
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }
}

impl<A: Address> Default for PrefixSpaceBase<A> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Address> PartialEq for PrefixSpaceBase<A> {
    //Structural layout may differ after compaction; the stored range set
    //is the identity
    fn eq(&self, other: &Self) -> bool {
        self.prefix_ranges() == other.prefix_ranges()
    }
}

impl<A: Address> Eq for PrefixSpaceBase<A> {}

impl<A: Address> FromIterator<PrefixRange<A>> for PrefixSpaceBase<A> {
    fn from_iter<I: IntoIterator<Item = PrefixRange<A>>>(iter: I) -> Self {
        let mut space = Self::new();
        for range in iter {
            space.add_prefix_range(range);
        }
        space
    }
}
