//!Exact longest-prefix-match trie

use crate::base::Address;
use crate::ip::Ip;
use crate::ip6::Ip6;
use crate::prefix::Prefix;

//Arena node; child slots index into the arena
#[derive(Clone, Debug)]
struct Node<A: Address> {
    prefix: Option<Prefix<A>>,
    left: Option<u32>,
    right: Option<u32>,
}

impl<A: Address> Node<A> {
    const fn new() -> Self {
        Self {
            prefix: None,
            left: None,
            right: None,
        }
    }
}

///Binary trie storing prefixes on the root-to-node path of their own bits
///
///A node at depth `d` holds at most the one stored prefix of length `d`
///whose bits spell the path to it. Lookup walks the address bits and
///returns the deepest stored prefix containing the target.
///
///Nodes live in an index-addressed arena with the root at slot 0.
#[derive(Clone, Debug)]
pub struct PrefixTrieBase<A: Address> {
    nodes: Vec<Node<A>>,
}

///IPv4 longest-prefix-match trie
pub type PrefixTrie = PrefixTrieBase<Ip>;
///IPv6 longest-prefix-match trie
pub type Prefix6Trie = PrefixTrieBase<Ip6>;

impl<A: Address> PrefixTrieBase<A> {
    ///Creates an empty trie
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }

    #[inline]
    ///Checks if no prefix is stored
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].prefix.is_none()
    }

    //Returns the child slot for `bit`, allocating it if missing
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

    #[inline(always)]
    fn child(&self, node: u32, bit: bool) -> Option<u32> {
        if bit {
            self.nodes[node as usize].right
        } else {
            self.nodes[node as usize].left
        }
    }

    ///Stores `prefix`, replacing any prefix previously stored at its path
    pub fn add(&mut self, prefix: Prefix<A>) {
        let addr = prefix.start_ip();
        let mut node = 0u32;
        for depth in 0..prefix.len() {
            node = self.child_or_insert(node, addr.bit(depth));
        }
        self.nodes[node as usize].prefix = Some(prefix);
    }

    ///Deepest stored prefix containing `addr`, if any
    pub fn longest_prefix_match(&self, addr: A) -> Option<Prefix<A>> {
        let mut best = None;
        let mut node = 0u32;
        let mut depth = 0u8;
        loop {
            if let Some(prefix) = self.nodes[node as usize].prefix {
                if prefix.contains_ip(addr) {
                    best = Some(prefix);
                }
            }
            if depth == A::BITS_LEN {
                break;
            }
            match self.child(node, addr.bit(depth)) {
                Some(child) => node = child,
                None => break,
            }
            depth += 1;
        }
        best
    }

    ///Checks if some stored prefix covers or equals `prefix` along its path
    pub fn contains_path_from_prefix(&self, prefix: &Prefix<A>) -> bool {
        let addr = prefix.start_ip();
        let mut node = 0u32;
        let mut depth = 0u8;
        loop {
            if self.nodes[node as usize].prefix.is_some() {
                return true;
            }
            if depth == prefix.len() {
                return false;
            }
            match self.child(node, addr.bit(depth)) {
                Some(child) => node = child,
                None => return false,
            }
            depth += 1;
        }
    }

    ///Stored prefixes in address order
    pub fn prefixes(&self) -> Vec<Prefix<A>> {
        let mut out: Vec<Prefix<A>> = self
            .nodes
            .iter()
            .filter_map(|node| node.prefix)
            .collect();
        out.sort_unstable();
        out
    }
}

impl<A: Address> Default for PrefixTrieBase<A> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Address> FromIterator<Prefix<A>> for PrefixTrieBase<A> {
    fn from_iter<I: IntoIterator<Item = Prefix<A>>>(iter: I) -> Self {
        let mut trie = Self::new();
        for prefix in iter {
            trie.add(prefix);
        }
        trie
    }
}
