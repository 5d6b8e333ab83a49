//! Generalized suffix trie for summarizing a set of strings.
//!
//! Every suffix of every inserted string is added from the root, and each
//! node counts how many distinct strings (origins) pass through it. Two
//! queries follow from that:
//!
//! - [`SuffixTrie::longest_common`]: the longest substring shared by every
//!   origin.
//! - [`SuffixTrie::longest_most_common`]: the substring maximizing
//!   `length × 2 × support` over support thresholds from all origins down
//!   to half of them (never below two).
//!
//! Nodes live in a flat arena and are addressed by index; children form an
//! insertion-ordered sibling list, so ties between equally long candidates
//! go to the branch inserted first.
//!
//! # Example
//!
//! ```rust
//! use floodlens_trie::{longest_common_substring, longest_most_common_substring};
//!
//! assert_eq!(longest_most_common_substring(&["piilosana", "namiloma"]), "ilo");
//! assert_eq!(
//!     longest_most_common_substring(&[
//!         "this string is very similar to the next",
//!         "this string is very similar to the previous",
//!         "xcz",
//!     ]),
//!     "this string is very similar to the "
//! );
//! assert_eq!(longest_common_substring(&["Flooding", "flood warning"]), "flood");
//! ```

use std::fmt;

/// Index of a node in the arena.
pub type NodeId = u32;

/// Identifier assigned to each non-empty inserted string.
pub type OriginId = u32;

const ROOT: NodeId = 0;
const NONE: NodeId = NodeId::MAX;

#[derive(Debug, Clone)]
struct Node {
    ch: char,
    parent: NodeId,
    depth: u32,
    first_child: NodeId,
    last_child: NodeId,
    next_sibling: NodeId,
    // Distinct origins through this node. Origins are inserted one at a
    // time, so remembering the last one is enough to deduplicate.
    support: u32,
    last_origin: OriginId,
}

impl Node {
    fn new(ch: char, parent: NodeId, depth: u32) -> Self {
        Self {
            ch,
            parent,
            depth,
            first_child: NONE,
            last_child: NONE,
            next_sibling: NONE,
            support: 0,
            last_origin: OriginId::MAX,
        }
    }
}

/// A generalized suffix trie over a set of strings.
#[derive(Clone)]
pub struct SuffixTrie {
    nodes: Vec<Node>,
    origins: u32,
}

impl Default for SuffixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SuffixTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuffixTrie")
            .field("nodes", &self.nodes.len())
            .field("origins", &self.origins)
            .finish()
    }
}

impl SuffixTrie {
    /// Creates an empty trie holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new('\0', NONE, 0)],
            origins: 0,
        }
    }

    /// Builds a trie from `strings`, one origin per non-empty string.
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for s in strings {
            trie.insert(s.as_ref());
        }
        trie
    }

    /// Inserts every suffix of `s` under a fresh origin.
    ///
    /// Empty strings are ignored and do not count as an origin.
    pub fn insert(&mut self, s: &str) -> Option<OriginId> {
        let chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let origin = self.origins;
        self.origins += 1;
        self.touch(ROOT, origin);

        for start in 0..chars.len() {
            let mut node = ROOT;
            for &ch in &chars[start..] {
                node = self.child_or_insert(node, ch);
                self.touch(node, origin);
            }
        }
        Some(origin)
    }

    /// Number of origins inserted so far.
    pub fn origins(&self) -> usize {
        self.origins as usize
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.origins == 0
    }

    /// Number of origins containing `needle`. The empty needle matches all.
    pub fn support(&self, needle: &str) -> usize {
        let mut node = ROOT;
        for ch in needle.chars() {
            match self.child(node, ch) {
                Some(next) => node = next,
                None => return 0,
            }
        }
        self.nodes[node as usize].support as usize
    }

    /// Longest substring contained in every origin.
    pub fn longest_common(&self) -> String {
        if self.origins == 0 {
            return String::new();
        }
        let mut best = ROOT;
        self.walk(self.origins, |id, node| {
            if node.depth > self.nodes[best as usize].depth {
                best = id;
            }
        });
        self.substring(best)
    }

    /// Longest substring shared by a qualifying majority of origins.
    ///
    /// For each threshold `t` from the origin count down to half of it
    /// (never below two), the candidate is the longest substring contained
    /// in at least `t` origins, scored `len × (t × 2)`. The highest score
    /// wins; among equal scores the higher threshold wins.
    pub fn longest_most_common(&self) -> String {
        let total = self.origins;
        if total < 2 {
            return String::new();
        }
        let lowest = (total / 2).max(2);

        // deepest[s]: first node in preorder with the greatest depth among
        // nodes whose support is exactly s.
        let mut deepest: Vec<Option<NodeId>> = vec![None; total as usize + 1];
        self.walk(lowest, |id, node| {
            let slot = &mut deepest[node.support as usize];
            let deeper = slot.map_or(true, |cur| node.depth > self.nodes[cur as usize].depth);
            if deeper {
                *slot = Some(id);
            }
        });

        let mut running: Option<NodeId> = None;
        let mut winner: Option<NodeId> = None;
        let mut best_score: i64 = -1;
        for t in (lowest..=total).rev() {
            if let Some(cand) = deepest[t as usize] {
                running = match running {
                    Some(cur) if !self.deeper_or_earlier(cand, cur) => Some(cur),
                    _ => Some(cand),
                };
            }
            let len = running.map_or(0, |id| self.nodes[id as usize].depth as i64);
            let score = len * (t as i64 * 2);
            if score > best_score {
                best_score = score;
                winner = running;
            }
        }
        winner.map(|id| self.substring(id)).unwrap_or_default()
    }

    // Ids grow in insertion order but preorder follows the sibling lists,
    // so preorder rank has to be compared through the tree.
    fn deeper_or_earlier(&self, a: NodeId, b: NodeId) -> bool {
        let (da, db) = (self.nodes[a as usize].depth, self.nodes[b as usize].depth);
        if da != db {
            return da > db;
        }
        self.precedes(a, b)
    }

    /// Returns true if `a` comes before `b` in preorder.
    fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        let pa = self.path(a);
        let pb = self.path(b);
        for (x, y) in pa.iter().zip(pb.iter()) {
            if x == y {
                continue;
            }
            // First divergence: x and y are siblings.
            let mut sib = *x;
            while sib != NONE {
                if sib == *y {
                    return true;
                }
                sib = self.nodes[sib as usize].next_sibling;
            }
            return false;
        }
        pa.len() < pb.len()
    }

    fn path(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::with_capacity(self.nodes[id as usize].depth as usize);
        while id != ROOT {
            path.push(id);
            id = self.nodes[id as usize].parent;
        }
        path.reverse();
        path
    }

    /// Visits nodes in preorder, skipping subtrees whose support is below
    /// `min_support`. Support never grows with depth, so the skip is exact.
    fn walk<F>(&self, min_support: u32, mut f: F)
    where
        F: FnMut(NodeId, &Node),
    {
        let mut id = self.nodes[ROOT as usize].first_child;
        while id != NONE {
            let node = &self.nodes[id as usize];
            if node.support >= min_support {
                f(id, node);
                if node.first_child != NONE {
                    id = node.first_child;
                    continue;
                }
            }
            id = self.next_in_preorder(id);
        }
    }

    fn next_in_preorder(&self, mut id: NodeId) -> NodeId {
        while id != ROOT {
            let node = &self.nodes[id as usize];
            if node.next_sibling != NONE {
                return node.next_sibling;
            }
            id = node.parent;
        }
        NONE
    }

    fn substring(&self, mut id: NodeId) -> String {
        let mut chars = Vec::with_capacity(self.nodes[id as usize].depth as usize);
        while id != ROOT {
            let node = &self.nodes[id as usize];
            chars.push(node.ch);
            id = node.parent;
        }
        chars.iter().rev().collect()
    }

    fn child(&self, parent: NodeId, ch: char) -> Option<NodeId> {
        let mut id = self.nodes[parent as usize].first_child;
        while id != NONE {
            let node = &self.nodes[id as usize];
            if node.ch == ch {
                return Some(id);
            }
            id = node.next_sibling;
        }
        None
    }

    fn child_or_insert(&mut self, parent: NodeId, ch: char) -> NodeId {
        if let Some(id) = self.child(parent, ch) {
            return id;
        }
        let id = self.nodes.len() as NodeId;
        let depth = self.nodes[parent as usize].depth + 1;
        self.nodes.push(Node::new(ch, parent, depth));

        let p = &mut self.nodes[parent as usize];
        let last = p.last_child;
        p.last_child = id;
        if last == NONE {
            p.first_child = id;
        } else {
            self.nodes[last as usize].next_sibling = id;
        }
        id
    }

    #[inline]
    fn touch(&mut self, id: NodeId, origin: OriginId) {
        let node = &mut self.nodes[id as usize];
        if node.last_origin != origin {
            node.last_origin = origin;
            node.support += 1;
        }
    }
}

/// Longest substring common to all non-empty `strings`, compared lowercase.
pub fn longest_common_substring<S: AsRef<str>>(strings: &[S]) -> String {
    SuffixTrie::from_strings(strings.iter().map(|s| s.as_ref().to_lowercase())).longest_common()
}

/// Longest most common substring of `strings`, compared lowercase.
///
/// See [`SuffixTrie::longest_most_common`].
pub fn longest_most_common_substring<S: AsRef<str>>(strings: &[S]) -> String {
    SuffixTrie::from_strings(strings.iter().map(|s| s.as_ref().to_lowercase()))
        .longest_most_common()
}
