//! Huffman tree construction
//!
//! The tree lives in a flat arena. Leaves are pushed first in ascending
//! symbol order, internal nodes are appended as they are merged, so the arena
//! index doubles as the insertion-order tiebreak for equal weights. Given the
//! same [`FrequencyTable`] the resulting tree is always identical.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u8, weight: u64 },
    Internal { weight: u64, left: usize, right: usize },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// Returns `None` for an empty table. Ties on weight go to the node that
    /// entered the arena first; the first node popped becomes the left child.
    pub fn build(freq: &FrequencyTable) -> Option<Self> {
        let mut nodes: Vec<Node> = freq
            .iter()
            .map(|(symbol, weight)| Node::Leaf { symbol, weight })
            .collect();
        if nodes.is_empty() {
            return None;
        }

        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| Reverse((node.weight(), idx)))
            .collect();

        while heap.len() > 1 {
            let (Some(Reverse((lw, left))), Some(Reverse((rw, right)))) = (heap.pop(), heap.pop())
            else {
                break;
            };
            let idx = nodes.len();
            let weight = lw + rw;
            nodes.push(Node::Internal { weight, left, right });
            heap.push(Reverse((weight, idx)));
        }

        // A single leaf never enters the loop body and stays the root.
        let root = nodes.len() - 1;
        Some(Self { nodes, root })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Node at `idx`, if the arena has one.
    pub fn get(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Indices handed out by the tree itself are always in range.
    pub(crate) fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Total weight, equal to the number of bytes the table counted.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(pairs: &[(u8, u64)]) -> HuffmanTree {
        let freq: FrequencyTable = pairs.iter().copied().collect();
        HuffmanTree::build(&freq).unwrap()
    }

    #[test]
    fn test_empty_table() {
        assert!(HuffmanTree::build(&FrequencyTable::from_bytes(b"")).is_none());
    }

    #[test]
    fn test_single_symbol_is_leaf_root() {
        let tree = tree_for(&[(b'a', 5)]);
        assert_eq!(*tree.node(tree.root()), Node::Leaf { symbol: b'a', weight: 5 });
        assert_eq!(tree.internal_count(), 0);
    }

    #[test]
    fn test_two_symbols() {
        let tree = tree_for(&[(b'a', 1), (b'b', 2)]);
        assert_eq!(tree.weight(), 3);
        match *tree.node(tree.root()) {
            Node::Internal { left, right, .. } => {
                assert_eq!(*tree.node(left), Node::Leaf { symbol: b'a', weight: 1 });
                assert_eq!(*tree.node(right), Node::Leaf { symbol: b'b', weight: 2 });
            }
            other => panic!("expected internal root, got {:?}", other),
        }
    }

    #[test]
    fn test_node_counts() {
        let pairs = [(b'a', 5), (b'b', 9), (b'c', 12), (b'd', 13), (b'e', 16), (b'f', 45)];
        let tree = tree_for(&pairs);
        assert_eq!(tree.leaf_count(), 6);
        assert_eq!(tree.internal_count(), 5);
        assert_eq!(tree.weight(), 100);
    }

    #[test]
    fn test_equal_weights_break_ties_by_symbol() {
        // a, b merge first; c pairs with their parent
        let tree = tree_for(&[(b'a', 3), (b'b', 3), (b'c', 3)]);
        match *tree.node(tree.root()) {
            Node::Internal { left, right, weight } => {
                assert_eq!(weight, 9);
                assert_eq!(*tree.node(left), Node::Leaf { symbol: b'c', weight: 3 });
                match *tree.node(right) {
                    Node::Internal { left, right, .. } => {
                        assert_eq!(*tree.node(left), Node::Leaf { symbol: b'a', weight: 3 });
                        assert_eq!(*tree.node(right), Node::Leaf { symbol: b'b', weight: 3 });
                    }
                    other => panic!("expected internal node, got {:?}", other),
                }
            }
            other => panic!("expected internal root, got {:?}", other),
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let tree = tree_for(&[(b'a', 1), (b'b', 2)]);
        assert_eq!(tree.get(tree.root()).map(Node::weight), Some(3));
        assert_eq!(tree.get(0), Some(&Node::Leaf { symbol: b'a', weight: 1 }));
        assert!(tree.get(3).is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let freq = FrequencyTable::from_bytes(data);
        let a = HuffmanTree::build(&freq).unwrap();
        let b = HuffmanTree::build(&freq).unwrap();
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.root, b.root);
    }
}
