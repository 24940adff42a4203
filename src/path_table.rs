use std::collections::BTreeMap;

use crate::bit_vec::BitVec;
use crate::hufftree::{HuffNode, HuffmanTree};

/// Root-to-leaf route of every symbol in a tree, 0 = left, 1 = right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    paths: BTreeMap<u8, BitVec>,
}

impl PathTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut paths = BTreeMap::new();
        let mut stack = BitVec::new();
        Self::collect(tree.root(), &mut stack, &mut paths);
        PathTable { paths }
    }

    fn collect(node: &HuffNode, stack: &mut BitVec, paths: &mut BTreeMap<u8, BitVec>) {
        match node {
            HuffNode::Leaf { byte, .. } => {
                // a leaf root records an empty path
                paths.insert(*byte, stack.clone());
            }
            HuffNode::Internal { left, right, .. } => {
                stack.push_bit(false);
                Self::collect(left, stack, paths);
                stack.pop_bit();

                stack.push_bit(true);
                Self::collect(right, stack, paths);
                stack.pop_bit();
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&BitVec> {
        self.paths.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitVec)> + '_ {
        self.paths.iter().map(|(&symbol, path)| (symbol, path))
    }

    /// Checks that no path is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.paths.iter().all(|(a, path_a)| {
            self.paths
                .iter()
                .all(|(b, path_b)| a == b || !path_b.starts_with(path_a))
        })
    }
}
