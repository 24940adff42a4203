use std::fmt;

use crate::error::{Direction, Error, KeyFileError, Result};
use crate::frequency::{FrequencyTable, SYMBOLS};
use crate::queue::{AscendingQueue, Weighted};

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Builds the tree for every symbol with a non-zero weight.
    ///
    /// Leaves are queued in ascending symbol order, then the two lightest
    /// nodes are merged (first extracted on the left) until one remains.
    /// A single present symbol yields a leaf root.
    pub fn from_table(table: &FrequencyTable) -> Result<Self> {
        let mut queue = AscendingQueue::with_capacity(SYMBOLS);
        for (byte, weight) in table.present() {
            queue.insert(HuffNode::new(byte, weight));
        }

        if queue.is_empty() {
            return Err(Error::EmptyInput);
        }
        tracing::trace!("queued {} leaves", queue.len());

        while queue.has_at_least_two() {
            let x = queue.extract_min()?;
            let y = queue.extract_min()?;
            let z = HuffNode::merge(x, y)?;
            tracing::trace!("merged into internal node of weight {}", z.weight());
            queue.insert(z);
        }
        let root = queue.extract_min()?;

        tracing::debug!(
            "built tree: {} leaves, weight {}",
            root.leaf_count(),
            root.weight()
        );
        Ok(HuffmanTree { root })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_table(&FrequencyTable::count(bytes))
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    pub fn cursor(&self) -> TreeCursor<'_> {
        TreeCursor::new(self)
    }

    /// True when the input had a single distinct symbol.
    pub fn is_degenerate(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn leaf_weight_sum(&self) -> u64 {
        self.root.leaf_weight_sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    fn fmt_node(
        f: &mut fmt::Formatter<'_>,
        node: &HuffNode,
        depth: usize,
        label: &str,
    ) -> fmt::Result {
        // sideways: right subtree above its parent, left below
        if let HuffNode::Internal { right, .. } = node {
            Self::fmt_node(f, right, depth + 1, "R")?;
        }
        let indent = "    ".repeat(depth);
        match node {
            HuffNode::Leaf { byte, weight } => {
                writeln!(
                    f,
                    "{}{}-> {:?} ({}) [weight: {}]",
                    indent, label, *byte as char, byte, weight
                )?;
            }
            HuffNode::Internal { weight, .. } => {
                writeln!(f, "{}{}-> * [weight: {}]", indent, label, weight)?;
            }
        }
        if let HuffNode::Internal { left, .. } = node {
            Self::fmt_node(f, left, depth + 1, "L")?;
        }
        Ok(())
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_node(f, &self.root, 0, "root")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: u64) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// `a` becomes the left child, `b` the right.
    pub fn merge(a: Self, b: Self) -> Result<Self> {
        let weight = a
            .weight()
            .checked_add(b.weight())
            .ok_or(KeyFileError::WeightOverflow)?;
        Ok(HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffNode::Leaf { byte, .. } => Some(*byte),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&HuffNode> {
        match self {
            HuffNode::Internal { left, .. } => Some(&**left),
            HuffNode::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&HuffNode> {
        match self {
            HuffNode::Internal { right, .. } => Some(&**right),
            HuffNode::Leaf { .. } => None,
        }
    }

    fn leaf_weight_sum(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { left, right, .. } => {
                left.leaf_weight_sum() + right.leaf_weight_sum()
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Weighted for HuffNode {
    fn weight(&self) -> u64 {
        HuffNode::weight(self)
    }
}

/// Position inside a borrowed tree, used to decode one symbol at a time.
///
/// The tree itself is never mutated, so any number of cursors can walk the
/// same tree.
#[derive(Debug, Clone)]
pub struct TreeCursor<'a> {
    root: &'a HuffNode,
    current: &'a HuffNode,
    depth: usize,
}

impl<'a> TreeCursor<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        TreeCursor {
            root: &tree.root,
            current: &tree.root,
            depth: 0,
        }
    }

    pub fn can_walk_left(&self) -> bool {
        self.current.left().is_some()
    }

    pub fn can_walk_right(&self) -> bool {
        self.current.right().is_some()
    }

    pub fn walk_left(&mut self) -> Result<()> {
        self.walk(Direction::Left)
    }

    pub fn walk_right(&mut self) -> Result<()> {
        self.walk(Direction::Right)
    }

    /// Moves one level down. Walking off a leaf is an error and leaves the
    /// cursor where it was.
    pub fn walk(&mut self, direction: Direction) -> Result<()> {
        let next = match direction {
            Direction::Left => self.current.left(),
            Direction::Right => self.current.right(),
        };
        match next {
            Some(node) => {
                self.current = node;
                self.depth += 1;
                Ok(())
            }
            None => Err(Error::InvalidTraversal {
                direction,
                depth: self.depth,
            }),
        }
    }

    pub fn back_to_root(&mut self) {
        self.current = self.root;
        self.depth = 0;
    }

    pub fn is_on_leaf(&self) -> bool {
        self.current.is_leaf()
    }

    pub fn is_at_root(&self) -> bool {
        self.depth == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn current(&self) -> &'a HuffNode {
        self.current
    }

    pub fn current_symbol(&self) -> Option<u8> {
        self.current.symbol()
    }

    pub fn current_weight(&self) -> u64 {
        self.current.weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(u8, u64)]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for &(symbol, weight) in pairs {
            table.set(symbol, weight);
        }
        table
    }

    #[test]
    fn test_tie_break_shape() {
        // seeds queue as [b, a, c]; b and a merge with b on the left
        let tree = HuffmanTree::from_table(&table(&[(b'a', 1), (b'b', 1), (b'c', 2)])).unwrap();
        let root = tree.root();
        assert_eq!(root.weight(), 4);

        let left = root.left().unwrap();
        assert_eq!(left.weight(), 2);
        assert_eq!(left.left().unwrap().symbol(), Some(b'b'));
        assert_eq!(left.right().unwrap().symbol(), Some(b'a'));
        assert_eq!(root.right().unwrap().symbol(), Some(b'c'));
    }

    #[test]
    fn test_build_is_reproducible() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let first = HuffmanTree::from_bytes(text).unwrap();
        let second = HuffmanTree::from_bytes(text).unwrap();
        assert_eq!(first.root(), second.root());
    }

    #[test]
    fn test_frequency_conservation() {
        let text = b"abracadabra, alakazam";
        let tree = HuffmanTree::from_bytes(text).unwrap();
        assert_eq!(tree.leaf_weight_sum(), text.len() as u64);
        assert_eq!(tree.leaf_count(), FrequencyTable::count(text).distinct());
        assert_eq!(tree.root().weight(), text.len() as u64);
    }

    #[test]
    fn test_single_symbol_root_is_leaf() {
        let tree = HuffmanTree::from_bytes(b"aaaa").unwrap();
        assert!(tree.is_degenerate());
        assert_eq!(tree.root().symbol(), Some(b'a'));
        assert_eq!(tree.root().weight(), 4);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(HuffmanTree::from_bytes(b""), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_weight_overflow() {
        let forged = table(&[(1, u64::MAX), (2, 1)]);
        assert!(matches!(
            HuffmanTree::from_table(&forged),
            Err(Error::KeyFile(KeyFileError::WeightOverflow))
        ));
    }

    #[test]
    fn test_all_symbols_skewed_depth() {
        // powers of two give a maximally unbalanced tree
        let mut forged = FrequencyTable::new();
        for symbol in 0..64u8 {
            forged.set(symbol, 1u64 << symbol);
        }
        let tree = HuffmanTree::from_table(&forged).unwrap();
        assert_eq!(tree.leaf_count(), 64);
        assert_eq!(tree.depth(), 63);
    }

    #[test]
    fn test_cursor_walk() {
        let tree = HuffmanTree::from_table(&table(&[(b'a', 1), (b'b', 1), (b'c', 2)])).unwrap();
        let mut cursor = tree.cursor();
        assert!(cursor.is_at_root());
        assert!(!cursor.is_on_leaf());

        cursor.walk_left().unwrap();
        cursor.walk_right().unwrap();
        assert!(cursor.is_on_leaf());
        assert_eq!(cursor.current_symbol(), Some(b'a'));
        assert_eq!(cursor.current_weight(), 1);
        assert_eq!(cursor.depth(), 2);

        cursor.back_to_root();
        cursor.walk_right().unwrap();
        assert_eq!(cursor.current_symbol(), Some(b'c'));
    }

    #[test]
    fn test_cursor_walk_off_leaf() {
        let tree = HuffmanTree::from_bytes(b"aaaa").unwrap();
        let mut cursor = tree.cursor();
        assert!(!cursor.can_walk_left());
        assert!(!cursor.can_walk_right());
        match cursor.walk_left() {
            Err(Error::InvalidTraversal { direction, depth }) => {
                assert_eq!(direction, Direction::Left);
                assert_eq!(depth, 0);
            }
            other => panic!("expected invalid traversal, got {:?}", other),
        }
        assert!(cursor.is_at_root());
    }

    #[test]
    fn test_independent_cursors() {
        let tree = HuffmanTree::from_bytes(b"aabbbc").unwrap();
        let mut first = tree.cursor();
        let second = tree.cursor();
        first.walk_left().unwrap();
        assert!(!first.is_at_root());
        assert!(second.is_at_root());
    }

    #[test]
    fn test_display_lists_every_leaf() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let rendered = tree.to_string();
        assert!(rendered.contains("root-> * [weight: 3]"));
        assert!(rendered.contains("'a' (97) [weight: 2]"));
        assert!(rendered.contains("'b' (98) [weight: 1]"));
    }
}
