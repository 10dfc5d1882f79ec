//! Huffman merge tree.
//!
//! Nodes live in an arena owned by [`HuffmanTree`] and refer to each other
//! through [`NodeId`] handles, so dropping the tree releases everything at
//! once without recursive destruction.
//!
//! # Construction
//!
//! Leaves are seeded in ascending symbol order and numbered 0..N in that
//! order; every merged node takes the next number. A min-heap keyed by
//! `(weight, number)` picks the two lightest nodes, so equal weights are
//! resolved the same way on every run. The first node taken becomes the left
//! child.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Handle to a node inside a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A tree node. Internal nodes always have both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Binary merge tree built from a [`FrequencyTable`].
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree by greedy least-weight pairing.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyFrequencyTable` if no symbol occurs.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let distinct = frequencies.distinct_symbols();
        if distinct == 0 {
            return Err(HuffmanError::EmptyFrequencyTable.into());
        }

        let mut nodes = Vec::with_capacity(2 * distinct - 1);
        let mut heap = BinaryHeap::with_capacity(distinct);

        for (symbol, weight) in frequencies.iter() {
            let id = NodeId(nodes.len());
            nodes.push(HuffNode::Leaf { symbol, weight });
            // Arena index doubles as insertion sequence number
            heap.push(Reverse((weight, id)));
        }

        loop {
            let Some(Reverse((left_weight, left))) = heap.pop() else {
                return Err(HuffmanError::EmptyFrequencyTable.into());
            };
            let Some(Reverse((right_weight, right))) = heap.pop() else {
                return Ok(Self { nodes, root: left });
            };

            let weight = left_weight + right_weight;
            let id = NodeId(nodes.len());
            nodes.push(HuffNode::Internal {
                weight,
                left,
                right,
            });
            heap.push(Reverse((weight, id)));
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id.0]
    }

    /// Total weight (number of input bytes the tree was built from).
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    /// Length of the longest root-to-leaf path (0 for a single leaf).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }
        deepest
    }

    /// Print the tree shape to stdout, one node per line.
    pub fn print_structure(&self) {
        println!("Huffman Tree Structure:");
        let mut stack = vec![(self.root, 0usize, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.node(id) {
                HuffNode::Leaf { symbol, weight } => {
                    println!(
                        "{}{}-> Leaf: {:?} ({}) [weight: {}]",
                        indent, label, *symbol as char, symbol, weight
                    );
                }
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    println!("{}{}-> Internal [weight: {}]", indent, label, weight);
                    stack.push((*right, depth + 1, "R"));
                    stack.push((*left, depth + 1, "L"));
                }
            }
        }
    }
}
