//! Code tables: symbol → bit sequence and back.
//!
//! A [`CodeTable`] keeps both directions of the mapping. The forward direction
//! is an ordered map used by the packer; the reverse direction is a binary
//! trie ([`PrefixDecoder`]) walked one bit at a time by the decoder. Building
//! the trie is also how prefix-freeness gets checked: a code that runs into
//! another code's leaf, or ends on an inner trie node, is rejected.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HuffmanError, Result};
use crate::tree::{HuffNode, HuffmanTree};

/// A variable-length code, first bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a code from a string of `0`/`1` characters; anything else is ignored.
    pub fn from_bit_str(s: &str) -> Self {
        s.chars()
            .filter_map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect()
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a prefix of `other` (equal codes count).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl FromIterator<bool> for Code {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Trie index of the root node.
const TRIE_ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

/// Result of feeding one bit to a [`PrefixDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Bits so far are a proper prefix of some code; continue from this state.
    Partial(DecodeState),
    /// A complete code was matched.
    Symbol(u8),
    /// No code starts with the bits seen so far.
    Invalid,
}

/// Position inside the decoding trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeState {
    node: usize,
    depth: usize,
}

impl DecodeState {
    /// Number of bits consumed since the last matched symbol.
    pub fn pending_bits(&self) -> usize {
        self.depth
    }

    pub fn is_start(&self) -> bool {
        self.node == TRIE_ROOT
    }
}

/// Binary trie mapping code prefixes to symbols.
#[derive(Debug, Clone)]
pub struct PrefixDecoder {
    nodes: Vec<TrieNode>,
}

impl PrefixDecoder {
    fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// State before any bit has been read.
    pub fn start(&self) -> DecodeState {
        DecodeState {
            node: TRIE_ROOT,
            depth: 0,
        }
    }

    /// Advance by one bit.
    pub fn step(&self, state: DecodeState, bit: bool) -> Step {
        let Some(next) = self.nodes[state.node].children[bit as usize] else {
            return Step::Invalid;
        };
        match self.nodes[next].symbol {
            Some(symbol) => Step::Symbol(symbol),
            None => Step::Partial(DecodeState {
                node: next,
                depth: state.depth + 1,
            }),
        }
    }

    fn child_or_insert(&mut self, node: usize, bit: bool) -> usize {
        if let Some(child) = self.nodes[node].children[bit as usize] {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(TrieNode::default());
        self.nodes[node].children[bit as usize] = Some(child);
        child
    }

    /// Insert a code, rejecting any prefix relation with codes already present.
    fn insert(&mut self, symbol: u8, code: &Code) -> std::result::Result<(), HuffmanError> {
        if code.is_empty() {
            return Err(HuffmanError::EmptyCode { symbol });
        }

        let mut node = TRIE_ROOT;
        for &bit in code.bits() {
            node = self.child_or_insert(node, bit);
            if let Some(other) = self.nodes[node].symbol {
                // An existing code is a prefix of (or equal to) this one
                return Err(HuffmanError::PrefixConflict { symbol, other });
            }
        }

        if let Some(other) = self.first_symbol_below(node) {
            // This code is a prefix of an existing one
            return Err(HuffmanError::PrefixConflict { symbol, other });
        }

        self.nodes[node].symbol = Some(symbol);
        Ok(())
    }

    fn first_symbol_below(&self, mut node: usize) -> Option<u8> {
        loop {
            let current = &self.nodes[node];
            if let Some(symbol) = current.symbol {
                return Some(symbol);
            }
            node = current.children[0].or(current.children[1])?;
        }
    }

    fn lookup(&self, code: &Code) -> Option<u8> {
        let mut node = TRIE_ROOT;
        for &bit in code.bits() {
            node = self.nodes[node].children[bit as usize]?;
        }
        self.nodes[node].symbol
    }
}

/// Bidirectional mapping between symbols and their codes.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
    decoder: PrefixDecoder,
}

impl CodeTable {
    /// Assign codes by walking the tree: left appends 0, right appends 1.
    ///
    /// A tree made of a single leaf gets the one-bit code `1`, since an empty
    /// code could never be matched by the decoder.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut decoder = PrefixDecoder::new();

        if let HuffNode::Leaf { symbol, .. } = tree.node(tree.root()) {
            let leaf = decoder.child_or_insert(TRIE_ROOT, true);
            decoder.nodes[leaf].symbol = Some(*symbol);
            codes.insert(*symbol, Code::from_iter([true]));
            return Self { codes, decoder };
        }

        // Pre-order walk; the trie mirrors the tree shape node for node
        let mut stack = vec![(tree.root(), TRIE_ROOT, Code::new())];
        while let Some((id, trie_node, code)) = stack.pop() {
            match tree.node(id) {
                HuffNode::Leaf { symbol, .. } => {
                    decoder.nodes[trie_node].symbol = Some(*symbol);
                    codes.insert(*symbol, code);
                }
                HuffNode::Internal { left, right, .. } => {
                    let right_trie = decoder.child_or_insert(trie_node, true);
                    let left_trie = decoder.child_or_insert(trie_node, false);

                    let mut right_code = code.clone();
                    right_code.push(true);
                    let mut left_code = code;
                    left_code.push(false);

                    stack.push((*right, right_trie, right_code));
                    stack.push((*left, left_trie, left_code));
                }
            }
        }

        Self { codes, decoder }
    }

    /// Build a table from explicit entries, as read back from a header.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyCode` for a zero-length code
    /// - `HuffmanError::DuplicateSymbol` if a symbol appears twice
    /// - `HuffmanError::PrefixConflict` if the codes are not prefix-free
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, Code)>,
    {
        let mut codes = BTreeMap::new();
        let mut decoder = PrefixDecoder::new();

        for (symbol, code) in entries {
            if codes.contains_key(&symbol) {
                return Err(HuffmanError::DuplicateSymbol { symbol }.into());
            }
            decoder.insert(symbol, &code)?;
            codes.insert(symbol, code);
        }

        Ok(Self { codes, decoder })
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Reverse lookup: the symbol whose code is exactly `code`.
    pub fn symbol_for(&self, code: &Code) -> Option<u8> {
        self.decoder.lookup(code)
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Pairwise prefix check over all codes. Quadratic; meant for tests and diagnostics.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                if a.is_prefix_of(b) || b.is_prefix_of(a) {
                    return false;
                }
            }
        }
        true
    }

    /// Trie for bit-by-bit decoding.
    pub fn decoder(&self) -> &PrefixDecoder {
        &self.decoder
    }
}

impl PartialEq for CodeTable {
    fn eq(&self, other: &Self) -> bool {
        self.codes == other.codes
    }
}

impl Eq for CodeTable {}
