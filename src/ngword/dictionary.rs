//! Compiled NG-word dictionary.
//!
//! The dictionary is a character trie flattened into two arrays: nodes, each
//! owning a contiguous run of edges, and edges sorted by label within a node so
//! that a transition is a binary search. A node whose `word_len` is non-zero
//! terminates an entry of that many characters.
//!
//! ## File layout
//!
//! The compiled file is gzip-compressed. Decompressed, it is little-endian:
//!
//! | field | size |
//! |---|---|
//! | magic `JCNGDIC\0` | 8 |
//! | version | 4 |
//! | word count | 4 |
//! | node count | 4 |
//! | edge count | 4 |
//! | nodes: edge start, edge count, word length | 12 each |
//! | edges: label (scalar value), target node | 8 each |

use crate::error::{Error, Result};
use crate::resource::{gzip_bytes, read_resource};
use bytes::{Buf, BufMut, BytesMut};
use std::collections::BTreeMap;
use std::path::Path;

/// File signature.
const MAGIC: &[u8; 8] = b"JCNGDIC\0";

/// Current format version.
const VERSION: u32 = 1;

/// Header size in bytes.
const HEADER_SIZE: usize = 8 + 4 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    edge_start: u32,
    edge_count: u32,
    word_len: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    label: char,
    target: u32,
}

/// Immutable dictionary supporting common-prefix search at any text offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgWordDictionary {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    word_count: usize,
}

impl Default for NgWordDictionary {
    fn default() -> Self {
        Self::from_words(std::iter::empty::<&str>())
    }
}

impl NgWordDictionary {
    /// Builds a dictionary from words. Empty words and duplicates are ignored.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Pointer trie first, then flatten breadth-first.
        let mut children: Vec<BTreeMap<char, usize>> = vec![BTreeMap::new()];
        let mut word_len: Vec<u32> = vec![0];
        let mut word_count = 0;

        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            let mut node = 0;
            let mut depth = 0u32;
            for c in word.chars() {
                depth += 1;
                let existing = children[node].get(&c).copied();
                node = match existing {
                    Some(next) => next,
                    None => {
                        let next = children.len();
                        children.push(BTreeMap::new());
                        word_len.push(0);
                        children[node].insert(c, next);
                        next
                    }
                };
            }
            if word_len[node] == 0 {
                word_len[node] = depth;
                word_count += 1;
            }
        }

        let mut order = Vec::with_capacity(children.len());
        let mut index = vec![0u32; children.len()];
        order.push(0);
        let mut head = 0;
        while head < order.len() {
            let id = order[head];
            index[id] = head as u32;
            order.extend(children[id].values().copied());
            head += 1;
        }

        let mut nodes = Vec::with_capacity(order.len());
        let mut edges = Vec::new();
        for &id in &order {
            nodes.push(Node {
                edge_start: edges.len() as u32,
                edge_count: children[id].len() as u32,
                word_len: word_len[id],
            });
            for (&label, &child) in &children[id] {
                edges.push(Edge {
                    label,
                    target: index[child],
                });
            }
        }

        Self {
            nodes,
            edges,
            word_count,
        }
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.word_count
    }

    /// Returns true if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    fn child(&self, node: &Node, c: char) -> Option<&Node> {
        let start = node.edge_start as usize;
        let edges = &self.edges[start..start + node.edge_count as usize];
        edges
            .binary_search_by(|e| e.label.cmp(&c))
            .ok()
            .map(|i| &self.nodes[edges[i].target as usize])
    }

    /// Lengths (in characters) of every entry that is a prefix of `text`, shortest first.
    pub fn common_prefix_search(&self, text: &[char]) -> Vec<usize> {
        let mut found = Vec::new();
        let mut node = &self.nodes[0];
        for &c in text {
            match self.child(node, c) {
                Some(next) => node = next,
                None => break,
            }
            if node.word_len > 0 {
                found.push(node.word_len as usize);
            }
        }
        found
    }

    /// Length of the longest entry that is a prefix of `text`.
    pub fn longest_prefix(&self, text: &[char]) -> Option<usize> {
        let mut longest = None;
        let mut node = &self.nodes[0];
        for &c in text {
            match self.child(node, c) {
                Some(next) => node = next,
                None => break,
            }
            if node.word_len > 0 {
                longest = Some(node.word_len as usize);
            }
        }
        longest
    }

    /// Returns true if `word` is an entry.
    pub fn contains(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        !chars.is_empty() && self.longest_prefix(&chars) == Some(chars.len())
    }

    /// Serializes to the uncompressed binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf =
            BytesMut::with_capacity(HEADER_SIZE + self.nodes.len() * 12 + self.edges.len() * 8);
        buf.put_slice(MAGIC);
        buf.put_u32_le(VERSION);
        buf.put_u32_le(self.word_count as u32);
        buf.put_u32_le(self.nodes.len() as u32);
        buf.put_u32_le(self.edges.len() as u32);
        for node in &self.nodes {
            buf.put_u32_le(node.edge_start);
            buf.put_u32_le(node.edge_count);
            buf.put_u32_le(node.word_len);
        }
        for edge in &self.edges {
            buf.put_u32_le(edge.label as u32);
            buf.put_u32_le(edge.target);
        }
        buf.to_vec()
    }

    /// Parses the uncompressed binary layout.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        decode(data).map_err(|message| Error::resource("<memory>", message))
    }

    /// Writes the gzip-compressed dictionary file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let compressed = gzip_bytes(&self.to_bytes())?;
        std::fs::write(path, compressed)?;
        Ok(())
    }

    /// Loads a dictionary file written by [`NgWordDictionary::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = read_resource(path)?;
        let dictionary = decode(&data).map_err(|message| Error::resource(path, message))?;
        tracing::debug!(
            path = %path.display(),
            words = dictionary.word_count,
            nodes = dictionary.nodes.len(),
            "loaded NG-word dictionary"
        );
        Ok(dictionary)
    }
}

fn decode(data: &[u8]) -> std::result::Result<NgWordDictionary, String> {
    if data.len() < HEADER_SIZE {
        return Err(format!("dictionary too small: {} bytes", data.len()));
    }
    if &data[..8] != MAGIC {
        return Err("invalid dictionary signature".into());
    }

    let mut buf = &data[8..];
    let version = buf.get_u32_le();
    if version != VERSION {
        return Err(format!("unsupported dictionary version {version}"));
    }
    let word_count = buf.get_u32_le() as usize;
    let node_count = buf.get_u32_le() as usize;
    let edge_count = buf.get_u32_le() as usize;

    let expected = node_count
        .checked_mul(12)
        .and_then(|n| edge_count.checked_mul(8).and_then(|e| n.checked_add(e)))
        .ok_or("dictionary size overflow")?;
    if buf.remaining() != expected {
        return Err(format!(
            "dictionary body is {} bytes, expected {}",
            buf.remaining(),
            expected
        ));
    }
    if node_count == 0 {
        return Err("dictionary has no root node".into());
    }

    let mut nodes = Vec::with_capacity(node_count);
    for _ in 0..node_count {
        let node = Node {
            edge_start: buf.get_u32_le(),
            edge_count: buf.get_u32_le(),
            word_len: buf.get_u32_le(),
        };
        let end = node.edge_start as u64 + node.edge_count as u64;
        if end > edge_count as u64 {
            return Err("node edge range out of bounds".into());
        }
        nodes.push(node);
    }

    let mut edges = Vec::with_capacity(edge_count);
    for _ in 0..edge_count {
        let raw = buf.get_u32_le();
        let label = char::from_u32(raw).ok_or_else(|| format!("invalid edge label {raw:#x}"))?;
        let target = buf.get_u32_le();
        if target as usize >= node_count {
            return Err("edge target out of bounds".into());
        }
        edges.push(Edge { label, target });
    }

    Ok(NgWordDictionary {
        nodes,
        edges,
        word_count,
    })
}
