// src/transform/splitter.rs
//! Sentence-aware node splitter.
//!
//! Breaks each input node into chunks bounded by a character budget, keeping
//! sentences intact. Chunks inherit the parent's metadata, point `Source`
//! back at the parent's origin, and are chained with `Previous`/`Next`.

use super::{RunOptions, Transform};
use crate::configured::{
    ConfiguredTransform, SentenceSplitterParams, TransformKind, TransformParams,
};
use crate::error::IngestError;
use crate::model::{Node, RelationKind, Relationship};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CHUNK_OVERLAP: usize = 1;

/// One sentence per match: a run of text up to and including its terminator,
/// or a trailing run with no terminator.
static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?\n]*[.!?\n]+\s*|[^.!?\n]+$").unwrap());

/// Splits node content into sentence-aligned chunks.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl SentenceSplitter {
    /// `chunk_size` is a character budget per chunk; `chunk_overlap` is how
    /// many trailing sentences of one chunk are repeated at the start of the
    /// next.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
        }
    }

    fn split_sentences(text: &str) -> Vec<&str> {
        SENTENCE
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Greedy packing: sentences accumulate until the budget would overflow,
    /// then the chunk is flushed with `chunk_overlap` sentences carried over.
    /// A sentence longer than the whole budget keeps a chunk to itself.
    fn pack(&self, sentences: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for sentence in sentences {
            let joined = sentence.len() + if current.is_empty() { 0 } else { 1 };
            if !current.is_empty() && current_len + joined > self.chunk_size {
                chunks.push(current.join(" "));
                let carry_from = current.len().saturating_sub(self.chunk_overlap);
                current = current[carry_from..].to_vec();
                current_len = current.iter().map(|s| s.len()).sum::<usize>()
                    + current.len().saturating_sub(1);
            }
            current_len += sentence.len() + if current.is_empty() { 0 } else { 1 };
            current.push(sentence);
        }
        if !current.is_empty() {
            chunks.push(current.join(" "));
        }
        chunks
    }

    fn split_node(&self, node: &Node) -> Vec<Node> {
        let sentences = Self::split_sentences(&node.content);
        if sentences.is_empty() {
            return Vec::new();
        }

        // Chunks derive from the node's own origin when it has one.
        let origin = node.source_id().cloned().unwrap_or_else(|| node.id.clone());

        let mut out: Vec<Node> = Vec::new();
        for chunk in self.pack(&sentences) {
            let mut child =
                Node::new(chunk).with_relationship(RelationKind::Source, origin.clone());
            child.metadata = node.metadata.clone();
            if let Some(previous) = out.last_mut() {
                child = child.with_relationship(RelationKind::Previous, previous.id.clone());
                previous.relationships.push(Relationship {
                    kind: RelationKind::Next,
                    target: child.id.clone(),
                });
            }
            out.push(child);
        }
        out
    }
}

impl Transform for SentenceSplitter {
    fn kind(&self) -> TransformKind {
        TransformKind::SentenceSplitter
    }

    fn configured(&self) -> ConfiguredTransform {
        ConfiguredTransform {
            kind: self.kind(),
            params: TransformParams::SentenceSplitter(SentenceSplitterParams {
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            }),
        }
    }

    fn apply(&self, batch: Vec<Node>, options: &RunOptions) -> Result<Vec<Node>, IngestError> {
        let input_count = batch.len();
        let out: Vec<Node> = batch.iter().flat_map(|node| self.split_node(node)).collect();
        if options.show_progress {
            log::info!(
                "sentence splitter: {} nodes in, {} chunks out",
                input_count,
                out.len()
            );
        }
        Ok(out)
    }
}
