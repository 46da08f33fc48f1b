// src/model/mod.rs
//! Data model for content flowing through the pipeline.
//!
//! A `Document` is a raw input item; transforms break documents down into
//! `Node`s, enrich them, and eventually attach embedding vectors.

mod document;
mod node;

pub use document::Document;
pub use node::{Node, RelationKind, Relationship};

/// Ordered, JSON-valued metadata attached to documents and nodes.
pub type Metadata = indexmap::IndexMap<String, serde_json::Value>;
