// src/reader.rs
//! Reader capability and the shipped filesystem reader.
//!
//! A reader produces documents on demand. Remote-fetchable readers are
//! registered as-is so the platform performs the read; local readers are
//! drained into the pipeline's document collection before registration.

use crate::configured::{ConfiguredDataSource, DirectoryReaderParams, SourceKind, SourceParams};
use crate::error::IngestError;
use crate::model::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// The ability to read documents from some origin.
pub trait DocumentReader: Send + Sync {
    /// Whether the platform can perform this read on its side.
    fn is_remote(&self) -> bool;

    /// Reads all documents this reader can currently see.
    fn read(&self) -> Result<Vec<Document>, IngestError>;

    /// Wire snapshot of this reader for remote registration.
    fn configured(&self) -> ConfiguredDataSource;
}

/// Reads text files from a directory into one document per file.
///
/// Files are visited in lexicographic order so repeated reads produce
/// documents in a stable order.
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    root: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl DirectoryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["txt".to_string(), "md".to_string()],
            recursive: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|wanted| wanted == e))
    }

    fn read_dir(&self, dir: &Path, out: &mut Vec<Document>) -> Result<(), IngestError> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        for path in entries {
            if path.is_dir() {
                if self.recursive {
                    self.read_dir(&path, out)?;
                }
                continue;
            }
            if !self.wants(&path) {
                continue;
            }
            let text = fs::read_to_string(&path)?;
            log::debug!("read {} ({} bytes)", path.display(), text.len());
            out.push(Document::new(text).with_metadata(
                "path",
                serde_json::json!(path.to_string_lossy()),
            ));
        }
        Ok(())
    }
}

impl DocumentReader for DirectoryReader {
    fn is_remote(&self) -> bool {
        false
    }

    fn read(&self) -> Result<Vec<Document>, IngestError> {
        let mut out = Vec::new();
        self.read_dir(&self.root, &mut out)?;
        log::info!("directory reader: {} documents from {}", out.len(), self.root.display());
        Ok(out)
    }

    fn configured(&self) -> ConfiguredDataSource {
        ConfiguredDataSource {
            name: format!("reader-{}", self.root.display()),
            kind: SourceKind::Reader,
            params: SourceParams::Reader(DirectoryReaderParams {
                root: self.root.clone(),
                extensions: self.extensions.clone(),
                recursive: self.recursive,
            }),
        }
    }
}
