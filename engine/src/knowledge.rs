//! Knowledge store: the condition-name keyed knowledge base.

use std::path::{Path, PathBuf};

use thiserror::Error;

use mediq_types::ConditionRecord;

/// Failure to load the knowledge document.
///
/// A single attempt is made at startup; on failure the caller falls back to
/// [`KnowledgeStore::empty`] and surfaces one degraded-mode notice. Nothing
/// here is fatal to the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read knowledge document at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse knowledge document at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only mapping from condition name to record.
///
/// Populated exactly once; iteration order is the document's key order
/// (serde_json `preserve_order`), which the matcher relies on for its
/// positional tie-break. Keys are lowercased at load so lookups can assume
/// normalized names.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    entries: Vec<(String, ConditionRecord)>,
}

impl KnowledgeStore {
    /// The store used in degraded mode: every lookup falls through.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and parse the knowledge document. Single attempt, no retry.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a knowledge document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(bytes)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let record: ConditionRecord = serde_json::from_value(value)?;
            entries.push((name.to_lowercase(), record));
        }
        Ok(Self { entries })
    }

    /// Build a store from already-normalized entries. Test/bench convenience.
    #[must_use]
    pub fn from_entries(entries: Vec<(String, ConditionRecord)>) -> Self {
        Self { entries }
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
