//! Ordered aggregation of findings by bucket key.

use indexmap::IndexMap;
use serde::Serialize;

/// One `(error, action)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub error: String,
    pub action: String,
}

impl ErrorEntry {
    pub fn new(error: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            action: action.into(),
        }
    }
}

impl<E: Into<String>, A: Into<String>> From<(E, A)> for ErrorEntry {
    fn from((error, action): (E, A)) -> Self {
        Self::new(error, action)
    }
}

/// Key → ordered entries. Keys and entries keep insertion order; nothing is
/// deduplicated or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBucket {
    bucket: IndexMap<String, Vec<ErrorEntry>>,
}

impl ErrorBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, key: impl Into<String>, entry: impl Into<ErrorEntry>) {
        self.bucket.entry(key.into()).or_default().push(entry.into());
    }

    /// Append every entry of `other`, keeping its key and entry order.
    pub fn merge(&mut self, other: ErrorBucket) {
        for (key, entries) in other.bucket {
            self.bucket.entry(key).or_default().extend(entries);
        }
    }

    pub fn bucket(&self) -> &IndexMap<String, Vec<ErrorEntry>> {
        &self.bucket
    }

    pub fn get(&self, key: &str) -> Option<&[ErrorEntry]> {
        self.bucket.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.bucket.len()
    }

    /// Number of entries across all keys.
    pub fn error_count(&self) -> usize {
        self.bucket.values().map(Vec::len).sum()
    }
}
