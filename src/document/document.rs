//! Document type and identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new identifier.
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocumentId(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId(id)
    }
}

/// A document: an identifier plus its raw text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    text: String,
}

impl Document {
    /// Create a new document.
    pub fn new<I: Into<DocumentId>, T: Into<String>>(id: I, text: T) -> Self {
        Document {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Get the document identifier.
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Get the raw text content.
    pub fn text(&self) -> &str {
        &self.text
    }
}
