//! The ordered document collection indexes are built over.

use ahash::AHashMap;

use crate::document::document::{Document, DocumentId};
use crate::error::{Result, TandemError};

/// An ordered, identifier-addressable sequence of documents.
///
/// The corpus is fixed once built. Indexes refer to documents by their
/// ordinal (insertion position), which is also the tie-breaking order for
/// equally scored results.
///
/// # Examples
///
/// ```
/// use tandem::document::corpus::Corpus;
///
/// let corpus = Corpus::from_texts(["the cat sat on the mat", "dogs chase cats"]);
/// assert_eq!(corpus.len(), 2);
/// assert_eq!(corpus.get(&"1".into()).unwrap().text(), "dogs chase cats");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    ordinals: AHashMap<DocumentId, usize>,
}

impl Corpus {
    /// Build a corpus from documents, rejecting duplicate identifiers.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let mut ordinals = AHashMap::with_capacity(documents.len());
        for (ordinal, doc) in documents.iter().enumerate() {
            if ordinals.insert(doc.id().clone(), ordinal).is_some() {
                return Err(TandemError::corpus(format!(
                    "Duplicate document identifier: {}",
                    doc.id()
                )));
            }
        }

        Ok(Corpus {
            documents,
            ordinals,
        })
    }

    /// Build a corpus from raw texts, using each text's position as identifier.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents: Vec<Document> = texts
            .into_iter()
            .enumerate()
            .map(|(ordinal, text)| Document::new(ordinal.to_string(), text))
            .collect();
        let ordinals = documents
            .iter()
            .enumerate()
            .map(|(ordinal, doc)| (doc.id().clone(), ordinal))
            .collect();

        Corpus {
            documents,
            ordinals,
        }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by identifier.
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.ordinal(id).map(|ordinal| &self.documents[ordinal])
    }

    /// Look up a document by its insertion position.
    pub fn get_by_ordinal(&self, ordinal: usize) -> Option<&Document> {
        self.documents.get(ordinal)
    }

    /// Insertion position of a document.
    pub fn ordinal(&self, id: &DocumentId) -> Option<usize> {
        self.ordinals.get(id).copied()
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterate over documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}
