//! Corpus loading from JSON and JSON Lines files.
//!
//! Two layouts are accepted, selected by file extension:
//!
//! - `.json`: a single array whose elements are strings or objects
//! - `.jsonl` / `.ndjson`: one string or object per line (blank lines skipped)
//!
//! Objects must carry a `text` field and may carry an `id` field (string or
//! number). Entries without an `id` get their zero-based position.
//!
//! ```jsonl
//! {"id": "cats", "text": "the cat sat on the mat"}
//! "dogs chase cats"
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::document::corpus::Corpus;
use crate::document::document::Document;
use crate::error::{Result, TandemError};

/// A single corpus entry as it appears on disk.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Text(String),
    Record { id: Option<Value>, text: String },
}

impl RawEntry {
    fn into_document(self, position: usize) -> Result<Document> {
        match self {
            RawEntry::Text(text) => Ok(Document::new(position.to_string(), text)),
            RawEntry::Record { id, text } => {
                let id = match id {
                    None | Some(Value::Null) => position.to_string(),
                    Some(Value::String(s)) => s,
                    Some(Value::Number(n)) => n.to_string(),
                    Some(other) => {
                        return Err(TandemError::corpus(format!(
                            "Entry {position}: id must be a string or number, got {other}"
                        )));
                    }
                };
                Ok(Document::new(id, text))
            }
        }
    }
}

impl Corpus {
    /// Load a corpus from a `.json` or `.jsonl` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let entries = match extension.as_deref() {
            Some("json") => read_json_array(path)?,
            Some("jsonl") | Some("ndjson") => read_json_lines(path)?,
            _ => {
                return Err(TandemError::corpus(format!(
                    "Unsupported corpus file '{}': expected .json or .jsonl",
                    path.display()
                )));
            }
        };

        let documents = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| entry.into_document(position))
            .collect::<Result<Vec<_>>>()?;

        let corpus = Corpus::new(documents)?;
        info!(
            "Loaded {} documents from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }
}

fn read_json_array(path: &Path) -> Result<Vec<RawEntry>> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| {
        TandemError::corpus(format!(
            "Failed to parse JSON array in '{}': {e}",
            path.display()
        ))
    })
}

fn read_json_lines(path: &Path) -> Result<Vec<RawEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|e| {
            TandemError::corpus(format!(
                "Failed to parse line {} of '{}': {e}",
                line_num + 1,
                path.display()
            ))
        })?;
        entries.push(entry);
    }

    Ok(entries)
}
