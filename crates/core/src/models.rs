use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLLECTION: &str = "Documents";
pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const PREVIEW_CHARS: usize = 200;

/// One chunk of a PDF's text as stored in the vector collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkRecord {
    pub filename: String,
    pub chunk_index: u64,
    pub content: String,
    pub file_path: String,
    pub processed_at: DateTime<Utc>,
    pub chunk_id: String,
}

/// A stored chunk returned by a similarity query, before formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredMatch {
    pub filename: Option<String>,
    pub chunk_index: Option<u64>,
    pub content: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub filename: String,
    pub chunk_index: u64,
    pub preview: String,
    pub score: f64,
}

impl From<StoredMatch> for SearchHit {
    fn from(value: StoredMatch) -> Self {
        Self {
            filename: value.filename.unwrap_or_default(),
            chunk_index: value.chunk_index.unwrap_or_default(),
            preview: preview(value.content.as_deref().unwrap_or_default(), PREVIEW_CHARS),
            score: value.score.unwrap_or(0.0),
        }
    }
}

/// Truncates to `max_chars` characters, marking the cut with an ellipsis.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &content[..byte_index]),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    AlreadyExists,
    Created,
}

#[derive(Debug, Clone, Default)]
pub struct SkippedPdf {
    pub path: std::path::PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub files_found: usize,
    pub files_uploaded: usize,
    pub total_chunks: usize,
    pub skipped_files: Vec<SkippedPdf>,
}
