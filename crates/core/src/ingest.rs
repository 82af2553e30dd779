use crate::chunking::{chunk_text, ChunkingConfig};
use crate::error::IngestError;
use crate::identity::chunk_id;
use crate::models::ChunkRecord;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Lists `*.pdf` files directly inside `folder`, sorted by path.
///
/// A missing folder or a folder without PDFs is logged and yields an empty list.
pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    if !folder.is_dir() {
        warn!(folder = %folder.display(), "assets directory not found");
        return Vec::new();
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();

    if files.is_empty() {
        warn!(folder = %folder.display(), "no pdf files found");
    } else {
        info!(folder = %folder.display(), count = files.len(), "found pdf files to process");
    }

    files
}

/// Chunks one document's text into upload-ready records.
pub fn build_records(
    path: &Path,
    text: &str,
    config: ChunkingConfig,
    processed_at: DateTime<Utc>,
) -> Result<Vec<ChunkRecord>, IngestError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IngestError::MissingFileName(path.display().to_string()))?;
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);

    let records = chunk_text(text, config)?
        .into_iter()
        .enumerate()
        .map(|(index, content)| {
            let chunk_index = index as u64;
            ChunkRecord {
                filename: filename.to_string(),
                chunk_index,
                chunk_id: chunk_id(stem, chunk_index, &content),
                content,
                file_path: path.to_string_lossy().to_string(),
                processed_at,
            }
        })
        .collect();

    Ok(records)
}
