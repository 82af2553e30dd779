use crate::chunking::ChunkingConfig;
use crate::error::{Disposition, IngestError, PipelineError};
use crate::extractor::{extract_document_text, PdfExtractor};
use crate::ingest::{build_records, discover_pdf_files};
use crate::models::{IngestionReport, SchemaStatus, SearchHit, SkippedPdf};
use crate::traits::VectorStore;
use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};

enum FileOutcome {
    Uploaded(usize),
    NoText,
}

/// Runs the discover, extract, chunk and upload steps against one store.
pub struct Pipeline<S, E> {
    store: S,
    extractor: E,
    chunking: ChunkingConfig,
}

impl<S, E> Pipeline<S, E>
where
    S: VectorStore + Send + Sync,
    E: PdfExtractor,
{
    pub fn new(store: S, extractor: E, chunking: ChunkingConfig) -> Result<Self, IngestError> {
        chunking.validate()?;
        Ok(Self {
            store,
            extractor,
            chunking,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub async fn ensure_schema(&self) -> Result<SchemaStatus, PipelineError> {
        if self
            .store
            .collection_exists()
            .await
            .map_err(PipelineError::Schema)?
        {
            info!("collection already exists");
            return Ok(SchemaStatus::AlreadyExists);
        }

        self.store
            .create_collection()
            .await
            .map_err(PipelineError::Schema)?;
        info!("created collection");
        Ok(SchemaStatus::Created)
    }

    /// Processes every PDF in `folder`, one upload batch per file.
    ///
    /// Files that fail to extract or upload are recorded in the report and
    /// skipped; only failures whose disposition is `Abort` end the run.
    pub async fn process_documents(&self, folder: &Path) -> Result<IngestionReport, PipelineError> {
        let files = discover_pdf_files(folder);
        let mut report = IngestionReport {
            files_found: files.len(),
            ..IngestionReport::default()
        };

        for path in files {
            match self.process_file(&path).await {
                Ok(FileOutcome::Uploaded(count)) => {
                    report.files_uploaded += 1;
                    report.total_chunks += count;
                }
                Ok(FileOutcome::NoText) => {
                    warn!(path = %path.display(), "no text extracted, skipping file");
                    report.skipped_files.push(SkippedPdf {
                        path,
                        reason: "no extractable text".to_string(),
                    });
                }
                Err(error) => {
                    let reason = error.to_string();
                    absorb(error)?;
                    report.skipped_files.push(SkippedPdf { path, reason });
                }
            }
        }

        info!(
            files = report.files_found,
            uploaded_files = report.files_uploaded,
            total_chunks = report.total_chunks,
            "finished processing documents"
        );
        Ok(report)
    }

    async fn process_file(&self, path: &Path) -> Result<FileOutcome, PipelineError> {
        info!(path = %path.display(), "processing");
        let extract_error = |source: IngestError| PipelineError::Extract {
            path: path.to_path_buf(),
            source,
        };

        let text = extract_document_text(&self.extractor, path).map_err(extract_error)?;
        if text.trim().is_empty() {
            return Ok(FileOutcome::NoText);
        }

        let records =
            build_records(path, &text, self.chunking, Utc::now()).map_err(extract_error)?;
        info!(chunks = records.len(), "generated chunks");

        let uploaded = self
            .store
            .insert_many(&records)
            .await
            .map_err(|source| PipelineError::Upload {
                path: path.to_path_buf(),
                source,
            })?;
        info!(chunks = uploaded, "uploaded chunks");

        Ok(FileOutcome::Uploaded(uploaded))
    }

    pub async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, PipelineError> {
        let matches = self
            .store
            .near_text(query, limit)
            .await
            .map_err(PipelineError::Search)?;
        Ok(matches.into_iter().map(SearchHit::from).collect())
    }

    /// Similarity search that logs failures and answers with no hits instead.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            warn!("search query is empty");
            return Vec::new();
        }

        match self.try_search(query, limit).await {
            Ok(hits) => hits,
            Err(error) => {
                warn!(%error, "search failed");
                Vec::new()
            }
        }
    }
}

/// Logs and swallows failures that only cost the current item.
pub fn absorb(error: PipelineError) -> Result<(), PipelineError> {
    match error.disposition() {
        Disposition::Abort => Err(error),
        Disposition::Continue => {
            warn!(%error, "continuing after failure");
            Ok(())
        }
    }
}
