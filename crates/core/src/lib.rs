pub mod chunking;
pub mod config;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod stores;
pub mod traits;

pub use chunking::{chunk_text, ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use config::{parse_endpoint, Credentials, WeaviateConfig};
pub use error::{ConfigError, Disposition, IngestError, PipelineError, StoreError};
pub use extractor::{extract_document_text, join_pages, LopdfExtractor, PageText, PdfExtractor};
pub use identity::{chunk_id, object_uuid};
pub use ingest::{build_records, discover_pdf_files};
pub use models::{
    preview, ChunkRecord, IngestionReport, SchemaStatus, SearchHit, SkippedPdf, StoredMatch,
    DEFAULT_COLLECTION, DEFAULT_SEARCH_LIMIT, PREVIEW_CHARS,
};
pub use orchestrator::{absorb, Pipeline};
pub use stores::WeaviateStore;
pub use traits::VectorStore;
