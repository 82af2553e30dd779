use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{failed} of {total} objects rejected: {first_message}")]
    RejectedObjects {
        failed: usize,
        total: usize,
        first_message: String,
    },

    #[error("graphql error: {0}")]
    GraphQl(String),

    #[error("service not ready at {0}")]
    NotReady(String),

    #[error("request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} environment variable not set; add it to .env as {name}=your_key_here")]
    MissingCredential { name: &'static str },

    #[error("invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

/// What the caller should do with a failed pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Abort,
    Continue,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to connect to vector store: {0}")]
    Connect(#[source] StoreError),

    #[error("failed to create schema: {0}")]
    Schema(#[source] StoreError),

    #[error("failed to extract text from {}: {source}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: IngestError,
    },

    #[error("failed to upload chunks of {}: {source}", .path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("search failed: {0}")]
    Search(#[source] StoreError),
}

impl PipelineError {
    /// Losing the connection ends the run; every other stage only loses its own item.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Connect(_) => Disposition::Abort,
            Self::Schema(_) | Self::Extract { .. } | Self::Upload { .. } | Self::Search(_) => {
                Disposition::Continue
            }
        }
    }
}
