use crate::{ChunkRecord, StoreError, StoredMatch};
use async_trait::async_trait;

/// Remote collection that owns embedding, indexing and similarity search.
#[async_trait]
pub trait VectorStore {
    async fn collection_exists(&self) -> Result<bool, StoreError>;

    async fn create_collection(&self) -> Result<(), StoreError>;

    /// Uploads one batch and returns how many records the store accepted.
    async fn insert_many(&self, records: &[ChunkRecord]) -> Result<usize, StoreError>;

    async fn near_text(&self, query: &str, limit: usize) -> Result<Vec<StoredMatch>, StoreError>;
}
