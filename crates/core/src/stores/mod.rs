pub mod weaviate;

pub use weaviate::WeaviateStore;
