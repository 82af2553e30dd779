use crate::config::WeaviateConfig;
use crate::identity::object_uuid;
use crate::traits::VectorStore;
use crate::{ChunkRecord, StoreError, StoredMatch};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, info};

const BACKEND: &str = "weaviate";
const OPENAI_KEY_HEADER: &str = "x-openai-api-key";

/// Open connection to one Weaviate collection.
///
/// Obtained through [`WeaviateStore::connect`]. The store owns the HTTP client's
/// connection pool, so dropping it on any path releases the connections;
/// [`WeaviateStore::close`] is the explicit end of a run.
pub struct WeaviateStore {
    endpoint: String,
    collection: String,
    client: Client,
}

impl WeaviateStore {
    pub async fn connect(config: &WeaviateConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.credentials.weaviate_api_key))?,
        );
        headers.insert(
            OPENAI_KEY_HEADER,
            header_value(&config.credentials.openai_api_key)?,
        );

        let client = Client::builder().default_headers(headers).build()?;
        let store = Self {
            endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
            collection: class_name(&config.collection),
            client,
        };

        let response = store
            .client
            .get(format!("{}/v1/.well-known/ready", store.endpoint))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::NotReady(format!(
                "{} ({})",
                store.endpoint,
                response.status()
            )));
        }

        info!(endpoint = %store.endpoint, collection = %store.collection, "connected to weaviate");
        Ok(store)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn close(self) {
        debug!(endpoint = %self.endpoint, "closed weaviate connection");
    }

    fn class_definition(&self) -> Value {
        json!({
            "class": self.collection,
            "vectorizer": "text2vec-openai",
            "moduleConfig": {
                "text2vec-openai": {},
                "generative-openai": {}
            },
            "properties": [
                {"name": "filename", "dataType": ["text"]},
                {"name": "chunk_index", "dataType": ["int"]},
                {"name": "content", "dataType": ["text"]},
                {"name": "file_path", "dataType": ["text"]},
                {"name": "processed_at", "dataType": ["date"]},
                {"name": "chunk_id", "dataType": ["text"]}
            ]
        })
    }

    fn near_text_query(&self, query: &str, limit: usize) -> Result<String, StoreError> {
        let concept = serde_json::to_string(query)?;
        Ok(format!(
            "{{ Get {{ {collection}(nearText: {{concepts: [{concept}]}}, limit: {limit}) \
             {{ filename chunk_index content _additional {{ certainty distance }} }} }} }}",
            collection = self.collection,
        ))
    }
}

#[async_trait]
impl VectorStore for WeaviateStore {
    async fn collection_exists(&self) -> Result<bool, StoreError> {
        let response = self
            .client
            .get(format!("{}/v1/schema/{}", self.endpoint, self.collection))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(backend_error(response).await),
        }
    }

    async fn create_collection(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .post(format!("{}/v1/schema", self.endpoint))
            .json(&self.class_definition())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }

        Ok(())
    }

    async fn insert_many(&self, records: &[ChunkRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let objects = records
            .iter()
            .map(|record| {
                Ok(json!({
                    "class": self.collection,
                    "id": object_uuid(&record.chunk_id),
                    "properties": serde_json::to_value(record)?,
                }))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let response = self
            .client
            .post(format!("{}/v1/batch/objects", self.endpoint))
            .json(&json!({ "objects": objects }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }

        let parsed: Value = response.json().await?;
        let messages = rejected_object_messages(&parsed);
        if let Some(first_message) = messages.first() {
            return Err(StoreError::RejectedObjects {
                failed: messages.len(),
                total: records.len(),
                first_message: first_message.clone(),
            });
        }

        Ok(records.len())
    }

    async fn near_text(&self, query: &str, limit: usize) -> Result<Vec<StoredMatch>, StoreError> {
        let response = self
            .client
            .post(format!("{}/v1/graphql", self.endpoint))
            .json(&json!({ "query": self.near_text_query(query, limit)? }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }

        let parsed: Value = response.json().await?;
        if let Some(message) = parsed
            .pointer("/errors/0/message")
            .and_then(Value::as_str)
        {
            return Err(StoreError::GraphQl(message.to_string()));
        }

        let hits = parsed
            .pointer(&format!("/data/Get/{}", self.collection))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(hits.iter().map(parse_match).collect())
    }
}

fn header_value(value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value)
        .map_err(|_| StoreError::Request("credential contains invalid header characters".to_string()))
}

async fn backend_error(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::BackendResponse {
        backend: BACKEND.to_string(),
        details: if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        },
    }
}

/// Weaviate stores class names with a leading capital.
fn class_name(collection: &str) -> String {
    let mut chars = collection.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn rejected_object_messages(batch_response: &Value) -> Vec<String> {
    batch_response
        .as_array()
        .map(|objects| {
            objects
                .iter()
                .filter_map(|object| {
                    object
                        .pointer("/result/errors/error")
                        .and_then(Value::as_array)
                        .and_then(|errors| errors.first())
                })
                .map(|error| {
                    error
                        .pointer("/message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_match(hit: &Value) -> StoredMatch {
    let certainty = hit.pointer("/_additional/certainty").and_then(Value::as_f64);
    let distance = hit.pointer("/_additional/distance").and_then(Value::as_f64);

    StoredMatch {
        filename: hit
            .pointer("/filename")
            .and_then(Value::as_str)
            .map(str::to_string),
        chunk_index: hit.pointer("/chunk_index").and_then(Value::as_u64),
        content: hit
            .pointer("/content")
            .and_then(Value::as_str)
            .map(str::to_string),
        score: certainty.or(distance.map(|distance| 1.0 - distance)),
    }
}
