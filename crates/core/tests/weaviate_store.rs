use chrono::Utc;
use pdf_vectorizer_core::{
    object_uuid, ChunkRecord, Credentials, StoreError, VectorStore, WeaviateConfig, WeaviateStore,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> WeaviateConfig {
    let credentials = Credentials {
        weaviate_api_key: "wv-test".to_string(),
        openai_api_key: "sk-test".to_string(),
    };
    WeaviateConfig::new(&server.uri(), "Documents", credentials).expect("mock uri should parse")
}

async fn ready_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/.well-known/ready"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

fn record(index: u64, content: &str) -> ChunkRecord {
    ChunkRecord {
        filename: "manual.pdf".to_string(),
        chunk_index: index,
        content: content.to_string(),
        file_path: "assets/manual.pdf".to_string(),
        processed_at: Utc::now(),
        chunk_id: format!("manual_{index}_0123abcd"),
    }
}

#[tokio::test]
async fn connect_fails_when_service_is_not_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/.well-known/ready"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = WeaviateStore::connect(&config_for(&server)).await;
    assert!(matches!(result, Err(StoreError::NotReady(_))));
}

#[tokio::test]
async fn requests_carry_both_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/.well-known/ready"))
        .and(header("authorization", "Bearer wv-test"))
        .and(header("x-openai-api-key", "sk-test"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    assert_eq!(store.collection(), "Documents");
    store.close();
}

#[tokio::test]
async fn collection_existence_follows_status_code() {
    let server = ready_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/schema/Documents"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    assert!(!store.collection_exists().await.expect("lookup should succeed"));
}

#[tokio::test]
async fn create_collection_posts_openai_class() {
    let server = ready_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/schema"))
        .and(body_partial_json(json!({
            "class": "Documents",
            "vectorizer": "text2vec-openai"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"class": "Documents"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    store
        .create_collection()
        .await
        .expect("schema creation should succeed");
}

#[tokio::test]
async fn create_collection_surfaces_backend_errors() {
    let server = ready_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/schema"))
        .respond_with(ResponseTemplate::new(422).set_body_string("class already exists"))
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    match store.create_collection().await {
        Err(StoreError::BackendResponse { backend, details }) => {
            assert_eq!(backend, "weaviate");
            assert!(details.contains("class already exists"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn insert_many_sends_one_batch_with_deterministic_ids() {
    let server = ready_server().await;
    let records = vec![record(0, "first chunk"), record(1, "second chunk")];
    Mock::given(method("POST"))
        .and(path("/v1/batch/objects"))
        .and(body_partial_json(json!({
            "objects": [
                {
                    "class": "Documents",
                    "id": object_uuid("manual_0_0123abcd").to_string(),
                    "properties": {"filename": "manual.pdf", "chunk_index": 0, "content": "first chunk"}
                },
                {
                    "class": "Documents",
                    "id": object_uuid("manual_1_0123abcd").to_string(),
                    "properties": {"chunk_index": 1, "content": "second chunk"}
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "result": {}},
            {"id": "b", "result": {}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    let uploaded = store
        .insert_many(&records)
        .await
        .expect("batch should succeed");
    assert_eq!(uploaded, 2);
}

#[tokio::test]
async fn insert_many_reports_rejected_objects() {
    let server = ready_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/batch/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "result": {}},
            {"id": "b", "result": {"errors": {"error": [{"message": "insufficient_quota"}]}}}
        ])))
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    match store.insert_many(&[record(0, "a"), record(1, "b")]).await {
        Err(StoreError::RejectedObjects {
            failed,
            total,
            first_message,
        }) => {
            assert_eq!(failed, 1);
            assert_eq!(total, 2);
            assert_eq!(first_message, "insufficient_quota");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn near_text_maps_graphql_results() {
    let server = ready_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"Get": {"Documents": [
                {
                    "filename": "manual.pdf",
                    "chunk_index": 3,
                    "content": "pump pressure limits",
                    "_additional": {"certainty": 0.91, "distance": 0.18}
                }
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    let matches = store
        .near_text("pump \"pressure\"", 5)
        .await
        .expect("search should succeed");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].filename.as_deref(), Some("manual.pdf"));
    assert_eq!(matches[0].chunk_index, Some(3));
    assert_eq!(matches[0].content.as_deref(), Some("pump pressure limits"));
    assert_eq!(matches[0].score, Some(0.91));
}

#[tokio::test]
async fn near_text_surfaces_graphql_errors() {
    let server = ready_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Cannot query field \"Documents\" on type \"GetObjectsObj\"."}]
        })))
        .mount(&server)
        .await;

    let store = WeaviateStore::connect(&config_for(&server))
        .await
        .expect("connect should succeed");
    let result = store.near_text("anything", 5).await;
    assert!(matches!(result, Err(StoreError::GraphQl(_))));
}
