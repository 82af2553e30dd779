use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use pdf_vectorizer_core::{
    absorb, ChunkingConfig, Credentials, LopdfExtractor, Pipeline, PipelineError, SearchHit,
    WeaviateConfig, WeaviateStore, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_COLLECTION,
    DEFAULT_SEARCH_LIMIT,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-vectorizer", version, about = "Vectorize PDF documents into Weaviate")]
struct Cli {
    /// Weaviate cluster URL; a bare host is reached over https
    #[arg(long, env = "WEAVIATE_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Directory containing PDF files
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Search query to test the system
    #[arg(long, conflicts_with = "create_schema")]
    search: Option<String>,

    /// Create the schema only
    #[arg(long, default_value_t = false)]
    create_schema: bool,

    /// Number of search results to return
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: usize,

    /// Chunk size in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    overlap: usize,

    /// Collection that stores the chunks
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    collection: String,
}

enum Mode {
    CreateSchema,
    Search(String),
    Ingest,
}

impl Cli {
    fn mode(&self) -> Mode {
        match (&self.search, self.create_schema) {
            (_, true) => Mode::CreateSchema,
            (Some(query), false) => Mode::Search(query.clone()),
            (None, false) => Mode::Ingest,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let credentials = Credentials::from_env()?;
    let chunking = ChunkingConfig::new(cli.chunk_size, cli.overlap)?;
    let config = WeaviateConfig::new(&cli.url, cli.collection.as_str(), credentials)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "pdf-vectorizer boot"
    );

    let store = WeaviateStore::connect(&config)
        .await
        .map_err(PipelineError::Connect)?;
    let pipeline = Pipeline::new(store, LopdfExtractor, chunking)?;

    let outcome = run(&pipeline, &cli).await;
    pipeline.into_store().close();
    outcome
}

async fn run(pipeline: &Pipeline<WeaviateStore, LopdfExtractor>, cli: &Cli) -> anyhow::Result<()> {
    match cli.mode() {
        Mode::CreateSchema => {
            if let Err(error) = pipeline.ensure_schema().await {
                absorb(error)?;
            }
        }
        Mode::Search(query) => {
            let hits = pipeline.search(&query, cli.limit).await;
            println!("Search results for '{query}':");
            print_hits(&hits);
        }
        Mode::Ingest => {
            if let Err(error) = pipeline.ensure_schema().await {
                absorb(error)?;
            }

            let report = pipeline
                .process_documents(&cli.assets_dir)
                .await
                .with_context(|| format!("processing {}", cli.assets_dir.display()))?;

            for skipped in &report.skipped_files {
                println!("Skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            println!("Total chunks processed: {}", report.total_chunks);
        }
    }

    Ok(())
}

fn print_hits(hits: &[SearchHit]) {
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} (chunk {}) - Score: {:.4}",
            rank + 1,
            hit.filename,
            hit.chunk_index,
            hit.score
        );
        println!("   {}\n", hit.preview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ingesting_assets() {
        let cli = Cli::try_parse_from(["pdf-vectorizer"]).expect("defaults should parse");
        assert!(matches!(cli.mode(), Mode::Ingest));
        assert_eq!(cli.assets_dir, PathBuf::from("assets"));
        assert_eq!(cli.chunk_size, 1_000);
        assert_eq!(cli.overlap, 100);
        assert_eq!(cli.collection, "Documents");
    }

    #[test]
    fn search_takes_the_query() {
        let cli = Cli::try_parse_from(["pdf-vectorizer", "--search", "pump pressure"])
            .expect("search should parse");
        assert!(matches!(cli.mode(), Mode::Search(query) if query == "pump pressure"));
    }

    #[test]
    fn create_schema_and_search_are_exclusive() {
        let result =
            Cli::try_parse_from(["pdf-vectorizer", "--create-schema", "--search", "pump"]);
        assert!(result.is_err());
    }
}
