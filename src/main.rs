use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use walkdir::WalkDir;

use service_indexer::config::Config;
use service_indexer::datasource::{is_supported_file, DataSource, LocalSource, UrlSource};
use service_indexer::external::{EmbeddingEngine, VectorDB};
use service_indexer::pipeline::IngestionPipeline;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ingest social-service documents into a vector store", long_about = None)]
struct Args {
    /// Data source: a URL or a local file/directory (repeatable)
    #[arg(short, long)]
    source: Vec<String>,

    /// Directory where collected documents are stored
    #[arg(short = 'd', long)]
    data_dir: Option<String>,

    /// Ollama host override (applies to LLM and embeddings)
    #[arg(long)]
    ollama_host: Option<String>,

    /// LLM model used for metadata extraction
    #[arg(short = 'm', long)]
    llm_model: Option<String>,

    /// Embedding model
    #[arg(long)]
    embedding_model: Option<String>,

    /// Qdrant collection name
    #[arg(short, long)]
    collection: Option<String>,

    /// Run a similarity search instead of ingesting
    #[arg(short, long)]
    query: Option<String>,

    /// Number of search results
    #[arg(long, default_value_t = 5)]
    limit: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::from_env()?;

    // CLI arguments take precedence over environment variables.
    if let Some(host) = args.ollama_host {
        config.llm.host = host.clone();
        config.embedding.host = host;
    }
    if let Some(model) = args.llm_model {
        config.llm.model = model;
    }
    if let Some(model) = args.embedding_model {
        config.embedding.model = model;
    }
    if let Some(collection) = args.collection {
        config.vector_db.collection_name = collection;
    }
    if let Some(data_dir) = args.data_dir {
        config.processing.data_dir = data_dir;
    }
    config.validate()?;

    if let Some(query) = args.query {
        return run_query(&config, &query, args.limit).await;
    }

    std::fs::create_dir_all(&config.processing.data_dir)?;
    let data_dir = PathBuf::from(&config.processing.data_dir);

    let mut collected_files = Vec::new();
    if args.source.is_empty() {
        // No sources given; fall back to whatever already sits in the
        // data directory.
        println!(
            "No sources given. Scanning {} for existing documents...",
            data_dir.display()
        );
        for entry in WalkDir::new(&data_dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_supported_file(entry.path()) {
                collected_files.push(entry.path().to_path_buf());
            }
        }
        if collected_files.is_empty() {
            println!("No documents found in {}. Exiting.", data_dir.display());
            return Ok(());
        }
    } else {
        println!("Collecting documents from {} source(s)...", args.source.len());
        for input in &args.source {
            let source: Box<dyn DataSource> =
                if input.starts_with("http://") || input.starts_with("https://") {
                    Box::new(UrlSource::new(input)?)
                } else {
                    Box::new(LocalSource::new(input))
                };
            let files = source.collect(&data_dir).await?;
            collected_files.extend(files);
        }
    }
    collected_files.sort();
    println!("Found {} document(s) to process.", collected_files.len());

    let pipeline = IngestionPipeline::new(&config).await?;

    let mut summaries = Vec::new();
    for file in &collected_files {
        summaries.push(pipeline.process_file(file).await);
    }

    let successful = summaries.iter().filter(|s| s.is_success()).count();
    println!(
        "\nIngestion complete: {} succeeded, {} failed.",
        successful,
        summaries.len() - successful
    );
    for summary in &summaries {
        match &summary.error {
            None => println!(
                "  ok   {} ({} pages, {} chunks, service_type: {}, city: {})",
                summary.file.display(),
                summary.pages,
                summary.chunks,
                summary.service_type.as_deref().unwrap_or("-"),
                summary.city.as_deref().unwrap_or("-"),
            ),
            Some(error) => println!("  fail {}: {}", summary.file.display(), error),
        }
    }

    Ok(())
}

async fn run_query(config: &Config, query: &str, limit: u64) -> Result<()> {
    let embedder = EmbeddingEngine::new(config.embedding.clone()).await?;
    let store = VectorDB::new(config.vector_db.clone()).await?;

    let vector = embedder.embed(query).await?;
    let hits = store.similarity_search(vector, limit).await?;

    println!("{} result(s) for \"{}\":", hits.len(), query);
    for (i, hit) in hits.iter().enumerate() {
        println!("\n[{}] score {:.4} (id {})", i + 1, hit.score, hit.id);
        if let Some(text) = &hit.text {
            let preview: String = text.chars().take(240).collect();
            println!("{}", preview);
        }
    }

    Ok(())
}
