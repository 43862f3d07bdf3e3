//! CLI interface for the embedding store

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use embedding_db::embedding::{
    EmbedderConfig, MockEmbedder, OpenAiEmbedder, DEFAULT_BASE_URL, DEFAULT_DIMENSION,
    DEFAULT_MODEL,
};
use embedding_db::session::{Session, DEFAULT_SEED_WORDS};
use embedding_db::{Embedder, SearchOptions};
use tracing::info;

#[derive(Parser)]
#[command(name = "embedding-db")]
#[command(about = "An in-memory embedding store with cosine top-k search", long_about = None)]
struct Cli {
    /// Vector dimension of the store (must match the model)
    #[arg(long, env = "EMBEDDING_DB_DIMENSION", default_value_t = DEFAULT_DIMENSION)]
    dimension: usize,

    #[command(subcommand)]
    command: Commands,
}

/// Embedding provider settings, used only by `repl`
#[derive(Args)]
struct ProviderArgs {
    /// Where embeddings come from
    #[arg(long, value_enum, default_value = "openai")]
    provider: Provider,

    /// API key for the embedding provider
    #[arg(long, env = "EMBEDDING_DB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Embedding model identifier
    #[arg(long, env = "EMBEDDING_DB_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "EMBEDDING_DB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[derive(ValueEnum, Clone, Copy)]
enum Provider {
    Openai,
    Mock,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively look up the nearest words
    Repl {
        /// Number of neighbours to show
        #[arg(short, default_value = "5")]
        k: usize,
        /// Leave the queried word out of its own results
        #[arg(long)]
        exclude_self: bool,
        /// Words to embed before the first prompt
        #[arg(long, value_delimiter = ',')]
        seed: Vec<String>,
        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
    },
}

async fn run_repl<E: Embedder>(
    embedder: E,
    k: usize,
    options: SearchOptions,
    seed: Vec<String>,
) -> Result<()> {
    let mut session = Session::new(embedder, k, options)?;

    let seed: Vec<String> = if seed.is_empty() {
        DEFAULT_SEED_WORDS.iter().map(|w| w.to_string()).collect()
    } else {
        seed
    };
    let stored = session.seed(&seed).await;
    info!(stored, requested = seed.len(), "seeded store");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout).await?;
    Ok(())
}

fn openai_embedder(args: &ProviderArgs, dimension: usize) -> Result<OpenAiEmbedder> {
    let api_key = args
        .api_key
        .clone()
        .context("EMBEDDING_DB_API_KEY is not set (or pass --api-key, or use --provider mock)")?;

    let mut config = EmbedderConfig::new(api_key);
    config.model = args.model.clone();
    config.base_url = args.base_url.clone();
    config.dimension = dimension;

    Ok(OpenAiEmbedder::new(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Repl {
            k,
            exclude_self,
            seed,
            provider,
        } => {
            let options = SearchOptions {
                exclude_self: *exclude_self,
            };
            match provider.provider {
                Provider::Openai => {
                    let embedder = openai_embedder(provider, cli.dimension)?;
                    run_repl(embedder, *k, options, seed.clone()).await
                }
                Provider::Mock => {
                    run_repl(MockEmbedder::new(cli.dimension), *k, options, seed.clone()).await
                }
            }
        }
        Commands::Serve { addr } => embedding_db::server::start(addr, cli.dimension).await,
    }
}
