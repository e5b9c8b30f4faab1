//! # Note Alchemy CLI (`alchemist`)
//!
//! The `alchemist` binary is the primary interface for Note Alchemy. It
//! provides commands for database initialization, vault indexing, article
//! processing, lexical search, document retrieval, and index maintenance.
//!
//! ## Usage
//!
//! ```bash
//! alchemist --config ./config/alchemy.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `alchemist init` | Create the SQLite database and schema |
//! | `alchemist index` | Scan the vault, fingerprint changed files |
//! | `alchemist process <file>` | Run the 5-stage pipeline on an article |
//! | `alchemist search "<query>"` | Lexical search over the fingerprint corpus |
//! | `alchemist get <doc_id>` | Print a full document by id |
//! | `alchemist delete <doc_id>` | Remove a document from the index |
//! | `alchemist stats` | Show index statistics |

use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use note_alchemy::config::{load_config, Config};
use note_alchemy::indexer;
use note_alchemy::llm;
use note_alchemy::process;
use note_alchemy::sqlite_store::SqliteStore;
use note_alchemy::stages::ChatStages;
use note_alchemy::stats;
use note_alchemy::Store;
use note_alchemy::{db, migrate};

/// Note Alchemy — distill notes into reasoning fingerprints and
/// synthesize new atomic notes from articles.
#[derive(Parser)]
#[command(
    name = "alchemist",
    about = "Note Alchemy — a retrieval-and-synthesis pipeline for atomic knowledge notes",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/alchemy.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the reasoning index table.
    /// Idempotent — running it multiple times is safe.
    Init,

    /// Scan the vault and fingerprint new or changed files.
    ///
    /// Files whose content is unchanged since the last run are skipped.
    /// Requires a configured model provider for fingerprint generation.
    Index {
        /// Re-fingerprint every file, ignoring content hashes.
        #[arg(long)]
        full: bool,

        /// Delete index entries whose source file no longer exists.
        #[arg(long)]
        prune: bool,
    },

    /// Run the synthesis pipeline on an article.
    ///
    /// Reads the article from a file, or from stdin when no file is
    /// given, and prints the synthesized knowledge points.
    Process {
        /// Path to the article text; stdin when omitted.
        file: Option<PathBuf>,

        /// Source URL recorded in the synthesized notes.
        #[arg(long, default_value = "")]
        url: String,

        /// Print the knowledge points as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Lexical search over the fingerprint corpus (debugging aid).
    ///
    /// Ranks the stored fingerprints against the raw query text with
    /// BM25 — no fingerprinting, no re-ranking.
    Search {
        /// The query string.
        query: String,

        /// Maximum number of results.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Print a document by id.
    Get {
        /// Document id (vault-relative path).
        doc_id: String,
    },

    /// Remove a document from the index.
    ///
    /// A no-op when the id is absent.
    Delete {
        /// Document id (vault-relative path).
        doc_id: String,
    },

    /// Show index statistics.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => cmd_init(&config).await,
        Commands::Index { full, prune } => cmd_index(&config, full, prune).await,
        Commands::Process { file, url, json } => cmd_process(&config, file, &url, json).await,
        Commands::Search { query, limit } => cmd_search(&config, &query, limit).await,
        Commands::Get { doc_id } => cmd_get(&config, &doc_id).await,
        Commands::Delete { doc_id } => cmd_delete(&config, &doc_id).await,
        Commands::Stats => cmd_stats(&config).await,
    }
}

async fn cmd_init(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    println!("Initialized reasoning index at {}", config.db.path.display());
    Ok(())
}

async fn cmd_index(config: &Config, full: bool, prune: bool) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    let provider = llm::create_provider(&config.model)?;
    let stages = ChatStages::new(provider);

    let outcome = indexer::index_vault(&config.vault, &store, &stages, full, prune).await?;

    println!("index {}", config.vault.root.display());
    println!("  scanned: {}", outcome.scanned);
    println!("  indexed: {}", outcome.indexed);
    println!("  skipped: {}", outcome.skipped);
    println!("  failed:  {}", outcome.failed);
    if prune {
        println!("  pruned:  {}", outcome.pruned);
    }
    Ok(())
}

async fn cmd_process(
    config: &Config,
    file: Option<PathBuf>,
    url: &str,
    json: bool,
) -> Result<()> {
    let article_text = match file {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let points = process::process_article(config, &article_text, url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else if points.is_empty() {
        println!("No knowledge points were produced.");
    } else {
        for point in &points {
            println!("## {}\n\n{}\n", point.title, point.content);
        }
    }
    Ok(())
}

async fn cmd_search(config: &Config, query: &str, limit: usize) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    let candidates = store.search(query, limit).await?;
    if candidates.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, c) in candidates.iter().enumerate() {
        let excerpt: String = c.fingerprint_text.chars().take(96).collect();
        println!("{:2}. [{:.4}] {}\n      {}", i + 1, c.score, c.doc_id, excerpt);
    }
    Ok(())
}

async fn cmd_get(config: &Config, doc_id: &str) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    match store.get(doc_id).await? {
        Some(doc) => {
            println!("doc_id: {}", doc.doc_id);
            println!("metadata: {}", doc.metadata);
            println!("fingerprint:\n{}\n", doc.fingerprint_text);
            println!("full text:\n{}", doc.full_text);
        }
        None => println!("Document not found: {}", doc_id),
    }
    Ok(())
}

async fn cmd_delete(config: &Config, doc_id: &str) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    store.delete(doc_id).await?;
    println!("Deleted {} (if it existed)", doc_id);
    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;

    let stats = stats::collect_stats(&pool).await?;
    println!("documents:     {}", stats.documents);
    println!("fingerprinted: {}", stats.fingerprinted);
    Ok(())
}
