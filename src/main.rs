//! docgraph main entry point
//!
//! This is the command-line interface for building and inspecting cached
//! documentation snapshots.

use clap::Parser;
use docgraph::cache::{load_or_refresh, GraphSource, SnapshotCache};
use docgraph::config::{load_config_with_hash, validate_version, Config};
use docgraph::crawler::GraphBuilder;
use docgraph::storage::{open_storage, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// docgraph: a local, cross-linked snapshot of versioned documentation
///
/// docgraph crawls the "topics" and "ref" sections of one documentation
/// release, links the pages into a parent/previous/next graph and caches
/// the result so later runs can skip the crawl.
#[derive(Parser, Debug)]
#[command(name = "docgraph")]
#[command(version)]
#[command(about = "Cached, cross-linked documentation snapshots", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Documentation version to use instead of the configured one
    #[arg(long, value_name = "VERSION")]
    doc_version: Option<String>,

    /// Rebuild the snapshot even if the cached one is fresh
    #[arg(long, conflicts_with_all = ["status", "list", "dry_run"])]
    refresh: bool,

    /// Show cache age and staleness and exit
    #[arg(long, conflicts_with_all = ["refresh", "list", "dry_run"])]
    status: bool,

    /// Print the cached documents as an indented tree and exit
    #[arg(long, conflicts_with_all = ["refresh", "status", "dry_run"])]
    list: bool,

    /// Validate config and show which pages would be crawled
    #[arg(long, conflicts_with_all = ["refresh", "status", "list"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let version = match cli.doc_version {
        Some(version) => {
            validate_version(&version)?;
            version
        }
        None => config.site.version.clone(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &version).await
    } else if cli.status {
        handle_status(&config, &version)
    } else if cli.list {
        handle_list(&config, &version)
    } else {
        handle_load(&config, &version, cli.refresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docgraph=info,warn"),
            1 => EnvFilter::new("docgraph=debug,info"),
            2 => EnvFilter::new("docgraph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_cache(config: &Config) -> anyhow::Result<SnapshotCache<SqliteStore>> {
    let store = open_storage(Path::new(&config.cache.database_path))?;
    Ok(SnapshotCache::new(store, config.cache.namespace.clone()))
}

/// Handles the --dry-run mode: validates config and lists in-scope pages
async fn handle_dry_run(config: &Config, version: &str) -> anyhow::Result<()> {
    println!("=== docgraph Dry Run ===\n");

    println!("Site:");
    println!("  Sitemap: {}", config.site.sitemap_url);
    println!("  Version: {}", version);

    println!("\nCache:");
    println!("  Database: {}", config.cache.database_path);
    println!("  Namespace: {}", config.cache.namespace);
    println!("  Max age: {} days", config.cache.max_age_days);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    let builder = GraphBuilder::from_config(config)?;
    let urls = builder.in_scope_urls(version).await?;

    println!("\nIn-scope pages ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --status mode: reports cache age without crawling
fn handle_status(config: &Config, version: &str) -> anyhow::Result<()> {
    let cache = open_cache(config)?;
    let status = cache.status(version, config.cache.max_age())?;

    println!("Snapshot: {}", status.key);
    match status.last_refresh {
        Some(at) => {
            println!("  Last refresh: {}", at.to_rfc3339());
            if let Some(age_ms) = status.age_ms {
                println!("  Age: {:.1} hours", age_ms as f64 / 3_600_000.0);
            }
            println!("  Entries: {}", status.entries);
        }
        None => println!("  No snapshot cached"),
    }
    println!(
        "  Status: {}",
        if status.stale { "stale" } else { "fresh" }
    );

    Ok(())
}

/// Handles the --list mode: prints the cached graph as a tree
fn handle_list(config: &Config, version: &str) -> anyhow::Result<()> {
    let cache = open_cache(config)?;

    let Some(graph) = cache.read(version)? else {
        println!("No snapshot cached for version {}", version);
        return Ok(());
    };

    for (id, document) in graph.iter() {
        let indent = "  ".repeat(graph.depth_of(id));
        println!("{}{} <{}>", indent, document.title(), document.url());
    }

    Ok(())
}

/// Handles the default mode: load the cached graph, crawling when needed
async fn handle_load(config: &Config, version: &str, force: bool) -> anyhow::Result<()> {
    let mut cache = open_cache(config)?;
    let builder = GraphBuilder::from_config(config)?;

    if force {
        tracing::info!("Forcing refresh of version {}", version);
    }
    let loaded =
        load_or_refresh(&mut cache, &builder, version, config.cache.max_age(), force).await?;

    let origin = match loaded.source {
        GraphSource::Cache => "cache",
        GraphSource::Crawl => "crawl",
    };
    println!(
        "✓ {} documents for version {} (from {})",
        loaded.graph.len(),
        version,
        origin
    );

    Ok(())
}
