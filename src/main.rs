//! CLI entry point for the link-dl tool.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use link_dl::{
    DownloadEngine, FetchClient, FilterCriteria, FilterMode, UniqueNameAllocator, extract,
    parse_base_url,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Diagnostics go to stderr; stdout carries the listing/outcome protocol.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    // Compile filters before any network traffic so a bad pattern fails fast.
    let mode = if args.all {
        FilterMode::AllKnown
    } else {
        FilterMode::from_extension_list(&args.ext)
    };
    let criteria = FilterCriteria::new(mode, args.include.as_deref())?;
    let base_url = parse_base_url(&args.url)?;

    let page_client = FetchClient::for_page(&args.user_agent);
    let html = page_client
        .fetch_page(base_url.as_str())
        .await
        .context("failed to fetch page")?;

    let candidates = extract(&html, &base_url, &criteria);

    if candidates.is_empty() {
        println!("No matching files found.");
        return Ok(());
    }

    println!("Found {} files:\n", candidates.len());
    for (i, candidate) in candidates.iter().enumerate() {
        println!("  {:3}. {}", i + 1, candidate.name);
        println!("       {}", candidate.url);
    }
    println!();

    if args.list {
        return Ok(());
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create directory {}", args.out.display()))?;

    let client = FetchClient::for_transfer(&args.user_agent);
    let allocator = Arc::new(UniqueNameAllocator::new());
    let engine = DownloadEngine::new(usize::from(args.parallel))?;

    info!(count = candidates.len(), out = %args.out.display(), "starting downloads");

    let summary = engine
        .run(candidates, &client, &allocator, &args.out, |outcome| {
            match &outcome.error {
                None => println!("✓ {}", outcome.filename),
                Some(error) => println!("✗ {}: {error}", outcome.filename),
            }
        })
        .await?;

    println!(
        "\nDone! Success: {}, Failed: {}",
        summary.success(),
        summary.failed()
    );

    Ok(())
}
