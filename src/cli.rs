//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use link_dl::{DEFAULT_PARALLEL, DEFAULT_USER_AGENT};

/// Download files linked from any webpage.
///
/// link-dl fetches one HTML page, collects every downloadable-file link
/// on it, and retrieves the files concurrently with readable filenames
/// derived from the link text.
#[derive(Parser, Debug)]
#[command(name = "link-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Page URL to scan for file links
    pub url: String,

    /// Output directory for saved files
    #[arg(short, long, default_value = "./downloads")]
    pub out: PathBuf,

    /// Number of parallel downloads (1-100)
    #[arg(short, long, default_value_t = DEFAULT_PARALLEL as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub parallel: u8,

    /// Comma-separated file extensions to download
    #[arg(short, long, default_value = "pdf,xlsx,xls,xlsm")]
    pub ext: String,

    /// Download all known file types (ignores --ext)
    #[arg(long)]
    pub all: bool,

    /// Regex pattern the resolved URL must match
    #[arg(short, long)]
    pub include: Option<String>,

    /// List matching files only, don't download
    #[arg(short, long)]
    pub list: bool,

    /// User-Agent header sent with every request
    #[arg(long = "ua", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long)]
    pub quiet: bool,
}
