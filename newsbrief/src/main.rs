/*
newsbrief - single-binary digest CLI.
Fetches, ranks and summarizes news for one language and renders the digest to
stdout. The chat transport consumes the same pipeline seam.
*/

use anyhow::Result;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsbrief::fetcher::NewsFetcher;
use newsbrief::pipeline::{Digest, DigestItem, Pipeline};
use newsbrief::summarize::{Language, Summarizer};

#[derive(Parser, Debug)]
#[command(name = "newsbrief", about = "Fetch, rank and summarize news into a digest")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Digest language (de or en)
    #[arg(long, default_value = "en")]
    language: String,

    /// Emit the digest as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // unsupported language codes are a setup defect, rejected up front
    let language = Language::from_str(&args.language)?;

    let config_path = match args.config {
        Some(p) => {
            if !p.exists() {
                error!(path = ?p, "specified config file not found");
                return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
            }
            Some(p)
        }
        None => {
            let p = PathBuf::from("config.toml");
            if p.exists() {
                Some(p)
            } else {
                None
            }
        }
    };
    let config = Config::load_or_default(config_path.as_deref()).await?;
    info!(config = ?config_path, language = %language, "configuration loaded");

    let api_key = config.api_key()?;
    let fetcher = NewsFetcher::new(&config, api_key)?;
    let summarizer = Summarizer::new(config.summary.sentences);
    let pipeline = Pipeline::new(&config, fetcher, summarizer);

    match pipeline.digest(language).await {
        Digest::NoContent => println!("No current news found."),
        Digest::Items(items) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in &items {
                    println!("{}", render_item(item));
                }
            }
        }
    }

    Ok(())
}

/// Plain-text rendering of one digest entry, the shape the chat transport
/// turns into a message.
fn render_item(item: &DigestItem) -> String {
    let article = &item.article;
    format!(
        "{}\n\n{}\n\nScore: {:.2}/1.0 | Source: {} | {}\n{}\n",
        article.title,
        item.summary,
        article.score.unwrap_or_default(),
        article.source_name,
        article.published_at.format("%d.%m.%Y %H:%M"),
        article.url,
    )
}
