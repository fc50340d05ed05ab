mod config;
mod errors;
mod filter;
mod layout;
mod pipeline;
mod quotes;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::filter::BannedWords;
use crate::layout::TrueTypeFont;
use crate::pipeline::{Outcome, Pipeline, RenderSettings, DEFAULT_SINGLE_NAME};
use crate::quotes::read_quotes;

/// Render quotes onto fixed-size PNG cards.
///
/// With no arguments every quote in the quote file is rendered, skipping any
/// that match the banned-word list.
#[derive(Parser, Debug)]
#[command(name = "quotecard", version, about)]
struct Cli {
    /// Render one quote instead of the whole quote file
    #[arg(long)]
    single: bool,

    /// Quote text for --single (prompts on stdin when omitted)
    #[arg(long, value_name = "TEXT", requires = "single")]
    text: Option<String>,

    /// Output file name (without extension) for --single [default: quote]
    #[arg(long, value_name = "NAME", requires = "single")]
    name: Option<String>,

    /// Disable banned-word filtering
    #[arg(long)]
    no_censor: bool,

    #[arg(long, value_name = "FILE")]
    quotes: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    bad_words: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Font em size in pixels
    #[arg(long, value_name = "PX")]
    font_size: Option<f32>,

    /// Maximum characters per wrapped line
    #[arg(long, value_name = "N")]
    max_chars: Option<usize>,

    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    #[arg(long, value_name = "PX")]
    height: Option<u32>,

    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print the batch report (or the single-quote outcome) as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Flags win over environment values.
    fn apply(&self, config: &mut Config) {
        if self.no_censor {
            config.censor = false;
        }
        if let Some(path) = &self.quotes {
            config.quote_file = path.clone();
        }
        if let Some(path) = &self.bad_words {
            config.bad_words_file = path.clone();
        }
        if let Some(path) = &self.font {
            config.font_file = path.clone();
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(max) = self.max_chars {
            config.max_letters = max;
        }
        if let Some(width) = self.width {
            config.resolution.width = width;
        }
        if let Some(height) = self.height {
            config.resolution.height = height;
        }
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting quotecard v{}", env!("CARGO_PKG_VERSION"));

    // Banned words are loaded once and shared by every check.
    let banned = if config.censor {
        let list = BannedWords::load(&config.bad_words_file).await?;
        if list.is_empty() {
            warn!("{} has no banned words", config.bad_words_file.display());
        }
        info!("Content filter enabled ({} banned words)", list.len());
        Some(list)
    } else {
        info!("Content filter disabled");
        None
    };

    let font = TrueTypeFont::load(&config.font_file, config.font_size).await?;
    info!(
        "Font {} at {}px",
        config.font_file.display(),
        config.font_size
    );

    let pipeline = Pipeline::new(
        Arc::new(font),
        banned,
        RenderSettings {
            max_chars: config.max_letters,
            resolution: config.resolution,
            output_dir: config.output_dir.clone(),
        },
    );

    if cli.single {
        let text = match cli.text {
            Some(text) => text,
            None => prompt_quote().await?,
        };
        let name = cli.name.as_deref().unwrap_or(DEFAULT_SINGLE_NAME);
        let outcome = pipeline.process_single(&text, name).await?;
        match &outcome {
            Outcome::Rendered { path, lines } => {
                info!("Wrote {} ({lines} lines)", path.display());
            }
            Outcome::Flagged { word } => {
                warn!("Quote contains banned word '{word}'; no image written");
            }
        }
        if cli.json {
            print_json(&outcome)?;
        }
        return Ok(());
    }

    let quotes = read_quotes(&config.quote_file).await?;
    info!(
        "Rendering {} quotes from {} into {}",
        quotes.len(),
        config.quote_file.display(),
        config.output_dir.display()
    );

    let report = pipeline.process_all(&quotes).await?;

    if cli.json {
        print_json(&report)?;
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Reads one line from stdin after printing `Quote: `.
async fn prompt_quote() -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Quote: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read quote from stdin")?;
    Ok(line)
}
