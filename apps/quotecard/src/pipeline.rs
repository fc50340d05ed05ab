//! Batch driver — content filter → wrap → render, one quote at a time.
//!
//! # Output naming
//! Batch outputs are named by the quote's index in processing order
//! (`<out_dir>/<index>.png`). Indices are gap-preserving: a flagged quote's
//! index is left unused instead of shifting later quotes down.
//!
//! # spawn_blocking pattern
//! Wrapping, rasterizing and PNG encoding are CPU-bound. Each quote runs in
//! `spawn_blocking` and is awaited before the next starts, so output order is
//! strict and nothing is rendered concurrently.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::filter::BannedWords;
use crate::layout::{wrap, CharCell, Typeface, WrappedLayout};
use crate::quotes::Quote;
use crate::render::{ensure_output_dir, output_path, render, Resolution};

/// Default output name for single-quote mode.
pub const DEFAULT_SINGLE_NAME: &str = "quote";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub max_chars: usize,
    pub resolution: Resolution,
    pub output_dir: PathBuf,
}

/// Result of pushing one quote through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Rendered { path: PathBuf, lines: usize },
    /// The quote matched a banned word and was not rendered.
    Flagged { word: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedQuote {
    pub index: usize,
    pub quote: String,
    pub word: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub rendered: usize,
    pub skipped: Vec<SkippedQuote>,
    pub outputs: Vec<PathBuf>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub struct Pipeline {
    typeface: Arc<dyn Typeface>,
    /// `None` disables content filtering.
    banned: Option<Arc<BannedWords>>,
    settings: RenderSettings,
}

impl Pipeline {
    pub fn new(
        typeface: Arc<dyn Typeface>,
        banned: Option<BannedWords>,
        settings: RenderSettings,
    ) -> Self {
        Self {
            typeface,
            banned: banned.map(Arc::new),
            settings,
        }
    }

    /// The banned word `text` matches, if filtering is enabled.
    pub fn check(&self, text: &str) -> Option<String> {
        self.banned
            .as_ref()
            .and_then(|list| list.is_flagged(text))
            .map(str::to_string)
    }

    /// Renders every quote, skipping flagged ones. Aborts on the first write failure.
    pub async fn process_all(&self, quotes: &[Quote]) -> Result<BatchReport, AppError> {
        ensure_output_dir(&self.settings.output_dir).await?;

        let total = quotes.len();
        let texts: Vec<String> = quotes.iter().map(|q| q.as_str().to_string()).collect();
        let cell = self.measure_cell(texts).await?;

        let mut report = BatchReport {
            total,
            ..BatchReport::default()
        };

        for (index, quote) in quotes.iter().enumerate() {
            if let Some(word) = self.check(quote.as_str()) {
                warn!(index, word = %word, "Skipping flagged quote");
                info!("[{}/{}] skipped quote {}", index + 1, total, index);
                report.skipped.push(SkippedQuote {
                    index,
                    quote: quote.to_string(),
                    word,
                });
                continue;
            }

            let path = output_path(&self.settings.output_dir, &index.to_string());
            let layout = self
                .render_blocking(quote.as_str().to_string(), cell, path.clone())
                .await?;

            report.rendered += 1;
            report.outputs.push(path);
            info!(
                "[{}/{}] rendered quote {} ({} lines)",
                index + 1,
                total,
                index,
                layout.line_count()
            );
        }

        info!(
            rendered = report.rendered,
            skipped = report.skipped.len(),
            "Image generation complete"
        );
        Ok(report)
    }

    /// Renders one quote to `<out_dir>/<name>.png`.
    pub async fn process_single(&self, text: &str, name: &str) -> Result<Outcome, AppError> {
        let quote = Quote::new(text)
            .ok_or_else(|| AppError::Validation("quote text is empty".to_string()))?;

        if let Some(word) = self.check(quote.as_str()) {
            warn!(word = %word, "Quote flagged; nothing rendered");
            return Ok(Outcome::Flagged { word });
        }

        ensure_output_dir(&self.settings.output_dir).await?;

        let cell = self.measure_cell(vec![quote.as_str().to_string()]).await?;
        let path = output_path(&self.settings.output_dir, name);
        let layout = self
            .render_blocking(quote.as_str().to_string(), cell, path.clone())
            .await?;

        info!("Rendered {}", path.display());
        Ok(Outcome::Rendered {
            path,
            lines: layout.line_count(),
        })
    }

    async fn measure_cell(&self, texts: Vec<String>) -> Result<CharCell, AppError> {
        let typeface = Arc::clone(&self.typeface);
        tokio::task::spawn_blocking(move || {
            CharCell::measure(typeface.as_ref(), texts.iter().map(String::as_str))
        })
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed measuring glyphs: {e}"))
        })
    }

    async fn render_blocking(
        &self,
        text: String,
        cell: CharCell,
        path: PathBuf,
    ) -> Result<WrappedLayout, AppError> {
        let typeface = Arc::clone(&self.typeface);
        let max_chars = self.settings.max_chars;
        let resolution = self.settings.resolution;

        tokio::task::spawn_blocking(move || -> Result<WrappedLayout, AppError> {
            let layout = wrap(&text, max_chars, typeface.as_ref(), cell);
            render(&layout, resolution, typeface.as_ref(), &path)?;
            Ok(layout)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed rendering: {e}")))?
    }
}
