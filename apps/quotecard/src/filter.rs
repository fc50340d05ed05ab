//! Content filter — whole-word, case-insensitive banned-word matching.
//!
//! The list is loaded once at startup and shared immutably with every check.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::errors::AppError;

/// An ordered, de-duplicated list of lowercase banned words.
#[derive(Debug, Clone)]
pub struct BannedWords {
    entries: Vec<(String, Regex)>,
}

impl BannedWords {
    pub fn new<I, S>(words: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<(String, Regex)> = Vec::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || entries.iter().any(|(w, _)| *w == word) {
                continue;
            }
            let pattern = format!(r"(?i)\b{}\b", regex::escape(&word));
            let re = Regex::new(&pattern).map_err(|e| {
                AppError::Config(format!("banned word '{word}' is not matchable: {e}"))
            })?;
            entries.push((word, re));
        }
        Ok(Self { entries })
    }

    /// Parses newline-delimited banned-word file contents.
    pub fn parse(contents: &str) -> Result<Self, AppError> {
        Self::new(contents.lines())
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::io(path, e))?;
        let list = Self::parse(&contents)?;
        debug!("Loaded {} banned words from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first banned word, in list order, that appears in `text`
    /// as a whole word.
    pub fn is_flagged(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(word, _)| word.as_str())
    }
}
