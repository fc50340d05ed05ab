//! Quote source — reads the newline-delimited quote list.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;

/// A single normalized quote.
///
/// Normalization trims the text and collapses every whitespace run (including
/// embedded newlines) to a single space, so the wrapper never sees empty
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quote(String);

impl Quote {
    /// Returns `None` when the text is blank after normalization.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Quote(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses quote-file contents: blank lines are dropped and the remaining
/// quotes are returned in reverse file order, so the first line of the file
/// is processed last and receives the highest output index.
pub fn parse_quotes(contents: &str) -> Vec<Quote> {
    let mut quotes: Vec<Quote> = contents.lines().filter_map(Quote::new).collect();
    quotes.reverse();
    quotes
}

/// Reads and parses the quote file.
pub async fn read_quotes(path: &Path) -> Result<Vec<Quote>, AppError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    let quotes = parse_quotes(&contents);
    debug!("Loaded {} quotes from {}", quotes.len(), path.display());
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_internal_spaces() {
        assert_eq!(normalize("  to be   or  not\tto be  "), "to be or not to be");
    }

    #[test]
    fn test_blank_quote_is_rejected() {
        assert!(Quote::new("   ").is_none());
        assert!(Quote::new("").is_none());
    }

    #[test]
    fn test_parse_quotes_reverses_and_skips_blank_lines() {
        let quotes = parse_quotes("first\n\n  second  \n\nthird\n");
        let texts: Vec<&str> = quotes.iter().map(Quote::as_str).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_parse_quotes_handles_crlf() {
        let quotes = parse_quotes("one\r\ntwo\r\n");
        let texts: Vec<&str> = quotes.iter().map(Quote::as_str).collect();
        assert_eq!(texts, vec!["two", "one"]);
    }

    #[tokio::test]
    async fn test_read_quotes_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_quotes(&dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, AppError::Io { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn test_read_quotes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.txt");
        std::fs::write(&path, "alpha\nbeta\n").unwrap();
        let quotes = read_quotes(&path).await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].as_str(), "beta");
    }
}
