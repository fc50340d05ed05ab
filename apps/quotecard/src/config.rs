use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::render::Resolution;

/// Largest accepted canvas side in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Application configuration loaded from environment variables.
/// Every variable is optional; CLI flags are applied on top in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub quote_file: PathBuf,
    pub bad_words_file: PathBuf,
    pub font_file: PathBuf,
    /// Em size in pixels.
    pub font_size: f32,
    /// Maximum characters on one wrapped line.
    pub max_letters: usize,
    pub resolution: Resolution,
    pub output_dir: PathBuf,
    /// Skip quotes that match the banned-word list.
    pub censor: bool,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quote_file: PathBuf::from("quotes.txt"),
            bad_words_file: PathBuf::from("bad_words.txt"),
            font_file: PathBuf::from("Lato-Regular.ttf"),
            font_size: 50.0,
            max_letters: 70,
            resolution: Resolution::default(),
            output_dir: PathBuf::from("images"),
            censor: true,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            quote_file: lookup("QUOTE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.quote_file),
            bad_words_file: lookup("BAD_WORDS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.bad_words_file),
            font_file: lookup("FONT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.font_file),
            font_size: parse_var(&lookup, "FONT_SIZE", defaults.font_size)?,
            max_letters: parse_var(&lookup, "MAX_LETTERS", defaults.max_letters)?,
            resolution: Resolution {
                width: parse_var(&lookup, "RESOLUTION_WIDTH", defaults.resolution.width)?,
                height: parse_var(&lookup, "RESOLUTION_HEIGHT", defaults.resolution.height)?,
            },
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            censor: parse_var(&lookup, "CENSOR", defaults.censor)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    /// Rejects values that would make wrapping or rendering meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.max_letters == 0 {
            bail!("MAX_LETTERS must be at least 1");
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            bail!("FONT_SIZE must be a positive number, got {}", self.font_size);
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            bail!(
                "resolution must be non-zero, got {}x{}",
                self.resolution.width,
                self.resolution.height
            );
        }
        if self.resolution.width > MAX_DIMENSION || self.resolution.height > MAX_DIMENSION {
            bail!(
                "resolution {}x{} exceeds the {MAX_DIMENSION}px limit",
                self.resolution.width,
                self.resolution.height
            );
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.quote_file, PathBuf::from("quotes.txt"));
        assert_eq!(config.max_letters, 70);
        assert_eq!(config.resolution, Resolution { width: 1920, height: 1080 });
        assert!((config.font_size - 50.0).abs() < 1e-6);
        assert!(config.censor);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("MAX_LETTERS", "40"),
            ("RESOLUTION_WIDTH", "800"),
            ("RESOLUTION_HEIGHT", " 600 "),
            ("CENSOR", "false"),
            ("OUTPUT_DIR", "/tmp/cards"),
        ]))
        .unwrap();
        assert_eq!(config.max_letters, 40);
        assert_eq!(config.resolution, Resolution { width: 800, height: 600 });
        assert!(!config.censor);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/cards"));
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("MAX_LETTERS", "seventy")])).unwrap_err();
        assert!(err.to_string().contains("MAX_LETTERS"), "got: {err}");
    }

    #[test]
    fn test_validate_rejects_zero_max_letters() {
        let config = Config {
            max_letters: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_resolution() {
        let config = Config {
            resolution: Resolution { width: 0, height: 1080 },
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_resolution() {
        let config = Config {
            resolution: Resolution {
                width: 100_000,
                height: 100_000,
            },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("limit"), "got: {err}");

        let edge = Config {
            resolution: Resolution {
                width: MAX_DIMENSION,
                height: 1080,
            },
            ..Config::default()
        };
        assert!(edge.validate().is_ok());
    }
}
