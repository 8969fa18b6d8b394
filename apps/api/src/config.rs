use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::layout::{FitText, FontFamily};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Font used to measure units when a request names none.
    pub default_font: FontFamily,
    pub default_font_size_px: f32,
    /// Sizing rule for fit-text sessions on viewport resize.
    pub fit_text: FitText,
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            default_font: FontFamily::Inter,
            default_font_size_px: 16.0,
            fit_text: FitText::default(),
            max_sessions: 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let fit_defaults = FitText::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            default_font: parse_or(&lookup, "ARCTEXT_FONT", defaults.default_font)?,
            default_font_size_px: positive(
                "ARCTEXT_FONT_SIZE_PX",
                parse_or(&lookup, "ARCTEXT_FONT_SIZE_PX", defaults.default_font_size_px)?,
            )?,
            fit_text: FitText {
                compressor: parse_or(&lookup, "ARCTEXT_FIT_COMPRESSOR", fit_defaults.compressor)?,
                min_font_px: parse_or(&lookup, "ARCTEXT_MIN_FONT_PX", fit_defaults.min_font_px)?,
                max_font_px: parse_or(&lookup, "ARCTEXT_MAX_FONT_PX", fit_defaults.max_font_px)?,
            },
            max_sessions: parse_or(&lookup, "ARCTEXT_MAX_SESSIONS", defaults.max_sessions)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

fn positive(key: &str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(anyhow!("{key} must be a positive number, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.default_font, FontFamily::Inter);
        assert_eq!(config.default_font_size_px, 16.0);
        assert_eq!(config.max_sessions, 1024);
        assert_eq!(config.fit_text, FitText::default());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("ARCTEXT_FONT", "oswald"),
            ("ARCTEXT_FONT_SIZE_PX", "24"),
            ("ARCTEXT_FIT_COMPRESSOR", "1.5"),
            ("ARCTEXT_MIN_FONT_PX", "12"),
            ("ARCTEXT_MAX_FONT_PX", "72"),
            ("ARCTEXT_MAX_SESSIONS", "8"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.default_font, FontFamily::Oswald);
        assert_eq!(config.default_font_size_px, 24.0);
        assert_eq!(config.fit_text.compressor, 1.5);
        assert_eq!(config.fit_text.min_font_px, 12.0);
        assert_eq!(config.fit_text.max_font_px, 72.0);
        assert_eq!(config.max_sessions, 8);
    }

    #[test]
    fn test_bad_values_fail_with_key_in_message() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = Config::from_lookup(lookup(&[("ARCTEXT_FONT", "papyrus")])).unwrap_err();
        assert!(err.to_string().contains("ARCTEXT_FONT"));

        let err = Config::from_lookup(lookup(&[("ARCTEXT_FONT_SIZE_PX", "0")])).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }
}
