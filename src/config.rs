//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! Specifically, we try to find a spyglass.toml, and if present we load settings from there.
//! This provides the visibility threshold, section heading level, wrapping width, animation
//! timing, colour palette, file extension and logging preferences.

use facet::Facet;
use std::fs;

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "spyglass.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from spyglass.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 0.3)]
    /// Fraction of a section that must be on screen before it becomes active.
    pub threshold: f64,
    #[facet(default = 2)]
    /// Heading level that starts a navigable section.
    pub section_level: usize,
    #[facet(default = 100)]
    /// Maximum line width for article text wrapping.
    pub wrap_width: usize,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = 16)]
    /// Milliseconds between animation frames.
    pub tick_ms: u64,
    #[facet(default = 0.35)]
    /// Share of the remaining distance covered by each frame of a smooth scroll.
    pub scroll_easing: f64,
    #[facet(default = vec![
        "cyan".to_string(),
        "green".to_string(),
        "yellow".to_string(),
        "magenta".to_string(),
        "blue".to_string(),
    ])]
    /// Colours assigned to sections in page order, cycling when exhausted.
    pub palette: Vec<String>,
    #[facet(default = "warn".to_string())]
    /// Log filter directive used when `SPYGLASS_LOG` is unset.
    pub log_level: String,
    #[facet(default = String::new())]
    /// File to append logs to; logging is off when empty.
    pub log_file: String,
}

impl Config {
    #[must_use]
    /// Load configuration from spyglass.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string(CONFIG_FILE) {
            if let Some(config) = Self::from_toml(&contents) {
                return config;
            }
        }
        Self::defaults()
    }

    #[must_use]
    /// Parse a configuration document, filling omitted fields with defaults.
    pub fn from_toml(contents: &str) -> Option<Self> {
        facet_toml::from_str::<Self>(contents).ok()
    }

    #[must_use]
    /// Every field at its default.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn defaults() -> Self {
        facet_toml::from_str::<Self>("").unwrap()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
