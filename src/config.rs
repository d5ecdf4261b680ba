//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{cache, source, timing};
use crate::error::{Error, Result};
use crate::presenter::Timing;
use crate::source::{DirectorySource, HttpListingSource, SlideSource};

/// Where slides come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Listing server base URL (`GET <url>/api/<kind>`).
    Listing(String),
    /// Local directory of slide files.
    Directory(PathBuf),
}

impl SourceLocation {
    /// Interpret a `SLIDE_SOURCE` value: URLs are listing servers, anything else a directory.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Listing(value.to_string())
        } else {
            Self::Directory(PathBuf::from(shellexpand::tilde(value).to_string()))
        }
    }
}

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Slide list provider
    pub source: SourceLocation,
    /// Listing kind (`pdfs`, `images`)
    pub kind: String,
    /// Seconds each slide is shown
    pub slide_duration: f64,
    /// Navigation latch after a slide change
    pub transition_window: Duration,
    /// Autoplay tick period
    pub tick_interval: Duration,
    /// Start with the time-of-day theme enabled
    pub auto_theme: bool,
    /// Show the clock overlay at start
    pub show_clock: bool,
    /// Extensions accepted in directory mode
    pub extensions: Vec<String>,
    /// Decoded slides kept in memory
    pub cache_capacity: usize,
    /// File receiving log output
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            source: SourceLocation::Directory(PathBuf::from(source::DEFAULT_DIRECTORY)),
            kind: source::DEFAULT_KIND.to_string(),
            slide_duration: timing::DEFAULT_SLIDE_DURATION_SECS,
            transition_window: Duration::from_millis(timing::DEFAULT_TRANSITION_MS),
            tick_interval: Duration::from_millis(timing::DEFAULT_TICK_MS),
            auto_theme: false,
            show_clock: true,
            extensions: source::DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            cache_capacity: cache::DEFAULT_CAPACITY,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("SLIDE_SOURCE").filter(|v| !v.trim().is_empty()) {
            config.source = SourceLocation::parse(&value);
        }

        if let Some(kind) = lookup("SLIDE_KIND").filter(|v| !v.trim().is_empty()) {
            config.kind = kind.trim().trim_matches('/').to_string();
        }

        if let Some(value) = lookup("SLIDE_DURATION") {
            config.slide_duration = value.trim().parse::<f64>().map_err(|_| {
                Error::config(format!("SLIDE_DURATION={value} is not a number"), "Use seconds, e.g. SLIDE_DURATION=10")
            })?;
        }

        if let Some(value) = lookup("TRANSITION_MS") {
            config.transition_window = Duration::from_millis(parse_millis("TRANSITION_MS", &value)?);
        }

        if let Some(value) = lookup("TICK_MS") {
            config.tick_interval = Duration::from_millis(parse_millis("TICK_MS", &value)?);
        }

        if let Some(value) = lookup("AUTO_THEME") {
            config.auto_theme = parse_flag("AUTO_THEME", &value)?;
        }

        if let Some(value) = lookup("SHOW_CLOCK") {
            config.show_clock = parse_flag("SHOW_CLOCK", &value)?;
        }

        if let Some(value) = lookup("SLIDE_EXTENSIONS") {
            let extensions: Vec<String> = value
                .split(',')
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if extensions.is_empty() {
                return Err(Error::config("SLIDE_EXTENSIONS is empty", "List extensions, e.g. SLIDE_EXTENSIONS=jpg,png"));
            }
            config.extensions = extensions;
        }

        if let Some(value) = lookup("CACHE_CAPACITY") {
            config.cache_capacity = value.trim().parse::<usize>().map_err(|_| {
                Error::config(format!("CACHE_CAPACITY={value} is not a count"), "Use a whole number, e.g. CACHE_CAPACITY=16")
            })?;
        }

        config.log_file = lookup("LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(p.trim()).to_string()));

        Ok(config)
    }

    /// Presenter timing; fails for a non-positive slide duration.
    pub fn timing(&self) -> Result<Timing> {
        Ok(Timing::new(self.slide_duration)?
            .with_tick_interval(self.tick_interval)?
            .with_transition_window(self.transition_window))
    }

    /// Build the configured slide source.
    pub fn slide_source(&self) -> Arc<dyn SlideSource> {
        match &self.source {
            SourceLocation::Listing(url) => Arc::new(HttpListingSource::new(url.clone(), self.kind.clone())),
            SourceLocation::Directory(path) => Arc::new(DirectorySource::new(path.clone(), self.extensions.as_slice())),
        }
    }
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        Error::config(format!("{name}={value} is not a number of milliseconds"), "Use a whole number, e.g. 500")
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!("{name}={value} is not a flag"), "Use true or false")),
    }
}
