//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

use crate::types::SlideId;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// Presentation timing rejected (non-positive slide duration and similar)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The slide source produced no slides, so the presentation cannot start
    #[error("No slides available to present")]
    EmptySlideList,

    /// One slide could not be fetched or decoded; the presentation continues
    #[error("Failed to load slide {slide}: {message}")]
    SlideLoadFailure {
        /// The slide that failed.
        slide: SlideId,
        /// Description of the failure.
        message: String,
    },

    /// The slide listing could not be obtained
    #[error("Slide source unavailable: {message}")]
    SourceUnavailable {
        /// Human-readable error description.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Parsing error (listing JSON, image data)
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a source error without HTTP context
    pub fn source(message: impl Into<String>, hint: Option<&'static str>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
            status: None,
            hint,
        }
    }

    /// Create a source error from an HTTP status, picking a hint for it
    pub fn source_status(message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            404 => Some("Check SLIDE_SOURCE and SLIDE_KIND; the listing directory may be missing"),
            401 | 403 => Some("The listing server refused access"),
            500..=599 => Some("The listing server failed to read its directory - try again later"),
            _ => None,
        };
        Self::SourceUnavailable {
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a per-slide load failure
    pub fn slide(slide: &SlideId, message: impl Into<String>) -> Self {
        Self::SlideLoadFailure {
            slide: slide.clone(),
            message: message.into(),
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Message suitable for the on-screen error overlay.
    pub fn user_message(&self) -> String {
        match self {
            Self::SourceUnavailable { message, hint: Some(hint), .. } => format!("{message}. {hint}"),
            other => other.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn source_status_provides_hints() {
        let err = Error::source_status("GET /api/images returned 404", 404);
        match err {
            Error::SourceUnavailable { hint: Some(h), status: Some(404), .. } => {
                assert!(h.contains("SLIDE_SOURCE"));
            }
            _ => panic!("Expected SourceUnavailable error with hint"),
        }
    }

    #[test]
    fn user_message_appends_hint() {
        let err = Error::source_status("listing failed", 500);
        assert!(err.user_message().starts_with("listing failed. "));

        let plain = Error::EmptySlideList;
        assert_eq!(plain.user_message(), "No slides available to present");
    }
}
