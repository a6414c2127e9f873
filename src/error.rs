//! Error types for the fetch, extraction and configuration layers.
//!
//! Each pipeline (calendar, readings, martyrology) surfaces its own error
//! so a failure in one never affects the sensors fed by another. Absence of
//! an optional section (second reading, psalm response) is not represented
//! here: it is ordinary data on [`crate::models::ReadingSet`].

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Network-level failure while talking to one of the upstream sites.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("timeout after {}s", .after.as_secs())]
    Timeout { after: Duration },
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status { status: u16 },
    /// Connection, TLS, or body read failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The body was not the JSON document we expected.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404 })
    }
}

/// A named section of a readings page or martyrology page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    FirstReading,
    Psalm,
    SecondReading,
    Gospel,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::FirstReading => "first_reading",
            Section::Psalm => "psalm",
            Section::SecondReading => "second_reading",
            Section::Gospel => "gospel",
        };
        f.write_str(name)
    }
}

/// The page was fetched but its structure did not match any known layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no recognized page layout")]
    Classification,
    #[error("required section missing: {0}")]
    SectionNotFound(Section),
    #[error("no entry for {heading}")]
    DayNotFound { heading: String },
}

/// Failure of a scraping pipeline, tagged with the URL that was tried last.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{source}")]
    Fetch { url: String, source: FetchError },
    #[error("{source}")]
    Extract { url: String, source: ExtractError },
}

impl ScrapeError {
    pub fn url(&self) -> &str {
        match self {
            ScrapeError::Fetch { url, .. } | ScrapeError::Extract { url, .. } => url,
        }
    }

    /// Whether a week-index lookup could plausibly fix this failure.
    ///
    /// Misspelled slugs show up either as a 404 or as a page without any
    /// reading headings.
    pub fn is_slug_mismatch(&self) -> bool {
        match self {
            ScrapeError::Fetch { source, .. } => source.is_not_found(),
            ScrapeError::Extract { source, .. } => *source == ExtractError::Classification,
        }
    }
}

/// Failure to load the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}
