//! Upstream sources for the three daily pipelines.
//!
//! Each module builds its URL from a configurable template, fetches through
//! the shared [`crate::http::HttpClient`] and returns a model or a typed
//! error.
//!
//! # Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | calapi.inadiutorium.cz | [`calendar`] | JSON API | Season, colour, ranked celebrations |
//! | katolskakyrkan.se | [`katolska`] | HTML markers | Falls back to the week page on a bad slug |
//! | Boston Catholic Journal | [`martyrology`] | HTML section | One page per month |

pub mod calendar;
pub mod katolska;
pub mod martyrology;
