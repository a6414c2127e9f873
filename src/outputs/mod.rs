//! Output of rendered sensor states.
//!
//! # Submodules
//!
//! - [`json`]: writes one JSON line per poll, the stand-in for pushing
//!   states to the host
//!
//! # Output Structure
//!
//! ```text
//! {"date":"2026-02-13","updated":"2026-02-13T05:00:00+00:00","sensors":[{"unique_id":"catholic_se_liturgy",...}]}
//! ```

pub mod json;
