//! # Catholic SE
//!
//! Daily Catholic liturgy sensors for a Swedish home-automation host.
//!
//! ## Sources
//!
//! - The General Roman Calendar JSON API (season, colour, celebrations)
//! - The Swedish Mass readings published by katolskakyrkan.se
//! - The 1959 Roman Martyrology from the Boston Catholic Journal
//!
//! ## Architecture
//!
//! Each poll runs three independent pipelines:
//! 1. **Fetch**: one GET per source via [`http::HttpClient`]
//! 2. **Extract**: JSON deserialization or marker-based HTML extraction
//!    ([`scrapers`])
//! 3. **Cache**: one [`cache::DailyCache`] slot per source, keeping the last
//!    good value when a fetch fails
//!
//! [`coordinator::Integration`] then renders the [`sensors`] from the cached
//! snapshots.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod html;
pub mod http;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod sensors;
pub mod utils;

pub use config::Settings;
pub use coordinator::Integration;
pub use sensors::SensorState;
