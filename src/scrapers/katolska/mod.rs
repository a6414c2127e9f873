//! Swedish Mass readings from katolskakyrkan.se.
//!
//! # URL Pattern
//!
//! Day pages live under the weekly ordo:
//! `{base}/vecka-{iso_week}/{weekday}-den-{day}-{month}`, with ASCII
//! weekday and month slugs (`fredag-den-13-februari`). The site sometimes
//! publishes a misspelled slug (`feburari`), so when the computed URL is a
//! 404 or does not look like a readings page, the week page
//! `{base}/vecka-{iso_week}` is searched for the real link.

pub mod classify;
pub mod extract;

use crate::error::ScrapeError;
use crate::http::HttpClient;
use crate::models::ReadingSet;
use crate::utils::{swedish_month, swedish_weekday, truncate_for_log};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use classify::classify;
pub use extract::extract_readings;

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// The week page listing every day of `date`'s ISO week.
///
/// # Examples
///
/// ```ignore
/// // 13 February 2026 falls in ISO week 7.
/// assert_eq!(week_url("https://x.se/ordo/", date), "https://x.se/ordo/vecka-7");
/// ```
pub fn week_url(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/vecka-{}",
        base.trim_end_matches('/'),
        date.iso_week().week()
    )
}

/// The day page URL the site should use for `date`.
pub fn day_url(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/{}-den-{}-{}",
        week_url(base, date),
        swedish_weekday(date),
        date.day(),
        swedish_month(date)
    )
}

/// Find the link to `date`'s page on a week page.
///
/// Only the `{weekday}-den-{day}-` prefix of the last path segment is
/// matched, so a misspelled month still resolves. Relative links are
/// resolved against `week_url`.
pub fn find_day_link(week_html: &str, week_url: &str, date: NaiveDate) -> Option<String> {
    let base = Url::parse(week_url).ok()?;
    let prefix = format!("{}-den-{}-", swedish_weekday(date), date.day());
    let document = Html::parse_document(week_html);

    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .find(|link| {
            link.path_segments()
                .and_then(|mut segments| segments.next_back())
                .is_some_and(|last| last.to_lowercase().starts_with(&prefix))
        })
        .map(|link| link.to_string())
}

/// Fetch one URL and extract its readings.
#[instrument(level = "info", skip_all, fields(%url))]
async fn fetch_and_extract(
    client: &HttpClient,
    url: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ReadingSet, ScrapeError> {
    let html = client
        .get_text(url)
        .await
        .map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })?;
    let extracted = extract_readings(&html).map_err(|source| {
        debug!(preview = %truncate_for_log(&html, 300), "Unrecognized readings page");
        ScrapeError::Extract {
            url: url.to_string(),
            source,
        }
    })?;
    info!(
        title = %extracted.title,
        layout = ?extracted.format.layout,
        lectionary = ?extracted.format.lectionary,
        lenten = extracted.format.lenten,
        second_reading = extracted.second_reading.is_some(),
        "Extracted readings"
    );
    Ok(ReadingSet::from_extracted(date, url, extracted, now))
}

/// Look up the real day URL on the week page, if it differs from `tried`.
#[instrument(level = "info", skip(client))]
async fn corrected_day_url(
    client: &HttpClient,
    base: &str,
    date: NaiveDate,
    tried: &str,
) -> Option<String> {
    let week = week_url(base, date);
    let html = match client.get_text(&week).await {
        Ok(html) => html,
        Err(e) => {
            debug!(%week, error = %e, "Week page unavailable");
            return None;
        }
    };
    match find_day_link(&html, &week, date) {
        Some(link) if link != tried => Some(link),
        Some(_) => None,
        None => {
            debug!(%week, "Day link not found on week page");
            None
        }
    }
}

/// Fetch and extract the readings for `date`.
///
/// Tries the computed day URL first; on a 404 or an unrecognized page the
/// week page is consulted once for a corrected link.
///
/// # Arguments
///
/// * `client` - Shared HTTP client with the configured timeout
/// * `base` - Root of the weekly readings pages
/// * `date` - The day to fetch
/// * `now` - Stamped on the result as `last_update`
///
/// # Returns
///
/// The [`ReadingSet`] for `date`, or a [`ScrapeError`] carrying the URL that
/// was tried last.
#[instrument(level = "info", skip(client, now))]
pub async fn fetch_reading_set(
    client: &HttpClient,
    base: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ReadingSet, ScrapeError> {
    let url = day_url(base, date);
    match fetch_and_extract(client, &url, date, now).await {
        Ok(set) => Ok(set),
        Err(e) if e.is_slug_mismatch() => {
            warn!(%url, error = %e, "Day page unusable; checking week index");
            match corrected_day_url(client, base, date, &url).await {
                Some(corrected) => {
                    info!(%corrected, "Retrying with link from week index");
                    fetch_and_extract(client, &corrected, date, now).await
                }
                None => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}
