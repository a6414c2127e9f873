//! Roman Martyrology (1959) from the Boston Catholic Journal.
//!
//! The site publishes one page per month. Each day starts with a heading
//! such as `<h2>February 13th</h2>` and runs until the next `<h2>` or
//! `<hr>`. The day text opens with a formula ("This Day, the Thirteenth Day
//! of February") that is dropped.

use crate::error::{ExtractError, ScrapeError};
use crate::html::clean_html;
use crate::http::HttpClient;
use crate::models::MartyrologyEntry;
use crate::utils::{english_month, ordinal, upcase};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

static SECTION_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h[2r]\b").unwrap());

/// Fill the `{month}` placeholder with the English month name of `date`.
pub fn martyrology_url(template: &str, date: NaiveDate) -> String {
    template.replace("{month}", english_month(date))
}

/// Extract the martyrology text for `date` from its month page.
pub fn parse_martyrology_day(html: &str, date: NaiveDate) -> Result<String, ExtractError> {
    let month = upcase(english_month(date));
    let day = ordinal(date.day());
    let not_found = || ExtractError::DayNotFound {
        heading: format!("{month} {day}"),
    };

    let heading = Regex::new(&format!(
        r"(?is)<h2\b[^>]*>(?:\s|<[^>]+>)*{}\s+{}(?:\s|<[^>]+>)*</h2\s*>",
        regex::escape(&month),
        regex::escape(&day)
    ))
    .map_err(|_| not_found())?;
    let intro = Regex::new(&format!(
        r"(?i)^This\s+Day,?\s+the\s+[\w-]+\s+Day\s+of\s+{}\.?\s*",
        regex::escape(&month)
    ))
    .map_err(|_| not_found())?;

    let start = heading.find(html).ok_or_else(not_found)?.end();
    let end = SECTION_END_RE
        .find_at(html, start)
        .map_or(html.len(), |m| m.start());

    let text = clean_html(&html[start..end]);
    let text = intro.replace(&text, "").trim().to_string();
    if text.is_empty() {
        return Err(not_found());
    }
    Ok(text)
}

/// Fetch the month page and extract `date`'s entry.
///
/// # Returns
///
/// The [`MartyrologyEntry`], or a [`ScrapeError`] when the page is
/// unreachable or has no heading for the day.
#[instrument(level = "info", skip(client))]
pub async fn fetch_martyrology(
    client: &HttpClient,
    template: &str,
    date: NaiveDate,
) -> Result<MartyrologyEntry, ScrapeError> {
    let url = martyrology_url(template, date);
    let html = client
        .get_text(&url)
        .await
        .map_err(|source| ScrapeError::Fetch {
            url: url.clone(),
            source,
        })?;
    let text = parse_martyrology_day(&html, date).map_err(|source| ScrapeError::Extract {
        url: url.clone(),
        source,
    })?;
    info!(%url, chars = text.chars().count(), "Parsed martyrology");
    Ok(MartyrologyEntry { date, url, text })
}
