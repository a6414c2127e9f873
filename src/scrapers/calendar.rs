//! General Roman Calendar from the calapi.inadiutorium.cz JSON API.
//!
//! One GET per day returns the season and the ranked list of celebrations.
//! A non-2xx status or a body that does not deserialize is a fetch failure
//! for the calendar sensors only.

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::models::LiturgicalDay;
use chrono::{Datelike, NaiveDate};
use tracing::{info, instrument};

/// Fill the `{year}`, `{month}` and `{day}` placeholders of the API template.
pub fn calendar_url(template: &str, date: NaiveDate) -> String {
    template
        .replace("{year}", &date.year().to_string())
        .replace("{month}", &date.month().to_string())
        .replace("{day}", &date.day().to_string())
}

/// Fetch the liturgical day for `date` from the calendar API.
#[instrument(level = "info", skip(client))]
pub async fn fetch_liturgical_day(
    client: &HttpClient,
    template: &str,
    date: NaiveDate,
) -> Result<LiturgicalDay, FetchError> {
    let url = calendar_url(template, date);
    let day: LiturgicalDay = client.get_json(&url).await?;
    info!(
        %url,
        season = %day.season,
        celebrations = day.celebrations.len(),
        primary = ?day.primary_celebration().map(|c| c.title.as_str()),
        "Fetched liturgical day"
    );
    Ok(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CALENDAR_API_URL;

    #[test]
    fn builds_calendar_url_without_padding() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(
            calendar_url(DEFAULT_CALENDAR_API_URL, date),
            "http://calapi.inadiutorium.cz/api/v0/en/calendars/default/2026/3/4"
        );
    }
}
