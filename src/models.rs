//! Data models for the three daily pipelines.
//!
//! - [`LiturgicalDay`]: one day of the calendar API, with its [`Celebration`]s
//! - [`ReadingSet`]: the Swedish Mass readings scraped for one day
//! - [`MartyrologyEntry`]: the Roman Martyrology text for one day
//! - [`SaintEntry`]: saint of the day, composed from the two above
//!
//! All of them are immutable once built and replaced wholesale by the next
//! successful fetch.

use crate::utils::translate;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One celebration as returned by the calendar API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Celebration {
    pub title: String,
    /// Liturgical colour in English (`green`, `violet`, ...).
    pub colour: String,
    /// Rank in English (`ferial`, `memorial`, `solemnity`, ...).
    pub rank: String,
    pub rank_num: Option<f64>,
}

impl Celebration {
    /// Ferial days are ordinary weekdays, not saints' days.
    pub fn is_ferial(&self) -> bool {
        self.rank.is_empty() || self.rank.to_lowercase().contains("feria")
    }

    pub fn rank_sv(&self) -> String {
        translate(&self.rank)
    }

    pub fn colour_sv(&self) -> String {
        if self.colour.is_empty() {
            return "grön".to_string();
        }
        translate(&self.colour)
    }
}

/// A liturgical day as returned by the calendar API.
///
/// The API lists celebrations by rank, so the first one is the one that
/// governs the day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LiturgicalDay {
    pub date: NaiveDate,
    #[serde(default = "default_season")]
    pub season: String,
    #[serde(default)]
    pub season_week: Option<u32>,
    #[serde(default)]
    pub weekday: Option<String>,
    #[serde(default)]
    pub celebrations: Vec<Celebration>,
}

fn default_season() -> String {
    "ordinary".to_string()
}

impl LiturgicalDay {
    pub fn primary_celebration(&self) -> Option<&Celebration> {
        self.celebrations.first()
    }

    /// Liturgical colour of the day in Swedish, falling back to the season's
    /// colour when the API lists no celebration.
    pub fn colour_sv(&self) -> String {
        if let Some(primary) = self.primary_celebration() {
            return primary.colour_sv();
        }
        match self.season.as_str() {
            "lent" | "advent" => "lila",
            "easter" | "christmas" => "vit",
            _ => "grön",
        }
        .to_string()
    }

    pub fn season_sv(&self) -> String {
        translate(&self.season)
    }

    pub fn is_lent(&self) -> bool {
        self.season == "lent"
    }

    /// Non-ferial celebrations, highest rank first.
    pub fn saints(&self) -> impl Iterator<Item = &Celebration> {
        self.celebrations.iter().filter(|c| !c.is_ferial())
    }
}

/// Which headings a readings page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// `Läsning` headings, no second reading.
    Weekday,
    /// `Första läsningen` headings, usually with a second reading.
    SundayOrSolemnity,
}

/// Which lectionary editions a readings page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lectionary {
    #[serde(rename = "1994")]
    V1994,
    #[serde(rename = "2022")]
    V2022,
    #[serde(rename = "both")]
    Both,
}

/// Result of classifying a readings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageFormat {
    pub layout: Layout,
    /// Lent replaces the Halleluja with a `Lovsång` / `Vers före evangeliet`.
    pub lenten: bool,
    pub lectionary: Lectionary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub reference: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Psalm {
    pub reference: String,
    pub text: String,
    /// The refrain (`R. ...`), empty when the page does not mark one.
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExtractionStatus {
    Ok,
    /// Required sections were found but some optional one was not.
    Partial { missing: Vec<String> },
    Failed { reason: String },
}

/// Sections extracted from one readings page, before it is tied to a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReadings {
    pub title: String,
    pub format: PageFormat,
    pub first_reading: Reading,
    pub psalm: Option<Psalm>,
    pub second_reading: Option<Reading>,
    pub gospel: Reading,
}

/// The Mass readings for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSet {
    pub date: NaiveDate,
    pub url: String,
    pub title: String,
    pub format: Option<PageFormat>,
    pub first_reading: Reading,
    pub psalm: Option<Psalm>,
    pub second_reading: Option<Reading>,
    pub gospel: Reading,
    pub status: ExtractionStatus,
    pub last_update: DateTime<Utc>,
}

impl ReadingSet {
    pub fn from_extracted(
        date: NaiveDate,
        url: impl Into<String>,
        extracted: ExtractedReadings,
        last_update: DateTime<Utc>,
    ) -> Self {
        let status = if extracted.psalm.is_some() {
            ExtractionStatus::Ok
        } else {
            ExtractionStatus::Partial {
                missing: vec![crate::error::Section::Psalm.to_string()],
            }
        };
        Self {
            date,
            url: url.into(),
            title: extracted.title,
            format: Some(extracted.format),
            first_reading: extracted.first_reading,
            psalm: extracted.psalm,
            second_reading: extracted.second_reading,
            gospel: extracted.gospel,
            status,
            last_update,
        }
    }

    /// Placeholder shown when a day failed and nothing older is cached.
    pub fn failed(
        date: NaiveDate,
        url: impl Into<String>,
        reason: impl Into<String>,
        last_update: DateTime<Utc>,
    ) -> Self {
        Self {
            date,
            url: url.into(),
            title: String::new(),
            format: None,
            first_reading: Reading::default(),
            psalm: None,
            second_reading: None,
            gospel: Reading::default(),
            status: ExtractionStatus::Failed {
                reason: reason.into(),
            },
            last_update,
        }
    }
}

/// The martyrology text for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MartyrologyEntry {
    pub date: NaiveDate,
    pub url: String,
    pub text: String,
}

/// Saint of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaintEntry {
    pub date: NaiveDate,
    pub name: String,
    pub rank: String,
    pub colour: String,
    pub description: String,
    pub other_saints: Vec<String>,
}

impl SaintEntry {
    /// Compose the saint of the day; `None` on a ferial day.
    pub fn compose(day: &LiturgicalDay, description: &str) -> Option<Self> {
        let mut saints = day.saints();
        let primary = saints.next()?;
        Some(Self {
            date: day.date,
            name: primary.title.clone(),
            rank: primary.rank_sv(),
            colour: primary.colour_sv(),
            description: description.to_string(),
            other_saints: saints.map(|c| c.title.clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(json: &str) -> LiturgicalDay {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserializes_calendar_api_day() {
        let d = day(r#"{
            "date": "2026-02-13",
            "season": "ordinary",
            "season_week": 5,
            "weekday": "friday",
            "celebrations": [
                {"title": "Saints Cyril, monk, and Methodius, bishop", "colour": "white", "rank": "memorial", "rank_num": 3.1},
                {"title": "Friday, 5th week in Ordinary Time", "colour": "green", "rank": "ferial", "rank_num": 3.13}
            ]
        }"#);
        assert_eq!(d.season_sv(), "under året");
        assert_eq!(d.colour_sv(), "vit");
        assert_eq!(d.saints().count(), 1);
        assert_eq!(d.primary_celebration().unwrap().rank_sv(), "minnesdag");
    }

    #[test]
    fn colour_falls_back_to_season() {
        let d = day(r#"{"date": "2026-03-04", "season": "lent"}"#);
        assert_eq!(d.colour_sv(), "lila");
        assert!(d.is_lent());
        let d = day(r#"{"date": "2026-04-08", "season": "easter", "celebrations": []}"#);
        assert_eq!(d.colour_sv(), "vit");
        let d = day(r#"{"date": "2026-07-08"}"#);
        assert_eq!(d.season, "ordinary");
        assert_eq!(d.colour_sv(), "grön");
    }

    #[test]
    fn saint_entry_skips_ferial_days() {
        let d = day(r#"{"date": "2026-07-07", "celebrations": [
            {"title": "Tuesday, 14th week in Ordinary Time", "colour": "green", "rank": "ferial"}
        ]}"#);
        assert!(SaintEntry::compose(&d, "text").is_none());
    }

    #[test]
    fn saint_entry_lists_other_saints() {
        let d = day(r#"{"date": "2026-11-17", "celebrations": [
            {"title": "Saint Elizabeth of Hungary, religious", "colour": "white", "rank": "memorial"},
            {"title": "Saint Hilda", "colour": "white", "rank": "optional memorial"},
            {"title": "Tuesday, 33rd week", "colour": "green", "rank": "ferial"}
        ]}"#);
        let saint = SaintEntry::compose(&d, "At Marburg...").unwrap();
        assert_eq!(saint.name, "Saint Elizabeth of Hungary, religious");
        assert_eq!(saint.rank, "minnesdag");
        assert_eq!(saint.other_saints, vec!["Saint Hilda".to_string()]);
        assert_eq!(saint.description, "At Marburg...");
    }

    #[test]
    fn failed_placeholder_has_empty_sections() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 13).unwrap();
        let set = ReadingSet::failed(date, "https://example.test", "HTTP 404", Utc::now());
        assert!(matches!(set.status, ExtractionStatus::Failed { .. }));
        assert!(set.first_reading.text.is_empty());
        assert!(set.second_reading.is_none());
    }
}
