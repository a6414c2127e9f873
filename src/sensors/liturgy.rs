//! Sensors fed by the calendar API and the martyrology.

use super::{Sensor, SensorContext, SensorState};
use crate::models::SaintEntry;
use crate::utils::{PREVIEW_MAX_LEN, truncate_text, upcase};
use chrono::{Datelike, Weekday};
use serde_json::Value;

const UNKNOWN: &str = "Okänd";

/// Current liturgical season, e.g. `Fastan`.
#[derive(Debug, Clone, Copy)]
pub struct LiturgicalDaySensor;

impl Sensor for LiturgicalDaySensor {
    fn unique_id(&self) -> &'static str {
        "catholic_se_liturgy"
    }

    fn render(&self, ctx: &SensorContext<'_>) -> SensorState {
        let day = ctx.calendar.value();
        let season = day.map_or_else(|| UNKNOWN.to_string(), |d| upcase(&d.season_sv()));
        let primary = day.and_then(|d| d.primary_celebration());

        SensorState::new(self.unique_id(), "Liturgisk Kalender", "mdi:church", &season)
            .attr(
                "liturgical_color",
                day.map_or_else(|| "grön".to_string(), |d| d.colour_sv()),
            )
            .attr("season", season.as_str())
            .attr("season_week", day.and_then(|d| d.season_week))
            .attr("primary_celebration", primary.map(|c| c.title.as_str()))
            .attr("rank", primary.map(|c| c.rank_sv()))
            .attr("stale", ctx.calendar.is_stale(ctx.today))
            .attr("error", ctx.calendar.error.as_deref())
    }
}

/// Saint of the day, described by the martyrology.
#[derive(Debug, Clone, Copy)]
pub struct SaintOfTheDaySensor;

impl SaintOfTheDaySensor {
    const ID: &'static str = "catholic_se_saint";
    const NAME: &'static str = "Dagens Helgon";
    const ICON: &'static str = "mdi:account-star";
}

impl Sensor for SaintOfTheDaySensor {
    fn unique_id(&self) -> &'static str {
        Self::ID
    }

    fn render(&self, ctx: &SensorContext<'_>) -> SensorState {
        let description = ctx.martyrology.value().map_or("", |m| m.text.as_str());

        let state = match ctx.calendar.value() {
            None => SensorState::new(Self::ID, Self::NAME, Self::ICON, UNKNOWN),
            Some(day) => match SaintEntry::compose(day, description) {
                None => SensorState::new(Self::ID, Self::NAME, Self::ICON, "Inget helgon för denna dagen")
                    .attr("type", "Vardag (Feria)")
                    .attr("color", day.colour_sv())
                    .attr("description", "")
                    .attr("other_saints", Value::Array(Vec::new()))
                    .attr("martyrology_text", description),
                Some(saint) => {
                    let total = saint.other_saints.len() + 1;
                    SensorState::new(Self::ID, Self::NAME, Self::ICON, &saint.name)
                        .attr("type", saint.rank.as_str())
                        .attr("color", saint.colour.as_str())
                        .attr(
                            "description_preview",
                            truncate_text(&saint.description, PREVIEW_MAX_LEN),
                        )
                        .attr("description", saint.description)
                        .attr("other_saints", saint.other_saints)
                        .attr("total_saints", total)
                }
            },
        };

        // Both sources may lag behind today independently.
        state
            .attr("stale", ctx.calendar.is_stale(ctx.today))
            .attr("error", ctx.calendar.error.as_deref())
            .attr("martyrology_stale", ctx.martyrology.is_stale(ctx.today))
            .attr("martyrology_error", ctx.martyrology.error.as_deref())
    }
}

/// Rosary mysteries of the weekly cycle.
#[derive(Debug, Clone, Copy)]
pub struct RosaryMysteriesSensor;

fn mysteries(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon | Weekday::Sat => "glädjerika",
        Weekday::Tue | Weekday::Fri => "smärtorika",
        Weekday::Wed | Weekday::Sun => "glorfyllda",
        Weekday::Thu => "ljusets",
    }
}

impl Sensor for RosaryMysteriesSensor {
    fn unique_id(&self) -> &'static str {
        "catholic_se_rosary"
    }

    fn render(&self, ctx: &SensorContext<'_>) -> SensorState {
        let state = upcase(mysteries(ctx.today.weekday()));
        SensorState::new(self.unique_id(), "Dagens Rosenkransmysterier", "mdi:rosary", &state)
            .attr("rotation", "Standard Weekly")
    }
}

/// Fasting and abstinence obligation for the day.
#[derive(Debug, Clone, Copy)]
pub struct AbstinenceSensor;

impl Sensor for AbstinenceSensor {
    fn unique_id(&self) -> &'static str {
        "catholic_se_abstinence"
    }

    /// The season carries over from a stale calendar day; the celebration
    /// title only counts for the day it was fetched for.
    fn render(&self, ctx: &SensorContext<'_>) -> SensorState {
        let day = ctx.calendar.value();
        let stale = ctx.calendar.is_stale(ctx.today);
        let title = day
            .filter(|_| !stale)
            .and_then(|d| d.primary_celebration())
            .map(|c| c.title.to_lowercase())
            .unwrap_or_default();

        let is_lent = day.is_some_and(|d| d.is_lent());
        let is_friday = ctx.today.weekday() == Weekday::Fri;
        let is_ash_wednesday = title.contains("ash wednesday");
        let is_good_friday = title.contains("good friday")
            || (is_friday && title.contains("passion of the lord"));

        let (state, description) = if is_ash_wednesday || is_good_friday {
            (
                "Fasta & Abstinens",
                "Idag gäller både fasta (begränsat matintag) och abstinens (inget kött).",
            )
        } else if is_lent && is_friday {
            ("Abstinens", "Idag avstår vi från kött (Långfredagsbot).")
        } else if is_friday {
            (
                "Fredagsbot",
                "Fredag är en botdag. Avstå från kött eller gör en annan god gärning.",
            )
        } else {
            ("Ingen", "Ingen särskild botgöring idag.")
        };

        SensorState::new(self.unique_id(), "Fasta & Abstinens", "mdi:food-off", state)
            .attr("beskrivning", description)
            .attr("is_friday", is_friday)
            .attr("is_lent", is_lent)
            .attr("stale", stale)
            .attr("error", ctx.calendar.error.as_deref())
    }
}
