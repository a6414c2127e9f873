//! Sensors for the Swedish Mass readings.

use super::{Sensor, SensorContext, SensorState};
use crate::models::{ExtractionStatus, Reading, ReadingSet};
use crate::utils::{PREVIEW_MAX_LEN, truncate_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    First,
    Psalm,
    Second,
    Gospel,
}

/// One reading of the day: state is the scripture reference.
#[derive(Debug, Clone, Copy)]
pub struct ReadingSensor {
    kind: ReadingKind,
}

impl ReadingSensor {
    pub fn new(kind: ReadingKind) -> Self {
        Self { kind }
    }

    fn meta(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self.kind {
            ReadingKind::First => (
                "catholic_se_first_reading",
                "Första Läsningen",
                "mdi:book-open-variant",
                "Första läsningen",
            ),
            ReadingKind::Psalm => (
                "catholic_se_psalm",
                "Responsoriepsalm",
                "mdi:music-note",
                "Responsoriepsalm",
            ),
            ReadingKind::Second => (
                "catholic_se_second_reading",
                "Andra Läsningen",
                "mdi:book-open-variant",
                "Ingen andra läsning idag",
            ),
            ReadingKind::Gospel => (
                "catholic_se_gospel",
                "Evangelium",
                "mdi:book-cross",
                "Evangelium",
            ),
        }
    }
}

fn source_url<'a>(ctx: &SensorContext<'a>) -> Option<&'a str> {
    ctx.readings_url
        .or_else(|| ctx.readings.value().map(|set| set.url.as_str()))
}

impl Sensor for ReadingSensor {
    fn unique_id(&self) -> &'static str {
        self.meta().0
    }

    fn render(&self, ctx: &SensorContext<'_>) -> SensorState {
        let (id, name, icon, fallback) = self.meta();
        let set = ctx.readings.value();

        let (reading, response) = match self.kind {
            ReadingKind::First => (set.map(|s| s.first_reading.clone()), None),
            ReadingKind::Gospel => (set.map(|s| s.gospel.clone()), None),
            ReadingKind::Second => (set.and_then(|s| s.second_reading.clone()), None),
            ReadingKind::Psalm => {
                let psalm = set.and_then(|s| s.psalm.as_ref());
                (
                    psalm.map(|p| Reading {
                        reference: p.reference.clone(),
                        text: p.text.clone(),
                    }),
                    Some(psalm.map_or("", |p| p.response.as_str())),
                )
            }
        };
        let reading = reading.unwrap_or_default();

        let available = !reading.text.is_empty();
        let state = if !available || reading.reference.is_empty() {
            fallback
        } else {
            reading.reference.as_str()
        };

        let mut out = SensorState::new(id, name, icon, state)
            .attr("reference", reading.reference.as_str())
            .attr("text", reading.text.as_str())
            .attr("text_preview", truncate_text(&reading.text, PREVIEW_MAX_LEN))
            .attr("source_url", source_url(ctx))
            .attr("stale", ctx.readings.is_stale(ctx.today))
            .attr("error", ctx.readings.error.as_deref());
        if let Some(response) = response {
            out = out.attr("response", response);
        }
        if self.kind == ReadingKind::Second {
            out = out.attr("available", available);
        }
        out
    }
}

/// Status of the readings fetch: `OK`, `Delvis`, `Fel` or `Väntar`.
#[derive(Debug, Clone, Copy)]
pub struct ReadingsStatusSensor;

impl ReadingsStatusSensor {
    const ID: &'static str = "catholic_se_readings_status";
    const NAME: &'static str = "Läsningar Status";
}

impl Sensor for ReadingsStatusSensor {
    fn unique_id(&self) -> &'static str {
        Self::ID
    }

    fn render(&self, ctx: &SensorContext<'_>) -> SensorState {
        let url = source_url(ctx);
        let placeholder;
        let set = match (ctx.readings.value(), ctx.readings.error.as_deref()) {
            (Some(set), _) => Some(set),
            (None, Some(reason)) => {
                placeholder = ReadingSet::failed(ctx.today, url.unwrap_or_default(), reason, ctx.now);
                Some(&placeholder)
            }
            (None, None) => None,
        };

        let (state, icon) = match (set, &ctx.readings.error) {
            (_, Some(_)) => ("Fel", "mdi:alert-circle"),
            (Some(s), None) if matches!(s.status, ExtractionStatus::Partial { .. }) => {
                ("Delvis", "mdi:alert-outline")
            }
            (Some(_), None) => ("OK", "mdi:check-circle"),
            (None, None) => ("Väntar", "mdi:clock-outline"),
        };

        // A retained set still says `ok`; the failed fetch overrides it.
        let (status, missing) = match set.map(|s| &s.status) {
            _ if ctx.readings.error.is_some() && ctx.readings.value().is_some() => {
                ("stale", Vec::new())
            }
            Some(ExtractionStatus::Ok) => ("ok", Vec::new()),
            Some(ExtractionStatus::Partial { missing }) => ("partial", missing.clone()),
            Some(ExtractionStatus::Failed { .. }) => ("failed", Vec::new()),
            None => ("pending", Vec::new()),
        };

        SensorState::new(Self::ID, Self::NAME, icon, state)
            .attr("last_update", set.map(|s| s.last_update.to_rfc3339()))
            .attr("url", url)
            .attr("error", ctx.readings.error.as_deref())
            .attr("title", set.map_or("", |s| s.title.as_str()))
            .attr("status", status)
            .attr("missing", missing)
            .attr("data_date", ctx.readings.date().map(|d| d.to_string()))
            .attr("stale", ctx.readings.is_stale(ctx.today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Layout, Lectionary, PageFormat, Psalm};
    use crate::sensors::testing::{date, snapshot};
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::Value;

    fn reading_set(day: NaiveDate, second: Option<Reading>) -> ReadingSet {
        ReadingSet {
            date: day,
            url: "https://example.test/vecka-7/tisdag-den-10-februari".into(),
            title: "Tisdag den 10 februari 2026".into(),
            format: Some(PageFormat {
                layout: Layout::Weekday,
                lenten: false,
                lectionary: Lectionary::Both,
            }),
            first_reading: Reading {
                reference: "1 Kung 8:22-23, 27-30".into(),
                text: "Salomo trädde fram. ".repeat(60),
            },
            psalm: Some(Psalm {
                reference: "Ps 84:3-5, 10-11".into(),
                text: "R. Hur ljuvlig är din boning.".into(),
                response: "Hur ljuvlig är din boning.".into(),
            }),
            second_reading: second,
            gospel: Reading {
                reference: "Mark 7:1-13".into(),
                text: "Fariseerna samlades hos Jesus.".into(),
            },
            status: ExtractionStatus::Ok,
            last_update: Utc.with_ymd_and_hms(2026, 2, 10, 5, 0, 0).unwrap(),
        }
    }

    fn render(
        sensor: &dyn Sensor,
        today: NaiveDate,
        readings: &crate::cache::Snapshot<ReadingSet>,
    ) -> SensorState {
        let calendar = snapshot(None, None);
        let martyrology = snapshot(None, None);
        let ctx = SensorContext {
            today,
            now: Utc.with_ymd_and_hms(2026, 2, 11, 6, 0, 0).unwrap(),
            calendar: &calendar,
            readings,
            readings_url: None,
            martyrology: &martyrology,
        };
        sensor.render(&ctx)
    }

    #[test]
    fn first_reading_preview_and_full_text() {
        let today = date(2026, 2, 10);
        let readings = snapshot(Some((today, reading_set(today, None))), None);
        let state = render(&ReadingSensor::new(ReadingKind::First), today, &readings);

        assert_eq!(state.state, "1 Kung 8:22-23, 27-30");
        let text = state.attribute("text").unwrap().as_str().unwrap();
        let preview = state.attribute("text_preview").unwrap().as_str().unwrap();
        assert!(text.chars().count() > PREVIEW_MAX_LEN);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_LEN);
        assert!(preview.ends_with("..."));
        assert!(text.starts_with(preview.trim_end_matches("...")));
        assert_eq!(state.attribute("stale"), Some(&Value::Bool(false)));
    }

    #[test]
    fn psalm_exposes_response() {
        let today = date(2026, 2, 10);
        let readings = snapshot(Some((today, reading_set(today, None))), None);
        let state = render(&ReadingSensor::new(ReadingKind::Psalm), today, &readings);
        assert_eq!(state.state, "Ps 84:3-5, 10-11");
        assert_eq!(
            state.attribute("response").and_then(Value::as_str),
            Some("Hur ljuvlig är din boning.")
        );
    }

    #[test]
    fn absent_second_reading_is_unavailable() {
        let today = date(2026, 2, 10);
        let readings = snapshot(Some((today, reading_set(today, None))), None);
        let state = render(&ReadingSensor::new(ReadingKind::Second), today, &readings);
        assert_eq!(state.state, "Ingen andra läsning idag");
        assert_eq!(state.attribute("available"), Some(&Value::Bool(false)));
        assert_eq!(state.attribute("text_preview").and_then(Value::as_str), Some(""));
        assert_eq!(state.attribute("error"), Some(&Value::Null));
    }

    #[test]
    fn present_second_reading_is_available() {
        let today = date(2026, 2, 8);
        let second = Reading {
            reference: "1 Kor 2:1-5".into(),
            text: "Bröder, när jag kom till er.".into(),
        };
        let readings = snapshot(Some((today, reading_set(today, Some(second)))), None);
        let state = render(&ReadingSensor::new(ReadingKind::Second), today, &readings);
        assert_eq!(state.state, "1 Kor 2:1-5");
        assert_eq!(state.attribute("available"), Some(&Value::Bool(true)));
    }

    #[test]
    fn status_ok() {
        let today = date(2026, 2, 10);
        let readings = snapshot(Some((today, reading_set(today, None))), None);
        let state = render(&ReadingsStatusSensor, today, &readings);
        assert_eq!(state.state, "OK");
        assert_eq!(state.attribute("status").and_then(Value::as_str), Some("ok"));
        assert_eq!(
            state.attribute("last_update").and_then(Value::as_str),
            Some("2026-02-10T05:00:00+00:00")
        );
        assert_eq!(
            state.attribute("url").and_then(Value::as_str),
            Some("https://example.test/vecka-7/tisdag-den-10-februari")
        );
    }

    #[test]
    fn status_shows_stale_data_with_error() {
        let yesterday = date(2026, 2, 10);
        let today = date(2026, 2, 11);
        let readings = snapshot(Some((yesterday, reading_set(yesterday, None))), Some("HTTP 404"));
        let state = render(&ReadingsStatusSensor, today, &readings);
        assert_eq!(state.state, "Fel");
        assert_eq!(state.attribute("error").and_then(Value::as_str), Some("HTTP 404"));
        assert_eq!(state.attribute("stale"), Some(&Value::Bool(true)));
        assert_eq!(state.attribute("status").and_then(Value::as_str), Some("stale"));
        assert_eq!(state.attribute("data_date").and_then(Value::as_str), Some("2026-02-10"));

        let gospel = render(&ReadingSensor::new(ReadingKind::Gospel), today, &readings);
        assert_eq!(gospel.state, "Mark 7:1-13");
        assert_eq!(gospel.attribute("stale"), Some(&Value::Bool(true)));
        assert_eq!(gospel.attribute("error").and_then(Value::as_str), Some("HTTP 404"));
    }

    #[test]
    fn status_failed_without_data() {
        let today = date(2026, 2, 11);
        let readings = snapshot(None, Some("timeout after 30s"));
        let state = render(&ReadingsStatusSensor, today, &readings);
        assert_eq!(state.state, "Fel");
        assert_eq!(state.attribute("status").and_then(Value::as_str), Some("failed"));
        assert_eq!(state.attribute("stale"), Some(&Value::Bool(false)));

        let first = render(&ReadingSensor::new(ReadingKind::First), today, &readings);
        assert_eq!(first.state, "Första läsningen");
        assert_eq!(first.attribute("text").and_then(Value::as_str), Some(""));
    }

    #[test]
    fn status_pending_before_first_poll() {
        let today = date(2026, 2, 11);
        let readings = snapshot(None, None);
        let state = render(&ReadingsStatusSensor, today, &readings);
        assert_eq!(state.state, "Väntar");
        assert_eq!(state.attribute("last_update"), Some(&Value::Null));
    }

    #[test]
    fn status_partial_when_psalm_missing() {
        let today = date(2026, 2, 10);
        let mut set = reading_set(today, None);
        set.psalm = None;
        set.status = ExtractionStatus::Partial {
            missing: vec!["psalm".into()],
        };
        let readings = snapshot(Some((today, set)), None);
        let state = render(&ReadingsStatusSensor, today, &readings);
        assert_eq!(state.state, "Delvis");
        assert_eq!(state.attribute("missing"), Some(&serde_json::json!(["psalm"])));

        let psalm = render(&ReadingSensor::new(ReadingKind::Psalm), today, &readings);
        assert_eq!(psalm.state, "Responsoriepsalm");
        assert_eq!(psalm.attribute("response").and_then(Value::as_str), Some(""));
    }
}
