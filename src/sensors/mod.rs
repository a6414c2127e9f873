//! Host-facing sensor entities.
//!
//! Sensors are read-only projections of the cached pipeline results: each
//! one picks a few fields out of a [`SensorContext`] and renders a short
//! state string plus an attribute map. They hold no state of their own.
//!
//! | Module      | Sensors                                                     |
//! |-------------|-------------------------------------------------------------|
//! | [`liturgy`] | liturgical day, saint of the day, rosary, fasting/abstinence |
//! | [`readings`]| first reading, psalm, second reading, gospel, fetch status  |

pub mod liturgy;
pub mod readings;

use crate::cache::Snapshot;
use crate::models::{LiturgicalDay, MartyrologyEntry, ReadingSet};
use crate::utils::{STATE_MAX_LEN, truncate_text};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Everything a sensor may read during one poll.
#[derive(Debug, Clone, Copy)]
pub struct SensorContext<'a> {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    pub calendar: &'a Snapshot<LiturgicalDay>,
    pub readings: &'a Snapshot<ReadingSet>,
    /// URL of the most recent readings attempt, successful or not.
    pub readings_url: Option<&'a str>,
    pub martyrology: &'a Snapshot<MartyrologyEntry>,
}

/// A rendered sensor as published to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub state: String,
    pub attributes: Map<String, Value>,
}

impl SensorState {
    /// Build a state; `state` is truncated to the host's length limit.
    pub fn new(unique_id: &'static str, name: &'static str, icon: &'static str, state: &str) -> Self {
        Self {
            unique_id,
            name,
            icon,
            state: truncate_text(state, STATE_MAX_LEN),
            attributes: Map::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

pub trait Sensor: Send + Sync {
    fn unique_id(&self) -> &'static str;

    fn render(&self, ctx: &SensorContext<'_>) -> SensorState;
}

/// The full sensor set, in the order the host registers it.
pub fn all_sensors() -> Vec<Box<dyn Sensor>> {
    vec![
        Box::new(liturgy::LiturgicalDaySensor),
        Box::new(liturgy::SaintOfTheDaySensor),
        Box::new(readings::ReadingSensor::new(readings::ReadingKind::First)),
        Box::new(readings::ReadingSensor::new(readings::ReadingKind::Psalm)),
        Box::new(readings::ReadingSensor::new(readings::ReadingKind::Second)),
        Box::new(readings::ReadingSensor::new(readings::ReadingKind::Gospel)),
        Box::new(readings::ReadingsStatusSensor),
        Box::new(liturgy::RosaryMysteriesSensor),
        Box::new(liturgy::AbstinenceSensor),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::cache::CacheEntry;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn snapshot<T>(value: Option<(NaiveDate, T)>, error: Option<&str>) -> Snapshot<T> {
        Snapshot {
            entry: value.map(|(date, value)| CacheEntry { date, value }),
            error: error.map(str::to_string),
        }
    }

    pub fn calendar_day(date: NaiveDate, json: &str) -> LiturgicalDay {
        let mut day: LiturgicalDay = serde_json::from_str(json).unwrap();
        day.date = date;
        day
    }
}
