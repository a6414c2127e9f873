//! Polling entry point for the host.
//!
//! [`Integration`] owns the HTTP client, one [`DailyCache`] per pipeline and
//! the sensor set. Each [`Integration::update`] refreshes the caches (a no-op
//! when today's data is already held) and renders every sensor from the
//! resulting snapshots.
//!
//! The three pipelines are independent: they are awaited together with
//! `tokio::join!` and a failure in one leaves the others untouched.

use crate::cache::{DailyCache, Snapshot};
use crate::config::Settings;
use crate::error::FetchError;
use crate::http::HttpClient;
use crate::models::{LiturgicalDay, MartyrologyEntry, ReadingSet};
use crate::scrapers::{calendar, katolska, martyrology};
use crate::sensors::{Sensor, SensorContext, SensorState, all_sensors};
use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

pub struct Integration {
    client: HttpClient,
    settings: Settings,
    calendar: DailyCache<LiturgicalDay>,
    readings: DailyCache<ReadingSet>,
    martyrology: DailyCache<MartyrologyEntry>,
    /// URL of the last readings attempt, kept for the status sensor.
    readings_url: Option<String>,
    sensors: Vec<Box<dyn Sensor>>,
}

impl Integration {
    /// Create an integration with empty caches and the full sensor set.
    ///
    /// # Arguments
    ///
    /// * `settings` - Upstream URLs, timeout and poll interval
    ///
    /// # Returns
    ///
    /// The integration, or a [`FetchError`] if the HTTP client cannot be
    /// built.
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        Ok(Self {
            client: HttpClient::new(&settings)?,
            settings,
            calendar: DailyCache::new(),
            readings: DailyCache::new(),
            martyrology: DailyCache::new(),
            readings_url: None,
            sensors: all_sensors(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sensors(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    /// Bring all three caches up to date for `today`.
    #[instrument(level = "info", skip(self))]
    pub async fn refresh(&mut self, today: NaiveDate) {
        let client = &self.client;
        let settings = &self.settings;
        let mut attempted_url = None;
        let attempted = &mut attempted_url;

        let (calendar, readings, martyrology) = tokio::join!(
            self.calendar.get_or_fetch(today, move || {
                calendar::fetch_liturgical_day(client, &settings.calendar_api_url, today)
            }),
            self.readings.get_or_fetch(today, move || async move {
                let result =
                    katolska::fetch_reading_set(client, &settings.readings_base_url, today, Utc::now())
                        .await;
                *attempted = Some(match &result {
                    Ok(set) => set.url.clone(),
                    Err(e) => e.url().to_string(),
                });
                result
            }),
            self.martyrology.get_or_fetch(today, move || {
                martyrology::fetch_martyrology(client, &settings.martyrology_url, today)
            }),
        );

        if attempted_url.is_some() {
            self.readings_url = attempted_url;
        }
        info!(
            calendar = outcome(&calendar),
            readings = outcome(&readings),
            martyrology = outcome(&martyrology),
            "Refresh complete"
        );
    }

    /// Render every sensor from the current cache contents.
    pub fn states(&self, today: NaiveDate) -> Vec<SensorState> {
        let calendar = self.calendar.snapshot();
        let readings = self.readings.snapshot();
        let martyrology = self.martyrology.snapshot();
        let ctx = SensorContext {
            today,
            now: Utc::now(),
            calendar: &calendar,
            readings: &readings,
            readings_url: self.readings_url.as_deref(),
            martyrology: &martyrology,
        };
        self.sensors.iter().map(|s| s.render(&ctx)).collect()
    }

    /// One host poll: refresh, then render.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut integration = Integration::new(Settings::default())?;
    /// let states = integration.update(Local::now().date_naive()).await;
    /// assert_eq!(states.len(), 9);
    /// ```
    pub async fn update(&mut self, today: NaiveDate) -> Vec<SensorState> {
        self.refresh(today).await;
        self.states(today)
    }

    /// Make the next poll refetch everything, even for a cached day.
    pub fn force_refresh(&mut self) {
        info!("Manual refresh requested");
        self.calendar.invalidate();
        self.readings.invalidate();
        self.martyrology.invalidate();
    }
}

fn outcome<T>(snapshot: &Snapshot<T>) -> &'static str {
    match (snapshot.entry.is_some(), snapshot.error.is_some()) {
        (true, false) => "ok",
        (true, true) => "stale",
        (false, true) => "failed",
        (false, false) => "empty",
    }
}

