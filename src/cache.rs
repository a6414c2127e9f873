//! Single-slot cache keyed by calendar date.
//!
//! Only "today" is ever relevant, so the cache holds one entry and the date
//! it was computed for. A fetch for a new date replaces the slot on success;
//! on failure the previous entry stays available and the failure reason is
//! attached to it (stale-but-available).
//!
//! Mutation takes `&mut self`: the host invokes one poll at a time and the
//! cache is not meant to be shared between concurrent refreshes.

use chrono::NaiveDate;
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

/// A cached value together with the date it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// What the cache can show right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// The last successful value, possibly for an older date.
    pub entry: Option<CacheEntry<T>>,
    /// Reason the most recent fetch failed, cleared by the next success.
    pub error: Option<String>,
}

impl<T> Snapshot<T> {
    pub fn value(&self) -> Option<&T> {
        self.entry.as_ref().map(|e| &e.value)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.entry.as_ref().map(|e| e.date)
    }

    /// True when the value shown was computed for another day than `today`.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.date().is_some_and(|d| d != today)
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            entry: None,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct DailyCache<T> {
    slot: Option<CacheEntry<T>>,
    error: Option<String>,
    force_refresh: bool,
}

impl<T> Default for DailyCache<T> {
    fn default() -> Self {
        Self {
            slot: None,
            error: None,
            force_refresh: false,
        }
    }
}

impl<T: Clone> DailyCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `date`, calling `fetch` only when the slot holds
    /// another date or a refresh was forced.
    ///
    /// On failure the previous entry (if any) is returned with `error` set;
    /// with nothing cached the snapshot has no entry and only the error.
    pub async fn get_or_fetch<F, Fut, E>(&mut self, date: NaiveDate, fetch: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let fresh = self.slot.as_ref().is_some_and(|e| e.date == date);
        if fresh && !self.force_refresh {
            debug!(%date, "Serving cached entry");
            return self.snapshot();
        }

        match fetch().await {
            Ok(value) => {
                self.slot = Some(CacheEntry { date, value });
                self.error = None;
                self.force_refresh = false;
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(
                    %date,
                    error = %reason,
                    cached = ?self.slot.as_ref().map(|entry| entry.date),
                    "Fetch failed; keeping previous entry"
                );
                self.error = Some(reason);
            }
        }
        self.snapshot()
    }

    /// Force the next [`get_or_fetch`](Self::get_or_fetch) to refetch even
    /// for the cached date. The current entry stays visible until then.
    pub fn invalidate(&mut self) {
        self.force_refresh = true;
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            entry: self.slot.clone(),
            error: self.error.clone(),
        }
    }
}
