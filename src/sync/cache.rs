// src/sync/cache.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use chrono::{DateTime, Utc};
use tokio::task::{AbortHandle, JoinHandle};
use uuid::Uuid;

use crate::models::attendance::AttendanceRecord;
use crate::sync::api::AttendanceApi;
use crate::sync::error::SyncError;

#[derive(Debug, Default)]
struct CacheEntry {
    records: Option<Vec<AttendanceRecord>>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
    // Bumped on every local write and every new read so that a read started
    // earlier never overwrites newer data.
    generation: u64,
    in_flight: Option<AbortHandle>,
}

/// Local mirror of each match's remote attendance list, keyed by match id.
#[derive(Debug, Clone, Default)]
pub struct AttendanceCache {
    entries: Arc<Mutex<HashMap<Uuid, CacheEntry>>>,
}

impl AttendanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, match_id: &Uuid) -> Option<Vec<AttendanceRecord>> {
        self.lock().get(match_id).and_then(|entry| entry.records.clone())
    }

    /// Replace the cached list. Local writes supersede any read still in flight.
    pub fn set(&self, match_id: Uuid, records: Vec<AttendanceRecord>) {
        let mut entries = self.lock();
        let entry = entries.entry(match_id).or_default();
        entry.records = Some(records);
        entry.generation += 1;
    }

    pub fn is_stale(&self, match_id: &Uuid) -> bool {
        self.lock().get(match_id).map_or(true, |entry| entry.stale || entry.records.is_none())
    }

    pub fn fetched_at(&self, match_id: &Uuid) -> Option<DateTime<Utc>> {
        self.lock().get(match_id).and_then(|entry| entry.fetched_at)
    }

    pub fn is_fetching(&self, match_id: &Uuid) -> bool {
        self.lock()
            .get(match_id)
            .and_then(|entry| entry.in_flight.as_ref())
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the in-flight read for `match_id`, if any. Returns whether a read
    /// was cancelled.
    pub fn cancel(&self, match_id: &Uuid) -> bool {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(match_id) else {
            return false;
        };
        match entry.in_flight.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!("Cancelled attendance read for match {}", match_id);
                true
            }
            _ => false,
        }
    }

    /// Start a read of the match's attendance list. Any read already in flight
    /// for the same match is cancelled first.
    pub fn fetch(
        &self,
        api: Arc<dyn AttendanceApi>,
        match_id: Uuid,
    ) -> JoinHandle<Result<Vec<AttendanceRecord>, SyncError>> {
        self.cancel(&match_id);

        let generation = {
            let mut entries = self.lock();
            let entry = entries.entry(match_id).or_default();
            entry.generation += 1;
            entry.generation
        };

        let cache = self.clone();
        let handle = tokio::spawn(async move {
            let result = api.list_attendance(match_id).await;
            let mut entries = cache.lock();
            let entry = entries.entry(match_id).or_default();
            match &result {
                Ok(records) if entry.generation == generation => {
                    entry.records = Some(records.clone());
                    entry.fetched_at = Some(Utc::now());
                    entry.stale = false;
                }
                Ok(_) => {
                    tracing::debug!("Discarding superseded attendance read for match {}", match_id);
                }
                Err(e) => {
                    tracing::warn!("Attendance read for match {} failed: {}", match_id, e);
                }
            }
            result
        });

        if let Some(entry) = self.lock().get_mut(&match_id) {
            entry.in_flight = Some(handle.abort_handle());
        }
        handle
    }

    /// Mark the match's list stale and refetch it from the server.
    pub fn invalidate(
        &self,
        api: Arc<dyn AttendanceApi>,
        match_id: Uuid,
    ) -> JoinHandle<Result<Vec<AttendanceRecord>, SyncError>> {
        self.lock().entry(match_id).or_default().stale = true;
        self.fetch(api, match_id)
    }
}
