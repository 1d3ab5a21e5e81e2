// src/sync/events.rs
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::lineup::store::LineupStore;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};

/// What an [`AttendanceEvent`] does to one player's attendance entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceChange {
    /// Set a new status. Records missing from the mirror are synthesized with
    /// `placeholder_id` until the server returns the real one.
    Set {
        status: AttendanceStatus,
        placeholder_id: Uuid,
        at: DateTime<Utc>,
    },
    /// Put back exactly this status and record; `None` removes the entry.
    Put {
        status: Option<AttendanceStatus>,
        record: Option<AttendanceRecord>,
    },
}

/// One player's attendance entry as seen by both local caches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriorAttendance {
    pub status: Option<AttendanceStatus>,
    pub record: Option<AttendanceRecord>,
}

/// A change to one player's attendance for one match, applied to both the
/// lineup store and the mirrored attendance list.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEvent {
    pub match_id: Uuid,
    pub player_id: Uuid,
    /// Account the change is made for. When set, a mirrored record owned by
    /// this user is matched even if its player id differs.
    pub user_id: Option<Uuid>,
    pub change: AttendanceChange,
}

impl AttendanceEvent {
    pub fn set(match_id: Uuid, player_id: Uuid, status: AttendanceStatus) -> Self {
        Self {
            match_id,
            player_id,
            user_id: None,
            change: AttendanceChange::Set {
                status,
                placeholder_id: Uuid::now_v7(),
                at: Utc::now(),
            },
        }
    }

    pub fn for_user(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Adopt the record the server returned as the new truth for this player.
    pub fn from_server(record: AttendanceRecord) -> Self {
        Self {
            match_id: record.match_id,
            player_id: record.player_id,
            user_id: record.user_id,
            change: AttendanceChange::Put {
                status: Some(record.status),
                record: Some(record),
            },
        }
    }

    /// Read this event's player entry out of both caches.
    pub fn capture_prior(&self, records: &[AttendanceRecord], store: &LineupStore) -> PriorAttendance {
        PriorAttendance {
            status: self.bound_to(store).then(|| store.attendance(&self.player_id)).flatten(),
            record: records.iter().find(|r| self.matches(r)).cloned(),
        }
    }

    /// Compensating event that restores `prior`.
    pub fn invert(&self, prior: PriorAttendance) -> AttendanceEvent {
        AttendanceEvent {
            match_id: self.match_id,
            player_id: self.player_id,
            user_id: self.user_id,
            change: AttendanceChange::Put {
                status: prior.status,
                record: prior.record,
            },
        }
    }

    /// New attendance list with this event applied.
    pub fn apply_to_records(&self, records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
        let mut next = records.to_vec();
        let existing = next.iter().position(|r| self.matches(r));

        match &self.change {
            AttendanceChange::Set { status, placeholder_id, at } => {
                let confirmed_at = (*status == AttendanceStatus::Confirmed).then_some(*at);
                match existing {
                    Some(index) => {
                        next[index].status = *status;
                        next[index].confirmed_at = confirmed_at;
                    }
                    None => next.push(AttendanceRecord {
                        id: *placeholder_id,
                        match_id: self.match_id,
                        player_id: self.player_id,
                        user_id: self.user_id,
                        status: *status,
                        confirmed_at,
                    }),
                }
            }
            AttendanceChange::Put { record, .. } => match (existing, record) {
                (Some(index), Some(record)) => next[index] = record.clone(),
                (None, Some(record)) => next.push(record.clone()),
                (_, None) => next.retain(|r| !self.matches(r)),
            },
        }
        next
    }

    /// Apply this event to the store's attendance map. Ignored when the store
    /// is bound to a different match.
    pub fn apply_to_store(&self, store: &mut LineupStore) {
        if !self.bound_to(store) {
            tracing::debug!(
                "Lineup is not bound to match {}, skipping attendance change for {}",
                self.match_id, self.player_id
            );
            return;
        }
        match &self.change {
            AttendanceChange::Set { status, .. } => store.update_attendance(self.player_id, *status),
            AttendanceChange::Put { status: Some(status), .. } => {
                store.update_attendance(self.player_id, *status)
            }
            AttendanceChange::Put { status: None, .. } => store.clear_attendance(&self.player_id),
        }
    }

    fn matches(&self, record: &AttendanceRecord) -> bool {
        record.player_id == self.player_id
            || (self.user_id.is_some() && record.user_id == self.user_id)
    }

    fn bound_to(&self, store: &LineupStore) -> bool {
        store.match_id() == Some(self.match_id)
    }
}
