// src/sync/synchronizer.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::lineup::position::SlotLocation;
use crate::lineup::store::LineupHandle;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, AttendanceWriteRequest};
use crate::models::player::RosterPlayer;
use crate::models::user::UserRole;
use crate::sync::api::{AttendanceApi, RosterProvider};
use crate::sync::cache::AttendanceCache;
use crate::sync::error::SyncError;
use crate::sync::events::{AttendanceEvent, PriorAttendance};

/// Who is editing attendance.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Successful attendance write as seen by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceConfirmation {
    pub record: AttendanceRecord,
    pub message: String,
    /// Where the player was auto-assigned, when the write confirmed them and
    /// they were not on the board yet.
    pub placement: Option<SlotLocation>,
}

/// Pushes attendance changes to the server while keeping the lineup store and
/// the attendance mirror optimistically up to date.
pub struct AttendanceSynchronizer {
    session: Session,
    lineup: LineupHandle,
    cache: AttendanceCache,
    api: Arc<dyn AttendanceApi>,
    roster: Arc<dyn RosterProvider>,
}

impl AttendanceSynchronizer {
    pub fn new(
        session: Session,
        lineup: LineupHandle,
        cache: AttendanceCache,
        api: Arc<dyn AttendanceApi>,
        roster: Arc<dyn RosterProvider>,
    ) -> Self {
        Self {
            session,
            lineup,
            cache,
            api,
            roster,
        }
    }

    pub fn lineup(&self) -> &LineupHandle {
        &self.lineup
    }

    pub fn cache(&self) -> &AttendanceCache {
        &self.cache
    }

    /// Set a player's attendance for a match.
    ///
    /// Local state reflects the new status before the request is sent. On
    /// failure both caches are rolled back. Either way the match's attendance
    /// list is refetched afterwards.
    #[tracing::instrument(
        name = "Confirm attendance",
        skip(self),
        fields(user_id = %self.session.user_id, role = %self.session.role)
    )]
    pub async fn confirm_attendance(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        status: AttendanceStatus,
    ) -> Result<AttendanceConfirmation, SyncError> {
        self.cache.cancel(&match_id);

        let owner = (!self.session.is_admin()).then_some(self.session.user_id);
        let event = AttendanceEvent::set(match_id, player_id, status).for_user(owner);
        let prior = self.apply_optimistic(&event);

        let request = AttendanceWriteRequest {
            match_id,
            player_id: self.session.is_admin().then_some(player_id),
            status,
        };
        let result = if self.session.is_admin() {
            self.api.set_player_attendance(&request).await
        } else {
            self.api.set_own_attendance(&request).await
        };

        let outcome = match result {
            Ok(written) => {
                self.apply(&AttendanceEvent::from_server(written.attendance.clone()));
                let stored = written.attendance.status;
                let placement = if stored == AttendanceStatus::Confirmed {
                    self.place_confirmed(match_id, player_id, written.player).await
                } else {
                    None
                };
                tracing::info!("✅ Attendance for player {} set to {}", player_id, stored);
                Ok(AttendanceConfirmation {
                    record: written.attendance,
                    message: self.success_message(stored).to_string(),
                    placement,
                })
            }
            Err(e) => {
                tracing::error!("❌ Failed to set attendance for player {}: {}", player_id, e);
                self.apply(&event.invert(prior));
                Err(e)
            }
        };

        let _ = self.cache.invalidate(self.api.clone(), match_id);
        outcome
    }

    fn apply_optimistic(&self, event: &AttendanceEvent) -> PriorAttendance {
        let records = self.cache.get(&event.match_id).unwrap_or_default();
        let prior = self.lineup.read(|store| event.capture_prior(&records, store));
        self.lineup.with(|store| event.apply_to_store(store));
        self.cache.set(event.match_id, event.apply_to_records(&records));
        prior
    }

    fn apply(&self, event: &AttendanceEvent) {
        let records = self.cache.get(&event.match_id).unwrap_or_default();
        self.lineup.with(|store| event.apply_to_store(store));
        self.cache.set(event.match_id, event.apply_to_records(&records));
    }

    /// Give a newly confirmed player a default spot on the board.
    async fn place_confirmed(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        player: Option<RosterPlayer>,
    ) -> Option<SlotLocation> {
        let player = match player {
            Some(player) => player,
            None => match self.roster.list_players().await {
                Ok(players) => players.into_iter().find(|p| p.id == player_id)?,
                Err(e) => {
                    tracing::warn!("Could not load roster to place player {}: {}", player_id, e);
                    return None;
                }
            },
        };

        self.lineup.with(|store| {
            if store.match_id() != Some(match_id) {
                return None;
            }
            if store.attendance(&player_id) != Some(AttendanceStatus::Confirmed) {
                return None;
            }
            if store.find_player_position(&player_id).is_some() {
                return None;
            }
            Some(store.auto_assign_player(player.to_player_ref()))
        })
    }

    /// Message to show the user when `confirm_attendance` failed.
    pub fn failure_message(&self, error: &SyncError) -> &'static str {
        error.user_message(self.session.role)
    }

    fn success_message(&self, status: AttendanceStatus) -> &'static str {
        match (self.session.is_admin(), status) {
            (true, _) => "Player attendance updated",
            (false, AttendanceStatus::Confirmed) => "Your attendance is confirmed",
            (false, AttendanceStatus::Absent) => "You are marked as absent",
            (false, AttendanceStatus::Pending) => "Your attendance is pending",
        }
    }
}
