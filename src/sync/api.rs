// src/sync/api.rs
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::attendance::{AttendanceRecord, AttendanceWriteRequest, AttendanceWriteResult};
use crate::models::player::RosterPlayer;
use crate::sync::error::SyncError;

/// Remote owner of attendance records.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn list_attendance(&self, match_id: Uuid) -> Result<Vec<AttendanceRecord>, SyncError>;

    /// Write the caller's own attendance. `request.player_id` is ignored; the
    /// server resolves the caller's player profile.
    async fn set_own_attendance(
        &self,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError>;

    /// Write any player's attendance. Requires admin privileges.
    async fn set_player_attendance(
        &self,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError>;
}

/// Read access to the organization's roster.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn list_players(&self) -> Result<Vec<RosterPlayer>, SyncError>;
}
