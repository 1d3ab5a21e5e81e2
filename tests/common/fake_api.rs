use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;
use uuid::Uuid;

use lineup_backend::models::attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceWriteRequest, AttendanceWriteResult,
};
use lineup_backend::models::player::RosterPlayer;
use lineup_backend::sync::{AttendanceApi, RosterProvider, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Own,
    Admin,
}

#[derive(Default)]
struct FakeState {
    records: Vec<AttendanceRecord>,
    writes: Vec<(WriteKind, AttendanceWriteRequest)>,
    fail_with: Option<SyncError>,
    stored_status: Option<AttendanceStatus>,
    include_player: bool,
    roster_reads: usize,
    list_reads: usize,
}

/// In-memory attendance server. `own_player_id` is the player linked to the
/// calling user for "own attendance" writes.
#[derive(Clone)]
pub struct FakeAttendanceApi {
    state: Arc<Mutex<FakeState>>,
    roster: Vec<RosterPlayer>,
    own_player_id: Option<Uuid>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeAttendanceApi {
    pub fn new(roster: Vec<RosterPlayer>, own_player_id: Option<Uuid>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                include_player: true,
                ..FakeState::default()
            })),
            roster,
            own_player_id,
            gate: None,
        }
    }

    /// Hold every write until a permit is added to the returned semaphore.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn seed(&self, records: Vec<AttendanceRecord>) {
        self.state.lock().unwrap().records = records;
    }

    pub fn fail_with(&self, error: SyncError) {
        self.state.lock().unwrap().fail_with = Some(error);
    }

    /// Store `status` for every write, whatever the request asked for.
    pub fn store_status(&self, status: AttendanceStatus) {
        self.state.lock().unwrap().stored_status = Some(status);
    }

    /// Leave the roster entry out of write results.
    pub fn omit_player_in_writes(&self) {
        self.state.lock().unwrap().include_player = false;
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn writes(&self) -> Vec<(WriteKind, AttendanceWriteRequest)> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn roster_reads(&self) -> usize {
        self.state.lock().unwrap().roster_reads
    }

    pub fn list_reads(&self) -> usize {
        self.state.lock().unwrap().list_reads
    }

    async fn write(
        &self,
        kind: WriteKind,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError> {
        self.state.lock().unwrap().writes.push((kind, request.clone()));

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let player_id = match kind {
            WriteKind::Own => self.own_player_id.ok_or(SyncError::PlayerProfileMissing)?,
            WriteKind::Admin => request.player_id.expect("admin write without player"),
        };

        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_with.clone() {
            return Err(error);
        }

        let player = self.roster.iter().find(|p| p.id == player_id).cloned();
        let status = state.stored_status.unwrap_or(request.status);
        let confirmed_at = (status == AttendanceStatus::Confirmed).then(Utc::now);
        let record = match state.records.iter_mut().find(|r| r.player_id == player_id) {
            Some(existing) => {
                existing.status = status;
                existing.confirmed_at = confirmed_at;
                existing.clone()
            }
            None => {
                let record = AttendanceRecord {
                    id: Uuid::new_v4(),
                    match_id: request.match_id,
                    player_id,
                    user_id: player.as_ref().and_then(|p| p.user_id),
                    status,
                    confirmed_at,
                };
                state.records.push(record.clone());
                record
            }
        };

        let player = if state.include_player && record.status == AttendanceStatus::Confirmed {
            player
        } else {
            None
        };
        Ok(AttendanceWriteResult { attendance: record, player })
    }
}

#[async_trait]
impl AttendanceApi for FakeAttendanceApi {
    async fn list_attendance(&self, match_id: Uuid) -> Result<Vec<AttendanceRecord>, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.list_reads += 1;
        Ok(state
            .records
            .iter()
            .filter(|r| r.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn set_own_attendance(
        &self,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError> {
        self.write(WriteKind::Own, request).await
    }

    async fn set_player_attendance(
        &self,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError> {
        self.write(WriteKind::Admin, request).await
    }
}

#[async_trait]
impl RosterProvider for FakeAttendanceApi {
    async fn list_players(&self) -> Result<Vec<RosterPlayer>, SyncError> {
        self.state.lock().unwrap().roster_reads += 1;
        Ok(self.roster.clone())
    }
}

pub fn roster_player(name: &str, jersey_number: i32, position: &str) -> RosterPlayer {
    RosterPlayer {
        id: Uuid::new_v4(),
        user_id: Some(Uuid::new_v4()),
        name: name.to_string(),
        jersey_number,
        position: position.to_string(),
        profile_image_url: None,
    }
}
