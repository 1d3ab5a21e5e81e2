// src/models/attendance.rs
use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::player::RosterPlayer;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Pending,
    Confirmed,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "pending",
            AttendanceStatus::Confirmed => "confirmed",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AttendanceStatus::Pending),
            "confirmed" => Ok(AttendanceStatus::Confirmed),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!("{} is not a valid attendance status", other)),
        }
    }
}

/// One player's attendance for one match, as stored by the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: AttendanceStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Body of `POST /matches/{match_id}/attendance`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SetOwnAttendanceRequest {
    pub status: AttendanceStatus,
}

/// Body of `POST /admin/matches/{match_id}/attendance`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SetPlayerAttendanceRequest {
    pub player_id: Uuid,
    pub status: AttendanceStatus,
}

/// Attendance write as issued by the synchronizer. `player_id` is omitted
/// when the caller writes their own attendance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttendanceWriteRequest {
    pub match_id: Uuid,
    pub player_id: Option<Uuid>,
    pub status: AttendanceStatus,
}

/// Result of an attendance write. Carries the roster entry of the player so
/// callers can place a newly confirmed player without another read.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttendanceWriteResult {
    pub attendance: AttendanceRecord,
    pub player: Option<RosterPlayer>,
}
