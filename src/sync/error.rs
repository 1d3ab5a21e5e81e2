// src/sync/error.rs
use crate::models::user::UserRole;

/// Failures of a remote attendance or roster call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("no player profile is linked to this account")]
    PlayerProfileMissing,
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("request was cancelled")]
    Cancelled,
}

pub const PROFILE_MISSING_MESSAGE: &str =
    "Your account is not linked to a player profile. Ask an administrator to link it before confirming attendance.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Could not update attendance. Please try again.";

impl SyncError {
    /// Message shown to the user for this failure.
    ///
    /// The missing-profile case only applies to players writing their own
    /// attendance; for admins it falls back to the generic message.
    pub fn user_message(&self, role: UserRole) -> &'static str {
        match (self, role) {
            (SyncError::PlayerProfileMissing, UserRole::User) => PROFILE_MISSING_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SyncError::UnexpectedResponse(e.to_string())
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}
