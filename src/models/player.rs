// src/models/player.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::lineup::PlayerRef;

/// A player as listed in an organization's roster.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct RosterPlayer {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub jersey_number: i32,
    pub position: String,
    pub profile_image_url: Option<String>,
}

impl RosterPlayer {
    /// Snapshot of this roster entry for placement on the formation board.
    pub fn to_player_ref(&self) -> PlayerRef {
        PlayerRef {
            player_id: self.id,
            player_name: self.name.clone(),
            player_number: self.jersey_number.to_string(),
            player_position: self.position.clone(),
        }
    }
}
