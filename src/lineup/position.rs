// src/lineup/position.rs
use std::fmt;
use serde::{Deserialize, Serialize};

/// Maximum number of players a single field slot can hold.
pub const SLOT_CAPACITY: usize = 2;

/// The four areas of the formation board that hold field slots.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldPosition {
    Por,
    Def,
    Med,
    Del,
}

impl FieldPosition {
    /// Scan order used by every lookup over the board.
    pub const ALL: [FieldPosition; 4] = [
        FieldPosition::Por,
        FieldPosition::Def,
        FieldPosition::Med,
        FieldPosition::Del,
    ];

    pub fn slot_count(&self) -> usize {
        match self {
            FieldPosition::Por => 1,
            FieldPosition::Def => 4,
            FieldPosition::Med => 4,
            FieldPosition::Del => 2,
        }
    }
}

/// Any place a player can sit: one of the field areas or the bench.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotPosition {
    Por,
    Def,
    Med,
    Del,
    Bench,
}

impl SlotPosition {
    pub fn field(&self) -> Option<FieldPosition> {
        match self {
            SlotPosition::Por => Some(FieldPosition::Por),
            SlotPosition::Def => Some(FieldPosition::Def),
            SlotPosition::Med => Some(FieldPosition::Med),
            SlotPosition::Del => Some(FieldPosition::Del),
            SlotPosition::Bench => None,
        }
    }
}

impl From<FieldPosition> for SlotPosition {
    fn from(position: FieldPosition) -> Self {
        match position {
            FieldPosition::Por => SlotPosition::Por,
            FieldPosition::Def => SlotPosition::Def,
            FieldPosition::Med => SlotPosition::Med,
            FieldPosition::Del => SlotPosition::Del,
        }
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlotPosition::Por => "POR",
            SlotPosition::Def => "DEF",
            SlotPosition::Med => "MED",
            SlotPosition::Del => "DEL",
            SlotPosition::Bench => "BENCH",
        };
        write!(f, "{}", s)
    }
}

/// Where a player currently sits. `slot_index` is `None` for the bench.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SlotLocation {
    pub position: SlotPosition,
    pub slot_index: Option<usize>,
}

impl SlotLocation {
    pub fn field(position: FieldPosition, slot_index: usize) -> Self {
        Self {
            position: position.into(),
            slot_index: Some(slot_index),
        }
    }

    pub fn bench() -> Self {
        Self {
            position: SlotPosition::Bench,
            slot_index: None,
        }
    }
}

/// Roster position of a player, parsed from the roster's position string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unknown,
}

impl PlayerPosition {
    /// Case-insensitive parse of `PORTERO`, `DEFENSA`, `MEDIOCENTRO` and `DELANTERO`.
    /// Every other value is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PORTERO" => PlayerPosition::Goalkeeper,
            "DEFENSA" => PlayerPosition::Defender,
            "MEDIOCENTRO" => PlayerPosition::Midfielder,
            "DELANTERO" => PlayerPosition::Forward,
            _ => PlayerPosition::Unknown,
        }
    }

    pub fn canonical(&self) -> Option<FieldPosition> {
        match self {
            PlayerPosition::Goalkeeper => Some(FieldPosition::Por),
            PlayerPosition::Defender => Some(FieldPosition::Def),
            PlayerPosition::Midfielder => Some(FieldPosition::Med),
            PlayerPosition::Forward => Some(FieldPosition::Del),
            PlayerPosition::Unknown => None,
        }
    }

    /// Whether a player with this position may stand in `field` while position
    /// enforcement is active.
    pub fn fits(&self, field: FieldPosition, policy: UnknownPositionPolicy) -> bool {
        match self.canonical() {
            Some(canonical) => canonical == field,
            None => policy.allows_field_slot(),
        }
    }
}

/// Compatibility rule for players whose position string maps to no field area.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPositionPolicy {
    /// Unknown positions are accepted in any field slot.
    #[default]
    Permissive,
    /// Unknown positions may only go to the bench unless override is on.
    BenchOnly,
}

impl UnknownPositionPolicy {
    pub fn allows_field_slot(&self) -> bool {
        matches!(self, UnknownPositionPolicy::Permissive)
    }
}
