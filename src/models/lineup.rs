// src/models/lineup.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lineup::position::{FieldPosition, SlotPosition, SLOT_CAPACITY};

/// Immutable copy of the roster data needed on the formation board.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub player_id: Uuid,
    pub player_name: String,
    pub player_number: String,
    pub player_position: String,
}

impl PlayerRef {
    /// Numeric jersey number, if the stored string parses as one.
    pub fn jersey_number(&self) -> Option<u32> {
        self.player_number.trim().parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub players: Vec<PlayerRef>,
}

impl Slot {
    pub fn contains(&self, player_id: &Uuid) -> bool {
        self.players.iter().any(|p| &p.player_id == player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= SLOT_CAPACITY
    }

    /// Sort ascending by numeric jersey number. Unparseable numbers go last,
    /// keeping their relative order.
    pub fn sort_by_jersey_number(&mut self) {
        self.players
            .sort_by_key(|p| p.jersey_number().map_or((1, 0), |n| (0, n)));
    }
}

/// Fixed-shape formation board: 1 goalkeeper slot, 4 defense, 4 midfield,
/// 2 attack, and an unbounded bench.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LineupState {
    #[serde(rename = "POR")]
    pub por: Vec<Slot>,
    #[serde(rename = "DEF")]
    pub def: Vec<Slot>,
    #[serde(rename = "MED")]
    pub med: Vec<Slot>,
    #[serde(rename = "DEL")]
    pub del: Vec<Slot>,
    #[serde(rename = "BENCH")]
    pub bench: Slot,
}

impl Default for LineupState {
    fn default() -> Self {
        let empty = |position: FieldPosition| vec![Slot::default(); position.slot_count()];
        Self {
            por: empty(FieldPosition::Por),
            def: empty(FieldPosition::Def),
            med: empty(FieldPosition::Med),
            del: empty(FieldPosition::Del),
            bench: Slot::default(),
        }
    }
}

impl LineupState {
    pub fn slots(&self, position: FieldPosition) -> &[Slot] {
        match position {
            FieldPosition::Por => &self.por,
            FieldPosition::Def => &self.def,
            FieldPosition::Med => &self.med,
            FieldPosition::Del => &self.del,
        }
    }

    pub fn slots_mut(&mut self, position: FieldPosition) -> &mut Vec<Slot> {
        match position {
            FieldPosition::Por => &mut self.por,
            FieldPosition::Def => &mut self.def,
            FieldPosition::Med => &mut self.med,
            FieldPosition::Del => &mut self.del,
        }
    }

    /// Players in `position`, across all of its slots.
    pub fn players_in(&self, position: SlotPosition) -> Vec<&PlayerRef> {
        match position.field() {
            Some(field) => self
                .slots(field)
                .iter()
                .flat_map(|slot| slot.players.iter())
                .collect(),
            None => self.bench.players.iter().collect(),
        }
    }

    pub fn find_player(&self, player_id: &Uuid) -> Option<&PlayerRef> {
        FieldPosition::ALL
            .iter()
            .flat_map(|position| self.slots(*position).iter())
            .chain(std::iter::once(&self.bench))
            .flat_map(|slot| slot.players.iter())
            .find(|p| &p.player_id == player_id)
    }

    /// Total number of placed players, bench included.
    pub fn player_count(&self) -> usize {
        FieldPosition::ALL
            .iter()
            .flat_map(|position| self.slots(*position).iter())
            .map(Slot::len)
            .sum::<usize>()
            + self.bench.len()
    }
}
