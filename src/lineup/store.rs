// src/lineup/store.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lineup::position::{
    FieldPosition, PlayerPosition, SlotLocation, SlotPosition, UnknownPositionPolicy,
};
use crate::models::attendance::AttendanceStatus;
use crate::models::lineup::{LineupState, PlayerRef};

/// Formation board and attendance mirror for the match currently being edited.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MatchState {
    pub match_id: Option<Uuid>,
    pub lineup: LineupState,
    pub override_out_of_position: bool,
    pub attendances: HashMap<Uuid, AttendanceStatus>,
}

/// Owns one match's formation board.
///
/// Every operation runs to completion synchronously. Requests that break a
/// rule (full slot, wrong position, unknown player) leave the state untouched
/// and are only logged.
#[derive(Debug, Clone, Default)]
pub struct LineupStore {
    state: MatchState,
    unknown_policy: UnknownPositionPolicy,
}

impl LineupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unknown_policy(policy: UnknownPositionPolicy) -> Self {
        Self {
            state: MatchState::default(),
            unknown_policy: policy,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn match_id(&self) -> Option<Uuid> {
        self.state.match_id
    }

    pub fn lineup(&self) -> &LineupState {
        &self.state.lineup
    }

    pub fn override_out_of_position(&self) -> bool {
        self.state.override_out_of_position
    }

    pub fn unknown_position_policy(&self) -> UnknownPositionPolicy {
        self.unknown_policy
    }

    pub fn attendances(&self) -> &HashMap<Uuid, AttendanceStatus> {
        &self.state.attendances
    }

    pub fn attendance(&self, player_id: &Uuid) -> Option<AttendanceStatus> {
        self.state.attendances.get(player_id).copied()
    }

    /// Bind the store to a new match with an empty board.
    pub fn set_match(&mut self, match_id: Uuid) {
        tracing::debug!("Lineup bound to match {}", match_id);
        self.state = MatchState {
            match_id: Some(match_id),
            ..MatchState::default()
        };
    }

    pub fn set_override_out_of_position(&mut self, enabled: bool) {
        self.state.override_out_of_position = enabled;
    }

    pub fn set_unknown_position_policy(&mut self, policy: UnknownPositionPolicy) {
        self.unknown_policy = policy;
    }

    /// First slot holding `player_id`, scanning POR, DEF, MED, DEL, then the bench.
    pub fn find_player_position(&self, player_id: &Uuid) -> Option<SlotLocation> {
        let lineup = &self.state.lineup;
        for position in FieldPosition::ALL {
            if let Some(index) = lineup
                .slots(position)
                .iter()
                .position(|slot| slot.contains(player_id))
            {
                return Some(SlotLocation::field(position, index));
            }
        }
        if lineup.bench.contains(player_id) {
            return Some(SlotLocation::bench());
        }
        None
    }

    /// Whether a player with `player_position` may be dropped into the given slot.
    /// The bench always accepts.
    pub fn can_drop_in_slot(
        &self,
        position: SlotPosition,
        slot_index: usize,
        player_position: Option<&str>,
    ) -> bool {
        let Some(field) = position.field() else {
            return true;
        };
        let Some(slot) = self.state.lineup.slots(field).get(slot_index) else {
            return false;
        };
        if slot.is_full() {
            return false;
        }
        if self.state.override_out_of_position {
            return true;
        }
        match player_position {
            Some(raw) => PlayerPosition::parse(raw).fits(field, self.unknown_policy),
            None => true,
        }
    }

    /// Number of players across every slot of `position`.
    pub fn get_slot_occupancy(&self, position: SlotPosition) -> usize {
        match position.field() {
            Some(field) => self.state.lineup.slots(field).iter().map(|s| s.len()).sum(),
            None => self.state.lineup.bench.len(),
        }
    }

    /// Move a player already on the board to `to[slot_index]`.
    ///
    /// `from` is where the caller believes the player is; it is searched first
    /// and the rest of the board after that. Returns `false` when the player
    /// is not on the board or the target slot rejects them.
    pub fn place_player(
        &mut self,
        player_id: Uuid,
        from: SlotPosition,
        to: SlotPosition,
        slot_index: usize,
    ) -> bool {
        let player = match self.locate_player(&player_id, from) {
            Some(player) => player,
            None => {
                tracing::debug!("Player {} is not on the board, ignoring move to {}", player_id, to);
                return false;
            }
        };

        if !self.can_drop_in_slot(to, slot_index, Some(player.player_position.as_str())) {
            tracing::debug!(
                "Rejected move of player {} to {}[{}]",
                player_id, to, slot_index
            );
            return false;
        }

        self.remove_player_from_slot(&player_id);
        self.insert(player, to, slot_index);
        true
    }

    /// Remove a player from every slot and the bench.
    pub fn remove_player_from_slot(&mut self, player_id: &Uuid) {
        let lineup = &mut self.state.lineup;
        for position in FieldPosition::ALL {
            for slot in lineup.slots_mut(position).iter_mut() {
                slot.players.retain(|p| &p.player_id != player_id);
            }
        }
        lineup.bench.players.retain(|p| &p.player_id != player_id);
    }

    /// Record a player's attendance. An absent player is taken off the board.
    pub fn update_attendance(&mut self, player_id: Uuid, status: AttendanceStatus) {
        self.state.attendances.insert(player_id, status);
        if status == AttendanceStatus::Absent {
            self.remove_player_from_slot(&player_id);
        }
    }

    /// Forget a player's attendance entry without touching the board.
    pub fn clear_attendance(&mut self, player_id: &Uuid) {
        self.state.attendances.remove(player_id);
    }

    /// Place a player into the first slot of their position that accepts them,
    /// or on the bench when none does. A player already on the board stays
    /// where they are.
    pub fn auto_assign_player(&mut self, player: PlayerRef) -> SlotLocation {
        if let Some(location) = self.find_player_position(&player.player_id) {
            tracing::debug!("Player {} already placed at {:?}", player.player_id, location);
            return location;
        }
        let canonical = PlayerPosition::parse(&player.player_position).canonical();
        if let Some(field) = canonical {
            for index in 0..field.slot_count() {
                if self.can_drop_in_slot(field.into(), index, Some(player.player_position.as_str())) {
                    tracing::debug!("Auto-assigned player {} to {:?}[{}]", player.player_id, field, index);
                    self.insert(player, field.into(), index);
                    return SlotLocation::field(field, index);
                }
            }
        }
        tracing::debug!("Auto-assigned player {} to the bench", player.player_id);
        self.insert(player, SlotPosition::Bench, 0);
        SlotLocation::bench()
    }

    /// Clear the board and attendances, keeping the match binding and toggles.
    pub fn reset_lineup(&mut self) {
        self.state.lineup = LineupState::default();
        self.state.attendances.clear();
    }

    fn locate_player(&self, player_id: &Uuid, hint: SlotPosition) -> Option<PlayerRef> {
        self.state
            .lineup
            .players_in(hint)
            .into_iter()
            .find(|p| &p.player_id == player_id)
            .or_else(|| self.state.lineup.find_player(player_id))
            .cloned()
    }

    fn insert(&mut self, player: PlayerRef, to: SlotPosition, slot_index: usize) {
        let lineup = &mut self.state.lineup;
        match to.field() {
            Some(field) => {
                if let Some(slot) = lineup.slots_mut(field).get_mut(slot_index) {
                    slot.players.push(player);
                }
            }
            None => {
                lineup.bench.players.push(player);
                lineup.bench.sort_by_jersey_number();
            }
        }
    }
}

/// Shared handle to a [`LineupStore`] for one match-editing session.
///
/// The lock is only taken for the duration of a single store operation and is
/// never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct LineupHandle {
    inner: Arc<Mutex<LineupStore>>,
}

impl LineupHandle {
    pub fn new(store: LineupStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` against the store with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut LineupStore) -> R) -> R {
        let mut store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    pub fn read<R>(&self, f: impl FnOnce(&LineupStore) -> R) -> R {
        let store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    pub fn snapshot(&self) -> MatchState {
        self.read(|store| store.state().clone())
    }
}
