// tests/attendance_sync_test.rs
use std::sync::Arc;
use uuid::Uuid;

use lineup_backend::lineup::{FieldPosition, LineupHandle, LineupStore, SlotLocation};
use lineup_backend::models::attendance::{AttendanceRecord, AttendanceStatus};
use lineup_backend::models::user::UserRole;
use lineup_backend::sync::error::{GENERIC_FAILURE_MESSAGE, PROFILE_MISSING_MESSAGE};
use lineup_backend::sync::{AttendanceCache, AttendanceSynchronizer, Session, SyncError};

mod common;
use common::fake_api::{roster_player, FakeAttendanceApi, WriteKind};

struct Harness {
    match_id: Uuid,
    api: FakeAttendanceApi,
    synchronizer: Arc<AttendanceSynchronizer>,
}

fn harness(api: FakeAttendanceApi, role: UserRole) -> Harness {
    let match_id = Uuid::new_v4();
    let mut store = LineupStore::new();
    store.set_match(match_id);

    let synchronizer = AttendanceSynchronizer::new(
        Session { user_id: Uuid::new_v4(), role },
        LineupHandle::new(store),
        AttendanceCache::new(),
        Arc::new(api.clone()),
        Arc::new(api.clone()),
    );
    Harness {
        match_id,
        api,
        synchronizer: Arc::new(synchronizer),
    }
}

fn pending_record(match_id: Uuid, player_id: Uuid) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4(),
        match_id,
        player_id,
        user_id: None,
        status: AttendanceStatus::Pending,
        confirmed_at: None,
    }
}

#[tokio::test]
async fn admin_confirmation_auto_assigns_player() {
    let striker = roster_player("Striker", 9, "DELANTERO");
    let h = harness(FakeAttendanceApi::new(vec![striker.clone()], None), UserRole::Admin);

    let confirmation = h
        .synchronizer
        .confirm_attendance(h.match_id, striker.id, AttendanceStatus::Confirmed)
        .await
        .expect("confirmation should succeed");

    assert_eq!(confirmation.message, "Player attendance updated");
    assert_eq!(confirmation.placement, Some(SlotLocation::field(FieldPosition::Del, 0)));
    assert_eq!(confirmation.record.status, AttendanceStatus::Confirmed);

    let writes = h.api.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, WriteKind::Admin);
    assert_eq!(writes[0].1.player_id, Some(striker.id));

    let lineup = h.synchronizer.lineup();
    assert_eq!(lineup.read(|s| s.attendance(&striker.id)), Some(AttendanceStatus::Confirmed));
    assert_eq!(
        lineup.read(|s| s.lineup().del[0].players[0].player_name.clone()),
        "Striker"
    );

    // The mirror holds the server's record, not a placeholder
    let mirrored = h.synchronizer.cache().get(&h.match_id).expect("mirror populated");
    assert_eq!(mirrored, vec![confirmation.record]);
}

#[tokio::test]
async fn player_writes_own_attendance_without_player_id() {
    let keeper = roster_player("Keeper", 1, "PORTERO");
    let h = harness(FakeAttendanceApi::new(vec![keeper.clone()], Some(keeper.id)), UserRole::User);

    let confirmation = h
        .synchronizer
        .confirm_attendance(h.match_id, keeper.id, AttendanceStatus::Confirmed)
        .await
        .expect("confirmation should succeed");

    assert_eq!(confirmation.message, "Your attendance is confirmed");
    assert_eq!(confirmation.placement, Some(SlotLocation::field(FieldPosition::Por, 0)));

    let writes = h.api.writes();
    assert_eq!(writes[0].0, WriteKind::Own);
    assert_eq!(writes[0].1.player_id, None);
}

#[tokio::test]
async fn success_message_follows_stored_status() {
    let keeper = roster_player("Keeper", 1, "PORTERO");
    let h = harness(FakeAttendanceApi::new(vec![keeper.clone()], Some(keeper.id)), UserRole::User);
    h.api.store_status(AttendanceStatus::Pending);

    let confirmation = h
        .synchronizer
        .confirm_attendance(h.match_id, keeper.id, AttendanceStatus::Confirmed)
        .await
        .expect("write should succeed");

    assert_eq!(confirmation.record.status, AttendanceStatus::Pending);
    assert_eq!(confirmation.message, "Your attendance is pending");
    assert_eq!(confirmation.placement, None);
    let lineup = h.synchronizer.lineup();
    assert_eq!(lineup.read(|s| s.attendance(&keeper.id)), Some(AttendanceStatus::Pending));
    assert_eq!(lineup.read(|s| s.find_player_position(&keeper.id)), None);
}

#[tokio::test]
async fn failed_write_rolls_back_both_caches() {
    let mid = roster_player("Mid", 8, "MEDIOCENTRO");
    let h = harness(FakeAttendanceApi::new(vec![mid.clone()], None), UserRole::Admin);

    let seeded = vec![pending_record(h.match_id, mid.id)];
    h.api.seed(seeded.clone());
    h.synchronizer.cache().set(h.match_id, seeded.clone());
    h.synchronizer
        .lineup()
        .with(|s| s.update_attendance(mid.id, AttendanceStatus::Pending));
    let before = h.synchronizer.lineup().snapshot();

    h.api.fail_with(SyncError::Transport("connection reset".into()));
    let err = h
        .synchronizer
        .confirm_attendance(h.match_id, mid.id, AttendanceStatus::Confirmed)
        .await
        .expect_err("write should fail");

    assert_eq!(err, SyncError::Transport("connection reset".into()));
    assert_eq!(h.synchronizer.failure_message(&err), GENERIC_FAILURE_MESSAGE);
    assert_eq!(h.synchronizer.lineup().snapshot(), before);
    assert_eq!(h.synchronizer.cache().get(&h.match_id), Some(seeded));
}

#[tokio::test]
async fn optimistic_state_is_visible_before_write_resolves() {
    let defender = roster_player("Defender", 4, "DEFENSA");
    let (api, gate) = FakeAttendanceApi::new(vec![defender.clone()], None).gated();
    let h = harness(api, UserRole::Admin);
    h.synchronizer.cache().set(h.match_id, Vec::new());

    let synchronizer = h.synchronizer.clone();
    let match_id = h.match_id;
    let player_id = defender.id;
    let task = tokio::spawn(async move {
        synchronizer
            .confirm_attendance(match_id, player_id, AttendanceStatus::Confirmed)
            .await
    });

    while h.api.writes().is_empty() {
        tokio::task::yield_now().await;
    }

    // Status and a provisional record are in place while the request is pending
    assert_eq!(
        h.synchronizer.lineup().read(|s| s.attendance(&defender.id)),
        Some(AttendanceStatus::Confirmed)
    );
    let provisional = h.synchronizer.cache().get(&h.match_id).expect("mirror patched");
    assert_eq!(provisional.len(), 1);
    assert_eq!(provisional[0].id.get_version_num(), 7);
    // Not placed until the server confirms
    assert_eq!(h.synchronizer.lineup().read(|s| s.find_player_position(&defender.id)), None);

    gate.add_permits(1);
    let confirmation = task.await.expect("task panicked").expect("write should succeed");
    assert_eq!(confirmation.placement, Some(SlotLocation::field(FieldPosition::Def, 0)));
    assert_ne!(h.synchronizer.cache().get(&h.match_id).unwrap()[0].id, provisional[0].id);
}

#[tokio::test]
async fn missing_profile_surfaces_specific_message() {
    let h = harness(FakeAttendanceApi::new(vec![], None), UserRole::User);
    let player_id = Uuid::new_v4();

    let err = h
        .synchronizer
        .confirm_attendance(h.match_id, player_id, AttendanceStatus::Confirmed)
        .await
        .expect_err("player without profile cannot confirm");

    assert_eq!(err, SyncError::PlayerProfileMissing);
    assert_eq!(h.synchronizer.failure_message(&err), PROFILE_MISSING_MESSAGE);
    assert_eq!(h.synchronizer.lineup().read(|s| s.attendance(&player_id)), None);
}

#[tokio::test]
async fn absent_evicts_player_already_on_board() {
    let winger = roster_player("Winger", 11, "DELANTERO");
    let h = harness(FakeAttendanceApi::new(vec![winger.clone()], None), UserRole::Admin);

    h.synchronizer
        .confirm_attendance(h.match_id, winger.id, AttendanceStatus::Confirmed)
        .await
        .expect("confirm");
    assert!(h.synchronizer.lineup().read(|s| s.find_player_position(&winger.id)).is_some());

    let confirmation = h
        .synchronizer
        .confirm_attendance(h.match_id, winger.id, AttendanceStatus::Absent)
        .await
        .expect("absent");

    assert_eq!(confirmation.placement, None);
    assert_eq!(h.synchronizer.lineup().read(|s| s.find_player_position(&winger.id)), None);
    assert_eq!(
        h.synchronizer.lineup().read(|s| s.attendance(&winger.id)),
        Some(AttendanceStatus::Absent)
    );
}

#[tokio::test]
async fn reconfirming_does_not_move_placed_player() {
    let keeper = roster_player("Keeper", 1, "PORTERO");
    let h = harness(FakeAttendanceApi::new(vec![keeper.clone()], None), UserRole::Admin);

    h.synchronizer
        .confirm_attendance(h.match_id, keeper.id, AttendanceStatus::Confirmed)
        .await
        .expect("confirm");
    h.synchronizer.lineup().with(|s| {
        s.place_player(
            keeper.id,
            lineup_backend::lineup::SlotPosition::Por,
            lineup_backend::lineup::SlotPosition::Bench,
            0,
        )
    });

    let confirmation = h
        .synchronizer
        .confirm_attendance(h.match_id, keeper.id, AttendanceStatus::Confirmed)
        .await
        .expect("reconfirm");

    assert_eq!(confirmation.placement, None);
    assert_eq!(
        h.synchronizer.lineup().read(|s| s.find_player_position(&keeper.id)),
        Some(SlotLocation::bench())
    );
}

#[tokio::test]
async fn roster_is_read_when_write_result_has_no_player() {
    let mid = roster_player("Mid", 6, "mediocentro");
    let api = FakeAttendanceApi::new(vec![mid.clone()], None);
    api.omit_player_in_writes();
    let h = harness(api, UserRole::Admin);

    let confirmation = h
        .synchronizer
        .confirm_attendance(h.match_id, mid.id, AttendanceStatus::Confirmed)
        .await
        .expect("confirm");

    assert_eq!(h.api.roster_reads(), 1);
    assert_eq!(confirmation.placement, Some(SlotLocation::field(FieldPosition::Med, 0)));
}

#[tokio::test]
async fn attendance_list_is_refetched_after_write() {
    let mid = roster_player("Mid", 6, "MEDIOCENTRO");
    let h = harness(FakeAttendanceApi::new(vec![mid.clone()], None), UserRole::Admin);

    h.synchronizer
        .confirm_attendance(h.match_id, mid.id, AttendanceStatus::Pending)
        .await
        .expect("write");

    for _ in 0..100 {
        if h.api.list_reads() > 0 && !h.synchronizer.cache().is_stale(&h.match_id) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(h.api.list_reads(), 1);
    assert_eq!(h.synchronizer.cache().get(&h.match_id), Some(h.api.records()));
}

#[tokio::test]
async fn lineup_bound_to_other_match_is_left_alone() {
    let striker = roster_player("Striker", 9, "DELANTERO");
    let h = harness(FakeAttendanceApi::new(vec![striker.clone()], None), UserRole::Admin);
    let other_match = Uuid::new_v4();

    let confirmation = h
        .synchronizer
        .confirm_attendance(other_match, striker.id, AttendanceStatus::Confirmed)
        .await
        .expect("confirm");

    assert_eq!(confirmation.placement, None);
    assert!(h.synchronizer.lineup().read(|s| s.attendances().is_empty()));
    assert_eq!(h.synchronizer.lineup().read(|s| s.lineup().player_count()), 0);
}
