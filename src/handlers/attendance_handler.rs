use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::attendance;
use crate::db::helpers::{db_result, require_record, DbResult};
use crate::db::roster;
use crate::middleware::auth::Claims;
use crate::models::attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceWriteResult, SetOwnAttendanceRequest,
    SetPlayerAttendanceRequest,
};
use crate::models::common::{error_codes, ApiResponse};
use crate::models::player::RosterPlayer;
use crate::ok_or_return;

/// Make sure the match belongs to the caller's organization.
async fn ensure_match_visible(pool: &PgPool, claims: &Claims, match_id: Uuid) -> DbResult<()> {
    let visible = db_result(
        attendance::match_in_organization(pool, claims.organization_id, match_id).await
    )?;
    if visible {
        Ok(())
    } else {
        Err(HttpResponse::NotFound().json(ApiResponse::<()>::error_with_code(
            "Match not found",
            error_codes::MATCH_NOT_FOUND,
        )))
    }
}

/// List the attendance records of a match
#[tracing::instrument(
    name = "Get match attendance",
    skip(pool, claims),
    fields(user = %claims.username)
)]
pub async fn get_match_attendance(
    match_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    ok_or_return!(ensure_match_visible(&pool, &claims, match_id).await);

    let records = ok_or_return!(db_result(attendance::list_attendance(&pool, match_id).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Attendance retrieved successfully",
        records,
    )))
}

/// Set the caller's own attendance for a match
#[tracing::instrument(
    name = "Set own attendance",
    skip(request, pool, claims),
    fields(user = %claims.username, status = %request.status)
)]
pub async fn set_own_attendance(
    match_id: Uuid,
    request: web::Json<SetOwnAttendanceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let user_id = match claims.user_id() {
        Some(id) => id,
        None => {
            tracing::error!("Invalid user ID in claims: {}", claims.sub);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid user ID")));
        }
    };

    ok_or_return!(ensure_match_visible(&pool, &claims, match_id).await);

    let player = ok_or_return!(require_record(
        roster::find_player_for_user(&pool, claims.organization_id, user_id).await,
        ApiResponse::<()>::error_with_code(
            "Your account is not linked to a player profile",
            error_codes::PLAYER_PROFILE_MISSING,
        ),
    ));

    let record = ok_or_return!(db_result(
        attendance::upsert_attendance(&pool, match_id, player.id, request.status).await
    ));
    tracing::info!("Player {} set own attendance for match {} to {}", player.id, match_id, request.status);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Attendance updated",
        written(record, player),
    )))
}

/// Set any player's attendance for a match (admin only)
#[tracing::instrument(
    name = "Set player attendance",
    skip(request, pool, claims),
    fields(admin = %claims.username, player_id = %request.player_id, status = %request.status)
)]
pub async fn set_player_attendance(
    match_id: Uuid,
    request: web::Json<SetPlayerAttendanceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    ok_or_return!(ensure_match_visible(&pool, &claims, match_id).await);

    let player = ok_or_return!(require_record(
        roster::find_player(&pool, claims.organization_id, request.player_id).await,
        ApiResponse::<()>::error_with_code("Player not found", error_codes::PLAYER_NOT_FOUND),
    ));

    let record = ok_or_return!(db_result(
        attendance::upsert_attendance(&pool, match_id, player.id, request.status).await
    ));
    tracing::info!("Admin {} set attendance of player {} for match {} to {}",
        claims.username, player.id, match_id, request.status);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Player attendance updated",
        written(record, player),
    )))
}

/// Attach the roster entry only when the player is now confirmed; that is the
/// only case where the caller places the player on the board.
fn written(record: AttendanceRecord, player: RosterPlayer) -> AttendanceWriteResult {
    let player = (record.status == AttendanceStatus::Confirmed).then_some(player);
    AttendanceWriteResult { attendance: record, player }
}
