// src/routes/attendance.rs
use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::attendance_handler;
use crate::middleware::auth::Claims;
use crate::models::attendance::{SetOwnAttendanceRequest, SetPlayerAttendanceRequest};

/// Attendance list of a match
#[get("/{match_id}/attendance")]
async fn get_match_attendance(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    attendance_handler::get_match_attendance(match_id, pool, claims).await
}

/// Set the caller's own attendance
#[post("/{match_id}/attendance")]
async fn set_own_attendance(
    path: web::Path<Uuid>,
    request: web::Json<SetOwnAttendanceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    attendance_handler::set_own_attendance(match_id, request, pool, claims).await
}

/// Set any player's attendance (admin scope)
#[post("/{match_id}/attendance")]
async fn set_player_attendance(
    path: web::Path<Uuid>,
    request: web::Json<SetPlayerAttendanceRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    attendance_handler::set_player_attendance(match_id, request, pool, claims).await
}
