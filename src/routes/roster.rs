// src/routes/roster.rs
use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::roster_handler;
use crate::middleware::auth::Claims;

/// Roster of the caller's organization
#[get("")]
async fn get_roster(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    roster_handler::get_roster(pool, claims).await
}
