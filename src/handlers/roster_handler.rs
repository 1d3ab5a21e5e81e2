use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::roster;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::ok_or_return;

/// Roster of the caller's organization, ordered by jersey number
#[tracing::instrument(
    name = "Get roster",
    skip(pool, claims),
    fields(user = %claims.username, organization_id = %claims.organization_id)
)]
pub async fn get_roster(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let players = ok_or_return!(db_result(roster::list_players(&pool, claims.organization_id).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Roster retrieved successfully", players)))
}
