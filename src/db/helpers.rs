//! Helpers that turn database results into early-return error responses.
//!
//! ```ignore
//! let player = ok_or_return!(require_record(
//!     roster::find_player_for_user(pool, org_id, user_id).await,
//!     ApiResponse::<()>::error_with_code("No player profile", error_codes::PLAYER_PROFILE_MISSING),
//! ));
//! ```

use actix_web::HttpResponse;
use serde::Serialize;

use crate::models::common::ApiResponse;

/// Macro for handlers returning `Result<HttpResponse>`.
/// Converts a `DbResult<T>` to return `Ok(error_response)` on error.
#[macro_export]
macro_rules! ok_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(response) => return Ok(response),
        }
    };
}

/// Result type for database operations that return an HttpResponse on error
pub type DbResult<T> = Result<T, HttpResponse>;

fn database_error(e: sqlx::Error) -> HttpResponse {
    tracing::error!("Database error: {}", e);
    HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Database error"))
}

/// Unwrap an optional database result, answering 404 with `not_found_response` if None.
pub fn require_record<T, R: Serialize>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_response: R,
) -> DbResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(HttpResponse::NotFound().json(not_found_response)),
        Err(e) => Err(database_error(e)),
    }
}

/// Unwrap a database result, returning InternalServerError on error.
pub fn db_result<T>(result: Result<T, sqlx::Error>) -> DbResult<T> {
    result.map_err(database_error)
}
