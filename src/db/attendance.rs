use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::attendance::{AttendanceRecord, AttendanceStatus};

fn record_from_row(row: &PgRow) -> Result<AttendanceRecord, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<AttendanceStatus>()
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(AttendanceRecord {
        id: row.try_get("id")?,
        match_id: row.try_get("match_id")?,
        player_id: row.try_get("player_id")?,
        user_id: row.try_get("user_id")?,
        status,
        confirmed_at: row.try_get::<Option<DateTime<Utc>>, _>("confirmed_at")?,
    })
}

/// Whether the match exists and belongs to the organization.
pub async fn match_in_organization(
    pool: &PgPool,
    organization_id: Uuid,
    match_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM matches WHERE id = $1 AND organization_id = $2
        ) AS found
        "#,
    )
    .bind(match_id)
    .bind(organization_id)
    .fetch_one(pool)
    .await?;

    row.try_get("found")
}

pub async fn list_attendance(
    pool: &PgPool,
    match_id: Uuid,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT ma.id, ma.match_id, ma.player_id, p.user_id, ma.status, ma.confirmed_at
        FROM match_attendances ma
        INNER JOIN players p ON p.id = ma.player_id
        WHERE ma.match_id = $1
        ORDER BY p.jersey_number ASC
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Insert or update a player's attendance. `confirmed_at` is stamped when the
/// status becomes confirmed and cleared otherwise.
pub async fn upsert_attendance(
    pool: &PgPool,
    match_id: Uuid,
    player_id: Uuid,
    status: AttendanceStatus,
) -> Result<AttendanceRecord, sqlx::Error> {
    let row = sqlx::query(
        r#"
        WITH upserted AS (
            INSERT INTO match_attendances (id, match_id, player_id, status, confirmed_at, updated_at)
            VALUES ($1, $2, $3, $4, CASE WHEN $4 = 'confirmed' THEN NOW() END, NOW())
            ON CONFLICT (match_id, player_id)
            DO UPDATE SET
                status = EXCLUDED.status,
                confirmed_at = CASE
                    WHEN EXCLUDED.status = 'confirmed' THEN COALESCE(match_attendances.confirmed_at, NOW())
                END,
                updated_at = NOW()
            RETURNING id, match_id, player_id, status, confirmed_at
        )
        SELECT u.id, u.match_id, u.player_id, p.user_id, u.status, u.confirmed_at
        FROM upserted u
        INNER JOIN players p ON p.id = u.player_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(match_id)
    .bind(player_id)
    .bind(status.as_str())
    .fetch_one(pool)
    .await?;

    record_from_row(&row)
}
