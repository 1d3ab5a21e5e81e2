use sqlx::PgPool;
use uuid::Uuid;

use crate::models::player::RosterPlayer;

pub async fn list_players(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<RosterPlayer>, sqlx::Error> {
    sqlx::query_as::<_, RosterPlayer>(
        r#"
        SELECT id, user_id, name, jersey_number, position, profile_image_url
        FROM players
        WHERE organization_id = $1
        ORDER BY jersey_number ASC, name ASC
        "#,
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn find_player(
    pool: &PgPool,
    organization_id: Uuid,
    player_id: Uuid,
) -> Result<Option<RosterPlayer>, sqlx::Error> {
    sqlx::query_as::<_, RosterPlayer>(
        r#"
        SELECT id, user_id, name, jersey_number, position, profile_image_url
        FROM players
        WHERE organization_id = $1 AND id = $2
        "#,
    )
    .bind(organization_id)
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

/// The player profile linked to a user account, if any.
pub async fn find_player_for_user(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<Option<RosterPlayer>, sqlx::Error> {
    sqlx::query_as::<_, RosterPlayer>(
        r#"
        SELECT id, user_id, name, jersey_number, position, profile_image_url
        FROM players
        WHERE organization_id = $1 AND user_id = $2
        "#,
    )
    .bind(organization_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
