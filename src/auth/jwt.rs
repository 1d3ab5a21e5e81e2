use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::middleware::auth::Claims;
use crate::models::user::{UserRole, UserStatus};

/// Identity to embed in an access token.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub organization_id: Uuid,
}

/// Sign an HS256 access token for `subject` valid for the configured number of hours.
pub fn issue_token(
    settings: &JwtSettings,
    subject: &TokenSubject,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::hours(settings.expiration_hours);

    let claims = Claims {
        sub: subject.user_id.to_string(),
        username: subject.username.clone(),
        role: subject.role,
        status: subject.status,
        organization_id: subject.organization_id,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.expose_secret().as_bytes()),
    )
}
