use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::config::lineup_client::LineupClientSettings;
use crate::models::attendance::{AttendanceRecord, AttendanceWriteRequest, AttendanceWriteResult};
use crate::models::common::{error_codes, ApiResponse};
use crate::models::player::RosterPlayer;
use crate::sync::api::{AttendanceApi, RosterProvider};
use crate::sync::error::SyncError;

/// REST client for the attendance and roster endpoints, authenticated with
/// the signed-in user's bearer token.
pub struct AttendanceHttpClient {
    base_url: String,
    token: SecretString,
    client: Client,
}

impl AttendanceHttpClient {
    pub fn new(settings: &LineupClientSettings, token: SecretString) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.token.expose_secret())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SyncError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();

        if status.is_success() {
            let body: ApiResponse<T> = response.json().await?;
            return body
                .data
                .ok_or_else(|| SyncError::UnexpectedResponse(format!("missing data: {}", body.message)));
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text).ok();
        Err(error_for_status(status, body, text))
    }
}

fn error_for_status(
    status: StatusCode,
    body: Option<ApiResponse<serde_json::Value>>,
    text: String,
) -> SyncError {
    let code = body.as_ref().and_then(|b| b.error.clone());
    let message = body.map(|b| b.message).unwrap_or(text);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SyncError::Unauthorized(message),
        StatusCode::NOT_FOUND if code.as_deref() == Some(error_codes::PLAYER_PROFILE_MISSING) => {
            SyncError::PlayerProfileMissing
        }
        _ => SyncError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl AttendanceApi for AttendanceHttpClient {
    async fn list_attendance(&self, match_id: Uuid) -> Result<Vec<AttendanceRecord>, SyncError> {
        let url = format!("{}/matches/{}/attendance", self.base_url, match_id);
        tracing::debug!("Fetching attendance from {}", url);
        self.send(self.client.get(&url)).await
    }

    async fn set_own_attendance(
        &self,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError> {
        let url = format!("{}/matches/{}/attendance", self.base_url, request.match_id);
        self.send(self.client.post(&url).json(&json!({ "status": request.status })))
            .await
    }

    async fn set_player_attendance(
        &self,
        request: &AttendanceWriteRequest,
    ) -> Result<AttendanceWriteResult, SyncError> {
        let player_id = request.player_id.ok_or_else(|| SyncError::Rejected {
            status: StatusCode::BAD_REQUEST.as_u16(),
            message: "player_id is required to set another player's attendance".to_string(),
        })?;
        let url = format!("{}/admin/matches/{}/attendance", self.base_url, request.match_id);
        self.send(
            self.client
                .post(&url)
                .json(&json!({ "player_id": player_id, "status": request.status })),
        )
        .await
    }
}

#[async_trait]
impl RosterProvider for AttendanceHttpClient {
    async fn list_players(&self) -> Result<Vec<RosterPlayer>, SyncError> {
        let url = format!("{}/players", self.base_url);
        self.send(self.client.get(&url)).await
    }
}
