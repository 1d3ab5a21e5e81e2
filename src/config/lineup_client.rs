use std::time::Duration;
use serde::Deserialize;

/// Where the lineup editor reaches the attendance API.
#[derive(Debug, Deserialize, Clone)]
pub struct LineupClientSettings {
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl LineupClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
