use anyhow::Context as _;

use crate::infra::realtime::DEFAULT_CHANNEL_CAPACITY;
use crate::infra::sms::TwilioCredentials;

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret bearer credentials are signed with. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Required `aud` claim, if any. Env var: `JWT_AUDIENCE`.
    pub jwt_audience: Option<String>,
    /// TCP port for the HTTP server (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_phone_number: Option<String>,
    /// Places search key. Env var: `GOOGLE_MAPS_API_KEY`.
    pub google_maps_api_key: Option<String>,
    /// Buffered events per realtime subscriber (default 256).
    pub realtime_channel_capacity: usize,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL")?,
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET")?,
            jwt_audience: optional("JWT_AUDIENCE"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            twilio_account_sid: optional("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: optional("TWILIO_AUTH_TOKEN"),
            twilio_phone_number: optional("TWILIO_PHONE_NUMBER"),
            google_maps_api_key: optional("GOOGLE_MAPS_API_KEY"),
            realtime_channel_capacity: std::env::var("REALTIME_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
        })
    }

    /// All three Twilio settings, or `None` if any is missing.
    pub fn twilio_credentials(&self) -> Option<TwilioCredentials> {
        Some(TwilioCredentials {
            account_sid: self.twilio_account_sid.clone()?,
            auth_token: self.twilio_auth_token.clone()?,
            from_number: self.twilio_phone_number.clone()?,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
