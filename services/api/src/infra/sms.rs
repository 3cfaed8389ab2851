use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::domain::repository::SmsGateway;
use crate::domain::types::{SmsError, SmsReceipt};

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

/// SMS gateway backed by the Twilio Messages REST API.
///
/// Without credentials every send fails with [`SmsError::NotConfigured`];
/// the service still starts.
#[derive(Clone)]
pub struct TwilioSmsGateway {
    client: reqwest::Client,
    credentials: Option<Arc<TwilioCredentials>>,
    base_url: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    sid: String,
    status: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

impl TwilioSmsGateway {
    pub fn new(client: reqwest::Client, credentials: Option<TwilioCredentials>) -> Self {
        Self::with_base_url(client, credentials, TWILIO_API_BASE)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        credentials: Option<TwilioCredentials>,
        base_url: impl Into<String>,
    ) -> Self {
        if credentials.is_none() {
            tracing::warn!("Twilio credentials not configured, SMS delivery disabled");
        }
        Self {
            client,
            credentials: credentials.map(Arc::new),
            base_url: base_url.into(),
        }
    }
}

impl SmsGateway for TwilioSmsGateway {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        let creds = self.credentials.as_ref().ok_or(SmsError::NotConfigured)?;
        if to.trim().is_empty() || body.is_empty() {
            return Err(SmsError::EmptyMessage);
        }
        let to = to_e164(to).ok_or_else(|| SmsError::InvalidRecipient(to.to_owned()))?;

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            creds.account_sid
        );
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("To", &to)
            .append_pair("From", &creds.from_number)
            .append_pair("Body", body)
            .finish();

        let resp = self
            .client
            .post(&url)
            .basic_auth(&creds.account_sid, Some(&creds.auth_token))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("gateway returned {status}"));
            return Err(SmsError::Rejected(message));
        }
        let msg: MessageResponse = resp
            .json()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;
        Ok(SmsReceipt {
            message_id: msg.sid,
            to,
            status: msg.status,
        })
    }
}

/// Normalise to E.164. Numbers already starting with `+` pass through;
/// anything else is read as a North American number.
pub fn to_e164(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with('+') {
        return Some(raw.to_owned());
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("+1{digits}"))
}
