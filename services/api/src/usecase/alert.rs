use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use autovault_domain::pagination::{PageRequest, Pagination};

use crate::domain::repository::{AlertRepository, RealtimeNotifier, SmsGateway, UserRepository};
use crate::domain::types::{Alert, Caller, Recipient};
use crate::error::ApiError;

pub const USER_ALERTS_LIMIT: u64 = 50;
pub const NEW_ALERT_EVENT: &str = "newAlert";

// ── SendAlert ────────────────────────────────────────────────────────────────

pub struct SendAlertInput {
    pub user_id: String,
    pub message: String,
}

/// Alert as returned to the sender and broadcast to listeners.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentAlert {
    #[serde(flatten)]
    pub alert: Alert,
    pub user_email: String,
}

/// Persist, optionally text, then broadcast an alert.
///
/// Only the initial insert can fail the request. The SMS attempt, the SMS
/// outcome write and the broadcast are each handled on their own and logged.
pub struct SendAlertUseCase<U, A, S, N>
where
    U: UserRepository,
    A: AlertRepository,
    S: SmsGateway,
    N: RealtimeNotifier,
{
    pub users: U,
    pub alerts: A,
    pub sms: S,
    pub notifier: N,
}

impl<U, A, S, N> SendAlertUseCase<U, A, S, N>
where
    U: UserRepository,
    A: AlertRepository,
    S: SmsGateway,
    N: RealtimeNotifier,
{
    pub async fn execute(
        &self,
        sender: &Caller,
        input: SendAlertInput,
    ) -> Result<SentAlert, ApiError> {
        let user_id = input.user_id.trim();
        if user_id.is_empty() || input.message.trim().is_empty() {
            return Err(ApiError::invalid("userId and message are required"));
        }
        let target = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let mut alert = Alert {
            id: Uuid::now_v7(),
            user_id: target.id.clone(),
            message: input.message,
            sent_by: sender.uid.clone(),
            sent_at: Utc::now(),
            read: false,
            read_at: None,
            sms_sent: false,
            sms_error: None,
        };
        self.alerts.create(&alert).await?;

        if let Some(phone) = target.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            let outcome = self.sms.send(phone, &alert.message).await;
            match outcome {
                Ok(receipt) => {
                    tracing::info!(
                        alert_id = %alert.id,
                        message_id = %receipt.message_id,
                        "alert SMS sent"
                    );
                    alert.sms_sent = true;
                }
                Err(e) => {
                    tracing::warn!(alert_id = %alert.id, error = %e, "alert SMS failed");
                    alert.sms_error = Some(e.to_string());
                }
            }
        }

        if let Err(e) = self
            .alerts
            .record_sms_outcome(alert.id, alert.sms_sent, alert.sms_error.as_deref())
            .await
        {
            tracing::error!(alert_id = %alert.id, error = %e, "failed to record SMS outcome");
        }

        let sent = SentAlert {
            alert,
            user_email: target.email,
        };
        self.publish(&sent);
        Ok(sent)
    }

    fn publish(&self, sent: &SentAlert) {
        let payload = match serde_json::to_value(sent) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(alert_id = %sent.alert.id, error = %e, "failed to encode alert event");
                return;
            }
        };
        match self.notifier.broadcast(NEW_ALERT_EVENT, payload) {
            Ok(listeners) => {
                tracing::debug!(alert_id = %sent.alert.id, listeners, "alert broadcast");
            }
            Err(e) => {
                tracing::error!(alert_id = %sent.alert.id, error = %e, "alert broadcast failed");
            }
        }
    }
}

// ── GetUserAlerts ────────────────────────────────────────────────────────────

pub struct GetUserAlertsUseCase<A: AlertRepository> {
    pub alerts: A,
}

impl<A: AlertRepository> GetUserAlertsUseCase<A> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Alert>, ApiError> {
        self.alerts
            .list_for_user(&caller.uid, USER_ALERTS_LIMIT)
            .await
    }
}

// ── MarkAlertRead ────────────────────────────────────────────────────────────

pub struct MarkAlertReadUseCase<A: AlertRepository> {
    pub alerts: A,
}

impl<A: AlertRepository> MarkAlertReadUseCase<A> {
    pub async fn execute(&self, caller: &Caller, alert_id: Uuid) -> Result<(), ApiError> {
        let alert = self
            .alerts
            .find_by_id(alert_id)
            .await?
            .ok_or(ApiError::AlertNotFound)?;
        if alert.user_id != caller.uid {
            return Err(ApiError::AlertAccessDenied);
        }
        if alert.read {
            return Ok(());
        }
        self.alerts.mark_read(alert_id, Utc::now()).await
    }
}

// ── GetAllAlerts ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AlertWithRecipient {
    #[serde(flatten)]
    pub alert: Alert,
    pub user: Option<Recipient>,
}

pub struct AlertPage {
    pub alerts: Vec<AlertWithRecipient>,
    pub pagination: Pagination,
}

pub struct GetAllAlertsUseCase<U: UserRepository, A: AlertRepository> {
    pub users: U,
    pub alerts: A,
}

impl<U: UserRepository, A: AlertRepository> GetAllAlertsUseCase<U, A> {
    pub async fn execute(&self, page: PageRequest) -> Result<AlertPage, ApiError> {
        let page = page.clamped();
        let alerts = self.alerts.list_page(page).await?;
        let total = self.alerts.count().await?;

        let mut ids: Vec<String> = alerts.iter().map(|a| a.user_id.clone()).collect();
        ids.sort();
        ids.dedup();
        let recipients: HashMap<String, Recipient> = self
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| {
                let name = if u.name.is_empty() { "N/A".to_owned() } else { u.name };
                (u.id, Recipient { email: u.email, name })
            })
            .collect();

        let alerts = alerts
            .into_iter()
            .map(|alert| {
                let user = recipients.get(&alert.user_id).cloned();
                AlertWithRecipient { alert, user }
            })
            .collect();
        Ok(AlertPage {
            alerts,
            pagination: Pagination::new(page, total),
        })
    }
}
