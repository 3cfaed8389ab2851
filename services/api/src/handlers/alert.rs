use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use autovault_domain::pagination::Pagination;

use crate::domain::types::Alert;
use crate::error::ApiError;
use crate::handlers::{ApiJson, MessageResponse, PageQuery};
use crate::identity::{Authenticated, Elevated};
use crate::state::{AppState, Backend};
use crate::usecase::alert::{
    AlertWithRecipient, GetAllAlertsUseCase, GetUserAlertsUseCase, MarkAlertReadUseCase,
    SendAlertInput, SendAlertUseCase, SentAlert,
};

// ── POST /api/alerts ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAlertRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub message: String,
}

pub async fn send_alert<B: Backend>(
    Elevated(sender): Elevated,
    State(state): State<AppState<B>>,
    ApiJson(body): ApiJson<SendAlertRequest>,
) -> Result<(StatusCode, Json<SentAlert>), ApiError> {
    let usecase = SendAlertUseCase {
        users: state.users.clone(),
        alerts: state.alerts.clone(),
        sms: state.sms.clone(),
        notifier: state.realtime.clone(),
    };
    let sent = usecase
        .execute(
            &sender,
            SendAlertInput {
                user_id: body.user_id,
                message: body.message,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(sent)))
}

// ── GET /api/alerts ──────────────────────────────────────────────────────────

pub async fn get_my_alerts<B: Backend>(
    Authenticated(caller): Authenticated,
    State(state): State<AppState<B>>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    let usecase = GetUserAlertsUseCase {
        alerts: state.alerts.clone(),
    };
    Ok(Json(usecase.execute(&caller).await?))
}

// ── PUT /api/alerts/{id}/read ────────────────────────────────────────────────

pub async fn mark_alert_read<B: Backend>(
    Authenticated(caller): Authenticated,
    State(state): State<AppState<B>>,
    Path(alert_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // An id that cannot exist is reported the same as a missing one.
    let alert_id = alert_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::AlertNotFound)?;
    let usecase = MarkAlertReadUseCase {
        alerts: state.alerts.clone(),
    };
    usecase.execute(&caller, alert_id).await?;
    Ok(Json(MessageResponse {
        message: "Alert marked as read",
    }))
}

// ── GET /api/alerts/all ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AllAlertsResponse {
    pub alerts: Vec<AlertWithRecipient>,
    pub pagination: Pagination,
}

pub async fn get_all_alerts<B: Backend>(
    _caller: Elevated,
    State(state): State<AppState<B>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<AllAlertsResponse>, ApiError> {
    let usecase = GetAllAlertsUseCase {
        users: state.users.clone(),
        alerts: state.alerts.clone(),
    };
    let page = usecase.execute(query.to_page_request()).await?;
    Ok(Json(AllAlertsResponse {
        alerts: page.alerts,
        pagination: page.pagination,
    }))
}
