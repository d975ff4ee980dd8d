//! Notification audit log endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppResult, models::EmailLog, AppState};

use super::AdminUser;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailLogQuery {
    /// Maximum number of entries (default 100, max 500)
    pub limit: Option<i64>,
}

/// Recent notification delivery attempts
#[utoipa::path(
    get,
    path = "/email-logs",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(EmailLogQuery),
    responses(
        (status = 200, description = "Delivery log, newest first", body = Vec<EmailLog>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_email_logs(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<EmailLogQuery>,
) -> AppResult<Json<Vec<EmailLog>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let logs = state.services.notifications.list_logs(limit).await?;
    Ok(Json(logs))
}
