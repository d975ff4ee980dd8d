//! Notification audit log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::DeliveryStatus;

pub const RESERVATION_CONFIRMATION: &str = "reservation_confirmation";

/// Append-only record of a delivery attempt
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmailLog {
    pub id: Uuid,
    pub reservation_id: Option<Uuid>,
    pub recipient: String,
    pub email_type: String,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl EmailLog {
    pub fn new(
        reservation_id: Option<Uuid>,
        recipient: &str,
        email_type: &str,
        status: DeliveryStatus,
        error_message: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reservation_id,
            recipient: recipient.to_string(),
            email_type: email_type.to_string(),
            status,
            error_message,
            sent_at: Utc::now(),
        }
    }
}
