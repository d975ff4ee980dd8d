//! Borrow request intake: the local gate in front of the coordinator.
//!
//! Rejected requests never reach the coordinator. The ledger re-validates on
//! its own, since a non-standard client can skip this gate.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    error::{AppError, AppResult},
    models::CreateReservation,
};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Borrow form as submitted by a visitor
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BorrowRequest {
    #[validate(custom(function = "not_blank"))]
    pub borrower_name: String,
    #[validate(custom(function = "not_blank"))]
    pub borrower_email: String,
    #[validate(required(message = "Pickup date is required"))]
    pub pickup_date: Option<NaiveDate>,
    #[validate(required(message = "Return date is required"))]
    pub return_date: Option<NaiveDate>,
    pub message: Option<String>,
}

impl BorrowRequest {
    /// Validate the form against `today`
    pub fn check(&self, today: NaiveDate) -> AppResult<()> {
        self.validate()?;

        if let (Some(pickup), Some(ret)) = (self.pickup_date, self.return_date) {
            if pickup < today {
                return Err(AppError::Validation(format!(
                    "Pickup date {} is in the past",
                    pickup
                )));
            }
            if pickup > ret {
                return Err(AppError::Validation(format!(
                    "Pickup date {} is after return date {}",
                    pickup, ret
                )));
            }
        }
        Ok(())
    }

    /// Whether the submit action is enabled
    pub fn can_submit(&self, today: NaiveDate) -> bool {
        self.check(today).is_ok()
    }

    pub fn into_reservation(self, game_id: Uuid) -> CreateReservation {
        CreateReservation {
            game_id,
            borrower_name: self.borrower_name,
            borrower_email: self.borrower_email,
            pickup_date: self.pickup_date,
            return_date: self.return_date,
            message: self.message,
        }
    }
}
