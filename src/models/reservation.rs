//! Reservation model and related types

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::ReservationStatus;

/// Reservation record. Rows are never deleted; they only move from
/// `active` to `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub game_id: Uuid,
    pub borrower_name: String,
    pub borrower_email: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub message: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inclusive borrow period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Instant until which the game counts as borrowed: last second of the
    /// return day (UTC), so the return day itself is still lent out
    pub fn borrowed_until(&self) -> DateTime<Utc> {
        self.to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::seconds(1)
    }
}

/// Ledger input. Dates are optional so that missing values can be reported
/// as validation errors rather than rejected by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReservation {
    pub game_id: Uuid,
    pub borrower_name: String,
    pub borrower_email: String,
    pub pickup_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub message: Option<String>,
}

/// Fully checked reservation data, ready to be inserted
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub game_id: Uuid,
    pub borrower_name: String,
    pub borrower_email: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub message: Option<String>,
}

impl NewReservation {
    /// Materialize the row the store will hold
    pub fn into_reservation(self, now: DateTime<Utc>) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            game_id: self.game_id,
            borrower_name: self.borrower_name,
            borrower_email: self.borrower_email,
            pickup_date: self.pickup_date,
            return_date: self.return_date,
            message: self.message,
            status: ReservationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> DateRange {
        DateRange {
            from: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            to: NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
        }
    }

    #[test]
    fn test_borrowed_until_covers_the_whole_return_day() {
        let until = range((2025, 6, 1), (2025, 6, 5)).borrowed_until();

        assert_eq!(until, Utc.with_ymd_and_hms(2025, 6, 5, 23, 59, 59).unwrap());
        assert_eq!(until.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
    }

    #[test]
    fn test_same_day_borrow_lasts_until_midnight() {
        let until = range((2025, 12, 31), (2025, 12, 31)).borrowed_until();

        assert!(until > Utc.with_ymd_and_hms(2025, 12, 31, 18, 0, 0).unwrap());
        assert!(until < Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }
}
