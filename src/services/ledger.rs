//! Reservation ledger: owns the reservation records and their
//! `active -> completed` transition

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CreateReservation, NewReservation, Reservation},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationLedger {
    repository: Repository,
}

impl ReservationLedger {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check reservation input independently of any client-side gate
    pub fn validate(request: CreateReservation) -> AppResult<NewReservation> {
        let borrower_name = request.borrower_name.trim().to_string();
        if borrower_name.is_empty() {
            return Err(AppError::Validation("Borrower name is required".to_string()));
        }
        let borrower_email = request.borrower_email.trim().to_string();
        if borrower_email.is_empty() {
            return Err(AppError::Validation("Borrower email is required".to_string()));
        }
        let pickup_date = request
            .pickup_date
            .ok_or_else(|| AppError::Validation("Pickup date is required".to_string()))?;
        let return_date = request
            .return_date
            .ok_or_else(|| AppError::Validation("Return date is required".to_string()))?;
        if pickup_date > return_date {
            return Err(AppError::Validation(format!(
                "Pickup date {} is after return date {}",
                pickup_date, return_date
            )));
        }

        Ok(NewReservation {
            game_id: request.game_id,
            borrower_name,
            borrower_email,
            pickup_date,
            return_date,
            message: request.message.filter(|m| !m.trim().is_empty()),
        })
    }

    /// Create an active reservation (one durable write)
    pub async fn create(&self, request: CreateReservation) -> AppResult<Reservation> {
        let new = Self::validate(request)?;
        let reservation = self
            .repository
            .reservations
            .insert(new.into_reservation(Utc::now()))
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            game_id = %reservation.game_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Complete the active reservation(s) of a game. Zero rows affected is
    /// not an error: the game was already returned.
    pub async fn complete_active_for_game(&self, game_id: Uuid) -> AppResult<u64> {
        let affected = self
            .repository
            .reservations
            .complete_active_for_game(game_id)
            .await?;

        if affected == 0 {
            tracing::debug!(game_id = %game_id, "No active reservation to complete");
        } else {
            tracing::info!(game_id = %game_id, affected, "Reservations completed");
        }
        Ok(affected)
    }

    /// Void a reservation that could not be honoured
    pub async fn void(&self, reservation_id: Uuid) -> AppResult<bool> {
        self.repository.reservations.complete(reservation_id).await
    }

    /// Active reservation per game; absent keys mean none
    pub async fn list_active_by_game_ids(
        &self,
        game_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Reservation>> {
        let rows = self
            .repository
            .reservations
            .list_active_by_game_ids(game_ids)
            .await?;
        Ok(rows.into_iter().map(|r| (r.game_id, r)).collect())
    }

    pub async fn list_for_game(&self, game_id: Uuid) -> AppResult<Vec<Reservation>> {
        self.repository.reservations.list_for_game(game_id).await
    }

    pub async fn count_for_game(&self, game_id: Uuid) -> AppResult<i64> {
        self.repository.reservations.count_for_game(game_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> CreateReservation {
        CreateReservation {
            game_id: Uuid::new_v4(),
            borrower_name: "Alice".to_string(),
            borrower_email: "alice@x.com".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            return_date: NaiveDate::from_ymd_opt(2025, 6, 5),
            message: Some(String::new()),
        }
    }

    #[test]
    fn test_valid_request() {
        let new = ReservationLedger::validate(request()).unwrap();
        assert_eq!(new.borrower_name, "Alice");
        assert_eq!(new.message, None);
    }

    #[test]
    fn test_same_day_borrow_is_valid() {
        let mut r = request();
        r.return_date = r.pickup_date;
        assert!(ReservationLedger::validate(r).is_ok());
    }

    #[test]
    fn test_rejects_blank_borrower() {
        let mut r = request();
        r.borrower_name = "   ".to_string();
        assert!(matches!(ReservationLedger::validate(r), Err(AppError::Validation(_))));

        let mut r = request();
        r.borrower_email = String::new();
        assert!(matches!(ReservationLedger::validate(r), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_missing_dates() {
        let mut r = request();
        r.pickup_date = None;
        assert!(matches!(ReservationLedger::validate(r), Err(AppError::Validation(_))));

        let mut r = request();
        r.return_date = None;
        assert!(matches!(ReservationLedger::validate(r), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let mut r = request();
        r.pickup_date = NaiveDate::from_ymd_opt(2025, 6, 6);
        assert!(matches!(ReservationLedger::validate(r), Err(AppError::Validation(_))));
    }
}
