//! Game availability coordinator
//!
//! Sequences a reservation or a return across the ledger and the game record.
//! The steps are separate durable writes, not one transaction, so each
//! operation documents what state remains when a step fails:
//!
//! - `reserve`: the ledger insert happens first. If the game update then
//!   misses its condition the reservation is voided and `Conflict` is
//!   returned; if the update keeps failing it is retried up to
//!   `game_update_attempts` times, then the reservation is voided and
//!   `Persistence` is returned.
//! - `mark_returned`: the game is made available first, so it shows up as
//!   available even when completing the ledger row fails. That leaves a stale
//!   active row which only affects the borrower display; calling
//!   `mark_returned` again completes it.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::ReservationsConfig,
    error::{AppError, AppResult},
    models::{CreateReservation, DateRange, GameStatus, Reservation},
    repository::Repository,
};

use super::{ledger::ReservationLedger, notifications::NotificationService, status::derive_status};

#[derive(Clone)]
pub struct AvailabilityCoordinator {
    repository: Repository,
    ledger: ReservationLedger,
    notifications: NotificationService,
    config: ReservationsConfig,
}

impl AvailabilityCoordinator {
    pub fn new(
        repository: Repository,
        ledger: ReservationLedger,
        notifications: NotificationService,
        config: ReservationsConfig,
    ) -> Self {
        Self {
            repository,
            ledger,
            notifications,
            config,
        }
    }

    /// Reserve a game for the requested period and lend it out
    pub async fn reserve(&self, request: CreateReservation) -> AppResult<Reservation> {
        let game_id = request.game_id;
        let checked = ReservationLedger::validate(request.clone())?;
        let range = DateRange {
            from: checked.pickup_date,
            to: checked.return_date,
        };

        let now = Utc::now();
        let mut game = self
            .repository
            .games
            .get(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

        let status = derive_status(&game, now);
        if status != GameStatus::Available {
            return Err(AppError::Conflict(format!(
                "Game '{}' is currently {}",
                game.title, status
            )));
        }

        let reservation = self.ledger.create(request).await?;

        let until = range.borrowed_until();
        if let Err(e) = self.lend_out(game_id, until, now).await {
            self.compensate(&reservation).await;
            return Err(e);
        }

        game.status = GameStatus::Borrowed;
        game.borrowed_until = Some(until);
        tracing::info!(
            game_id = %game_id,
            reservation_id = %reservation.id,
            borrowed_until = %until,
            "Game reserved"
        );

        self.notifications
            .send_reservation_confirmation(&reservation, &game)
            .await;

        Ok(reservation)
    }

    /// Mark a game as returned. Idempotent: returning an available game is
    /// not an error.
    pub async fn mark_returned(&self, game_id: Uuid) -> AppResult<u64> {
        if !self.repository.games.mark_available(game_id).await? {
            return Err(AppError::NotFound(format!("Game {} not found", game_id)));
        }

        let completed = self
            .ledger
            .complete_active_for_game(game_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    game_id = %game_id,
                    error = %e,
                    "Game is available but its reservation is still active"
                );
                e
            })?;

        tracing::info!(game_id = %game_id, completed, "Game returned");
        Ok(completed)
    }

    /// Conditional game update, retried on store failures
    async fn lend_out(
        &self,
        game_id: Uuid,
        until: chrono::DateTime<Utc>,
        now: chrono::DateTime<Utc>,
    ) -> AppResult<()> {
        let attempts = self.config.game_update_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.repository.games.mark_borrowed(game_id, until, now).await {
                Ok(true) => return Ok(()),
                Ok(false) => {
                    return Err(AppError::Conflict(
                        "The game was booked or withdrawn while reserving".to_string(),
                    ))
                }
                Err(e) => {
                    tracing::warn!(
                        game_id = %game_id,
                        attempt,
                        attempts,
                        error = %e,
                        "Game update failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::Persistence("Game update failed".to_string())))
    }

    /// Void a reservation whose game could not be lent out
    async fn compensate(&self, reservation: &Reservation) {
        match self.ledger.void(reservation.id).await {
            Ok(_) => tracing::warn!(
                reservation_id = %reservation.id,
                game_id = %reservation.game_id,
                "Reservation voided after failed game update"
            ),
            Err(e) => tracing::error!(
                reservation_id = %reservation.id,
                game_id = %reservation.game_id,
                error = %e,
                "Could not void reservation; it remains active"
            ),
        }
    }
}
