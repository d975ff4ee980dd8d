//! Reservations repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::ReservationStore;
use crate::{
    error::AppResult,
    models::{Reservation, ReservationStatus},
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationsRepository {
    async fn insert(&self, reservation: Reservation) -> AppResult<Reservation> {
        // A second active row for the same game violates the partial unique
        // index and comes back as AppError::Conflict.
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, game_id, borrower_name, borrower_email, pickup_date,
                return_date, message, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.game_id)
        .bind(&reservation.borrower_name)
        .bind(&reservation.borrower_email)
        .bind(reservation.pickup_date)
        .bind(reservation.return_date)
        .bind(&reservation.message)
        .bind(reservation.status)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn complete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE reservations SET status = $2, updated_at = $3 WHERE id = $1 AND status = $4",
        )
        .bind(id)
        .bind(ReservationStatus::Completed)
        .bind(Utc::now())
        .bind(ReservationStatus::Active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete_active_for_game(&self, game_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE reservations SET status = $2, updated_at = $3 WHERE game_id = $1 AND status = $4",
        )
        .bind(game_id)
        .bind(ReservationStatus::Completed)
        .bind(Utc::now())
        .bind(ReservationStatus::Active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_active_by_game_ids(&self, game_ids: &[Uuid]) -> AppResult<Vec<Reservation>> {
        if game_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE game_id = ANY($1) AND status = $2",
        )
        .bind(game_ids)
        .bind(ReservationStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_for_game(&self, game_id: Uuid) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE game_id = $1 ORDER BY created_at DESC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_for_game(&self, game_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE game_id = $1")
            .bind(game_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
