//! Best-effort reservation notifications with an append-only delivery log

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{email_log::RESERVATION_CONFIRMATION, DeliveryStatus, EmailLog, Game, Reservation},
    repository::Repository,
};

use super::email::ReservationNotifier;

#[derive(Clone)]
pub struct NotificationService {
    repository: Repository,
    notifier: Arc<dyn ReservationNotifier>,
}

impl NotificationService {
    pub fn new(repository: Repository, notifier: Arc<dyn ReservationNotifier>) -> Self {
        Self { repository, notifier }
    }

    /// Send the confirmation and record the outcome. Never fails: delivery
    /// errors end up in the log, not in the booking flow.
    pub async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
        game: &Game,
    ) -> DeliveryStatus {
        let (status, error_message) = match self
            .notifier
            .send_reservation_confirmation(reservation, game)
            .await
        {
            Ok(()) => {
                tracing::info!(reservation_id = %reservation.id, "Reservation confirmation sent");
                (DeliveryStatus::Sent, None)
            }
            Err(e) => {
                tracing::warn!(
                    reservation_id = %reservation.id,
                    error = %e,
                    "Reservation confirmation not delivered"
                );
                (DeliveryStatus::Failed, Some(e.to_string()))
            }
        };

        let entry = EmailLog::new(
            Some(reservation.id),
            &reservation.borrower_email,
            RESERVATION_CONFIRMATION,
            status,
            error_message,
        );
        if let Err(e) = self.repository.email_logs.append(entry).await {
            tracing::warn!(reservation_id = %reservation.id, error = %e, "Failed to record email log");
        }

        status
    }

    /// Most recent delivery records
    pub async fn list_logs(&self, limit: i64) -> AppResult<Vec<EmailLog>> {
        self.repository.email_logs.list(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, repository::MemoryStore};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    struct FailingNotifier;

    #[async_trait]
    impl ReservationNotifier for FailingNotifier {
        async fn send_reservation_confirmation(&self, _: &Reservation, _: &Game) -> AppResult<()> {
            Err(AppError::Notification("SMTP unreachable".to_string()))
        }
    }

    struct OkNotifier;

    #[async_trait]
    impl ReservationNotifier for OkNotifier {
        async fn send_reservation_confirmation(&self, _: &Reservation, _: &Game) -> AppResult<()> {
            Ok(())
        }
    }

    fn fixtures() -> (Reservation, Game) {
        let now = Utc::now();
        let game = Game {
            id: Uuid::new_v4(),
            title: "Catan".to_string(),
            description: None,
            image_url: None,
            min_players: None,
            max_players: None,
            play_time: None,
            recommended_age: None,
            complexity_rating: None,
            status: crate::models::GameStatus::Borrowed,
            condition_notes: None,
            borrowed_until: None,
            created_at: now,
            updated_at: now,
        };
        let reservation = crate::models::NewReservation {
            game_id: game.id,
            borrower_name: "Alice".to_string(),
            borrower_email: "alice@x.com".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            message: None,
        }
        .into_reservation(now);
        (reservation, game)
    }

    #[tokio::test]
    async fn test_failure_is_recorded_not_raised() {
        let repository = Repository::in_memory(MemoryStore::new());
        let service = NotificationService::new(repository, Arc::new(FailingNotifier));
        let (reservation, game) = fixtures();

        let status = service.send_reservation_confirmation(&reservation, &game).await;
        assert_eq!(status, DeliveryStatus::Failed);

        let logs = service.list_logs(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, DeliveryStatus::Failed);
        assert_eq!(logs[0].recipient, "alice@x.com");
        assert!(logs[0].error_message.as_deref().unwrap().contains("SMTP unreachable"));
    }

    #[tokio::test]
    async fn test_success_is_recorded() {
        let repository = Repository::in_memory(MemoryStore::new());
        let service = NotificationService::new(repository, Arc::new(OkNotifier));
        let (reservation, game) = fixtures();

        let status = service.send_reservation_confirmation(&reservation, &game).await;
        assert_eq!(status, DeliveryStatus::Sent);

        let logs = service.list_logs(10).await.unwrap();
        assert_eq!(logs[0].reservation_id, Some(reservation.id));
        assert_eq!(logs[0].email_type, RESERVATION_CONFIRMATION);
        assert!(logs[0].error_message.is_none());
    }
}
