//! In-process store, selected with `database.url = "memory://"`.
//!
//! Mirrors the PostgreSQL semantics that the services rely on: title
//! ordering, the conditional borrow write and the one-active-reservation
//! index.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EmailLogStore, GameStore, ReservationStore, RoleStore};
use crate::{
    error::{AppError, AppResult},
    models::{AppRole, EmailLog, Game, GameStatus, Reservation, ReservationStatus, UpdateGame},
};

#[derive(Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<Uuid, Game>>,
    reservations: RwLock<Vec<Reservation>>,
    roles: RwLock<HashSet<(Uuid, AppRole)>>,
    email_logs: RwLock<Vec<EmailLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a role, as the identity service would
    pub async fn grant_role(&self, user_id: Uuid, role: AppRole) {
        self.roles.write().await.insert((user_id, role));
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn list(&self, search: Option<String>) -> AppResult<Vec<Game>> {
        let games = self.games.read().await;
        let mut result: Vec<Game> = games
            .values()
            .filter(|g| search.as_deref().map(|t| g.matches_search(t)).unwrap_or(true))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(result)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Game>> {
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn insert(&self, game: Game) -> AppResult<Game> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(AppError::Persistence(format!("Duplicate game id {}", game.id)));
        }
        games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn update(&self, id: Uuid, data: &UpdateGame) -> AppResult<Option<Game>> {
        let mut games = self.games.write().await;
        let Some(game) = games.get_mut(&id) else {
            return Ok(None);
        };

        macro_rules! apply {
            ($field:ident) => {
                if let Some(ref val) = data.$field {
                    game.$field = val.clone().into();
                }
            };
        }

        apply!(title);
        apply!(description);
        apply!(image_url);
        apply!(min_players);
        apply!(max_players);
        apply!(play_time);
        apply!(recommended_age);
        apply!(complexity_rating);
        apply!(status);
        apply!(condition_notes);
        game.updated_at = Utc::now();

        Ok(Some(game.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.games.write().await.remove(&id).is_some())
    }

    async fn mark_borrowed(
        &self,
        id: Uuid,
        until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut games = self.games.write().await;
        let Some(game) = games.get_mut(&id) else {
            return Ok(false);
        };
        let lent_out = game.borrowed_until.map(|u| u >= now).unwrap_or(false);
        if game.status.is_administrative() || lent_out {
            return Ok(false);
        }
        game.status = GameStatus::Borrowed;
        game.borrowed_until = Some(until);
        game.updated_at = now;
        Ok(true)
    }

    async fn mark_available(&self, id: Uuid) -> AppResult<bool> {
        let mut games = self.games.write().await;
        let Some(game) = games.get_mut(&id) else {
            return Ok(false);
        };
        game.status = GameStatus::Available;
        game.borrowed_until = None;
        game.updated_at = Utc::now();
        Ok(true)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn insert(&self, reservation: Reservation) -> AppResult<Reservation> {
        if !self.games.read().await.contains_key(&reservation.game_id) {
            return Err(AppError::Persistence(format!(
                "Game {} referenced by reservation does not exist",
                reservation.game_id
            )));
        }

        let mut reservations = self.reservations.write().await;
        let has_active = reservations
            .iter()
            .any(|r| r.game_id == reservation.game_id && r.status == ReservationStatus::Active);
        if reservation.status == ReservationStatus::Active && has_active {
            return Err(AppError::Conflict(
                "This game already has an active reservation".to_string(),
            ));
        }
        reservations.push(reservation.clone());
        Ok(reservation)
    }

    async fn complete(&self, id: Uuid) -> AppResult<bool> {
        let mut reservations = self.reservations.write().await;
        match reservations
            .iter_mut()
            .find(|r| r.id == id && r.status == ReservationStatus::Active)
        {
            Some(r) => {
                r.status = ReservationStatus::Completed;
                r.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn complete_active_for_game(&self, game_id: Uuid) -> AppResult<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for r in self
            .reservations
            .write()
            .await
            .iter_mut()
            .filter(|r| r.game_id == game_id && r.status == ReservationStatus::Active)
        {
            r.status = ReservationStatus::Completed;
            r.updated_at = now;
            affected += 1;
        }
        Ok(affected)
    }

    async fn list_active_by_game_ids(&self, game_ids: &[Uuid]) -> AppResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .read()
            .await
            .iter()
            .filter(|r| r.status == ReservationStatus::Active && game_ids.contains(&r.game_id))
            .cloned()
            .collect())
    }

    async fn list_for_game(&self, game_id: Uuid) -> AppResult<Vec<Reservation>> {
        let mut rows: Vec<Reservation> = self
            .reservations
            .read()
            .await
            .iter()
            .filter(|r| r.game_id == game_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn count_for_game(&self, game_id: Uuid) -> AppResult<i64> {
        Ok(self
            .reservations
            .read()
            .await
            .iter()
            .filter(|r| r.game_id == game_id)
            .count() as i64)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> AppResult<bool> {
        Ok(self.roles.read().await.contains(&(user_id, role)))
    }
}

#[async_trait]
impl EmailLogStore for MemoryStore {
    async fn append(&self, entry: EmailLog) -> AppResult<()> {
        self.email_logs.write().await.push(entry);
        Ok(())
    }

    async fn list(&self, limit: i64) -> AppResult<Vec<EmailLog>> {
        let logs = self.email_logs.read().await;
        Ok(logs
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(title: &str, description: Option<&str>) -> Game {
        let now = Utc::now();
        Game {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(str::to_string),
            image_url: None,
            min_players: None,
            max_players: None,
            play_time: None,
            recommended_age: None,
            complexity_rating: None,
            status: GameStatus::Available,
            condition_notes: None,
            borrowed_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn reservation(game_id: Uuid) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: Uuid::new_v4(),
            game_id,
            borrower_name: "Alice".to_string(),
            borrower_email: "alice@x.com".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            message: None,
            status: ReservationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_filtered() {
        let store = MemoryStore::new();
        GameStore::insert(&store, game("ticket to Ride", Some("Trains"))).await.unwrap();
        GameStore::insert(&store, game("Catan", Some("Trade and build"))).await.unwrap();
        GameStore::insert(&store, game("Azul", None)).await.unwrap();

        let titles: Vec<String> = GameStore::list(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, vec!["Azul", "Catan", "ticket to Ride"]);

        let hits = GameStore::list(&store, Some("TRA".to_string())).await.unwrap();
        let titles: Vec<&str> = hits.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Catan", "ticket to Ride"]);
    }

    #[tokio::test]
    async fn test_second_active_reservation_conflicts() {
        let store = MemoryStore::new();
        let g = GameStore::insert(&store, game("Catan", None)).await.unwrap();

        ReservationStore::insert(&store, reservation(g.id)).await.unwrap();
        let err = ReservationStore::insert(&store, reservation(g.id)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        assert_eq!(store.complete_active_for_game(g.id).await.unwrap(), 1);
        ReservationStore::insert(&store, reservation(g.id)).await.unwrap();
        assert_eq!(store.count_for_game(g.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mark_borrowed_is_conditional() {
        let store = MemoryStore::new();
        let mut g = game("Catan", None);
        g.status = GameStatus::Maintenance;
        let g = GameStore::insert(&store, g).await.unwrap();
        let now = Utc::now();

        assert!(!store.mark_borrowed(g.id, now, now).await.unwrap());

        store.mark_available(g.id).await.unwrap();
        let until = now + chrono::Duration::days(3);
        assert!(store.mark_borrowed(g.id, until, now).await.unwrap());
        assert!(!store.mark_borrowed(g.id, until, now).await.unwrap());
    }

    #[tokio::test]
    async fn test_roles_are_per_user_and_role() {
        let store = MemoryStore::new();
        let admin = Uuid::new_v4();
        store.grant_role(admin, AppRole::Admin).await;
        store.grant_role(admin, AppRole::Admin).await;

        assert!(store.has_role(admin, AppRole::Admin).await.unwrap());
        assert!(!store.has_role(admin, AppRole::User).await.unwrap());
        assert!(!store.has_role(Uuid::new_v4(), AppRole::Admin).await.unwrap());
    }
}
