//! Catalog service: read path for visitors and the admin game editor

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, CreateGame, Game, GameQuery, GameStatus, UpdateGame},
    repository::Repository,
};

use super::{ledger::ReservationLedger, status::derive_status};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    ledger: ReservationLedger,
}

/// Booking states belong to the availability coordinator
fn check_admin_status(status: Option<GameStatus>) -> AppResult<()> {
    match status {
        Some(s @ (GameStatus::Borrowed | GameStatus::Reserved)) => Err(AppError::Validation(
            format!("Status '{}' is managed by reservations and cannot be set directly", s),
        )),
        _ => Ok(()),
    }
}

impl CatalogService {
    pub fn new(repository: Repository, ledger: ReservationLedger) -> Self {
        Self { repository, ledger }
    }

    /// List games with their derived status. Active reservations are only
    /// joined in when `include_borrowers` is set (admin view).
    pub async fn list_games(
        &self,
        query: &GameQuery,
        include_borrowers: bool,
    ) -> AppResult<Vec<CatalogEntry>> {
        self.list_games_at(query, include_borrowers, Utc::now()).await
    }

    /// Same as `list_games`, deriving status at the given instant
    pub async fn list_games_at(
        &self,
        query: &GameQuery,
        include_borrowers: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<CatalogEntry>> {
        let games = self
            .repository
            .games
            .list(query.term().map(str::to_string))
            .await?;

        let mut active = if include_borrowers {
            let ids: Vec<Uuid> = games.iter().map(|g| g.id).collect();
            self.ledger.list_active_by_game_ids(&ids).await?
        } else {
            Default::default()
        };

        Ok(games
            .into_iter()
            .map(|game| CatalogEntry {
                derived_status: derive_status(&game, now),
                active_reservation: active.remove(&game.id),
                game,
            })
            .collect())
    }

    /// Get a stored game record
    pub async fn get_game(&self, id: Uuid) -> AppResult<Game> {
        self.repository
            .games
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", id)))
    }

    /// Get a single game as the catalog presents it
    pub async fn get_entry(&self, id: Uuid, include_borrowers: bool) -> AppResult<CatalogEntry> {
        let game = self.get_game(id).await?;
        let active_reservation = if include_borrowers {
            self.ledger.list_active_by_game_ids(&[id]).await?.remove(&id)
        } else {
            None
        };
        Ok(CatalogEntry {
            derived_status: derive_status(&game, Utc::now()),
            active_reservation,
            game,
        })
    }

    /// Add a game to the catalog
    pub async fn create_game(&self, data: CreateGame) -> AppResult<Game> {
        data.validate()?;
        check_admin_status(data.status)?;

        let now = Utc::now();
        let game = Game {
            id: Uuid::new_v4(),
            title: data.title.trim().to_string(),
            description: data.description,
            image_url: data.image_url,
            min_players: data.min_players,
            max_players: data.max_players,
            play_time: data.play_time,
            recommended_age: data.recommended_age,
            complexity_rating: data.complexity_rating,
            status: data.status.unwrap_or_default(),
            condition_notes: data.condition_notes,
            borrowed_until: None,
            created_at: now,
            updated_at: now,
        };

        let game = self.repository.games.insert(game).await?;
        tracing::info!(game_id = %game.id, title = %game.title, "Game created");
        Ok(game)
    }

    /// Edit a game's descriptive fields or administrative status
    pub async fn update_game(&self, id: Uuid, data: UpdateGame) -> AppResult<Game> {
        data.validate()?;
        check_admin_status(data.status)?;

        let game = self
            .repository
            .games
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", id)))?;

        if let Some(status) = data.status {
            tracing::info!(game_id = %id, status = %status, "Game status changed by admin");
        }
        Ok(game)
    }

    /// Delete a game. Refused while any reservation references it, since
    /// reservations are kept as an audit trail; retire the game instead.
    pub async fn delete_game(&self, id: Uuid) -> AppResult<()> {
        self.get_game(id).await?;

        let references = self.ledger.count_for_game(id).await?;
        if references > 0 {
            return Err(AppError::Conflict(format!(
                "Game {} has {} reservation(s); retire it instead of deleting",
                id, references
            )));
        }

        if !self.repository.games.delete(id).await? {
            return Err(AppError::NotFound(format!("Game {} not found", id)));
        }
        tracing::info!(game_id = %id, "Game deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn service() -> CatalogService {
        let repository = Repository::in_memory(MemoryStore::new());
        CatalogService::new(repository.clone(), ReservationLedger::new(repository))
    }

    fn new_game(title: &str) -> CreateGame {
        CreateGame {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_available() {
        let catalog = service();
        let game = catalog.create_game(new_game("Catan")).await.unwrap();
        assert_eq!(game.status, GameStatus::Available);
        assert!(game.borrowed_until.is_none());
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let catalog = service();
        let err = catalog.create_game(new_game("")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_complexity_bounds() {
        let catalog = service();
        for rating in [0.5, 5.5] {
            let data = CreateGame {
                complexity_rating: Some(rating),
                ..new_game("Catan")
            };
            assert!(matches!(catalog.create_game(data).await, Err(AppError::Validation(_))));
        }
        let data = CreateGame {
            complexity_rating: Some(5.0),
            ..new_game("Catan")
        };
        assert!(catalog.create_game(data).await.is_ok());
    }

    #[tokio::test]
    async fn test_player_range_is_not_cross_checked() {
        let catalog = service();
        let data = CreateGame {
            min_players: Some(6),
            max_players: Some(2),
            ..new_game("Odd Game")
        };
        assert!(catalog.create_game(data).await.is_ok());
    }

    #[tokio::test]
    async fn test_booking_states_cannot_be_set_by_editor() {
        let catalog = service();
        let game = catalog.create_game(new_game("Catan")).await.unwrap();

        let update = UpdateGame {
            status: Some(GameStatus::Borrowed),
            ..Default::default()
        };
        let err = catalog.update_game(game.id, update).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let update = UpdateGame {
            status: Some(GameStatus::Maintenance),
            ..Default::default()
        };
        let game = catalog.update_game(game.id, update).await.unwrap();
        assert_eq!(game.status, GameStatus::Maintenance);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_description() {
        let catalog = service();
        catalog.create_game(new_game("Catan")).await.unwrap();
        catalog
            .create_game(CreateGame {
                description: Some("Build a CATHEDRAL city".to_string()),
                ..new_game("Carcassonne")
            })
            .await
            .unwrap();
        catalog.create_game(new_game("Azul")).await.unwrap();

        let query = GameQuery {
            search: Some("cat".to_string()),
        };
        let titles: Vec<String> = catalog
            .list_games(&query, false)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.game.title)
            .collect();
        assert_eq!(titles, vec!["Carcassonne", "Catan"]);

        let all = catalog.list_games(&GameQuery::default(), false).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].game.title, "Azul");
    }

    #[tokio::test]
    async fn test_delete_unknown_game() {
        let catalog = service();
        let err = catalog.delete_game(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
