//! Repository layer: store collaborator traits and their implementations

pub mod email_logs;
pub mod games;
pub mod memory;
pub mod reservations;
pub mod roles;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use uuid::Uuid;

use crate::{
    config::DatabaseConfig,
    error::AppResult,
    models::{AppRole, EmailLog, Game, Reservation, UpdateGame},
};

pub use memory::MemoryStore;

/// `database.url` value selecting the in-process store
pub const MEMORY_URL: &str = "memory://";

/// Games table primitives
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameStore: Send + Sync {
    /// All games ordered by title, optionally filtered by a case-insensitive
    /// substring of title or description
    async fn list(&self, search: Option<String>) -> AppResult<Vec<Game>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Game>>;

    async fn insert(&self, game: Game) -> AppResult<Game>;

    /// Partial update; `None` when the game does not exist
    async fn update(&self, id: Uuid, data: &UpdateGame) -> AppResult<Option<Game>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Conditional write: sets `status = borrowed` and `borrowed_until` only
    /// while the game is available at `now`. Returns false when nothing
    /// matched.
    async fn mark_borrowed(
        &self,
        id: Uuid,
        until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Clears `borrowed_until` and sets `status = available`. Returns false
    /// when the game does not exist.
    async fn mark_available(&self, id: Uuid) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;
}

/// Reservations table primitives
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Insert an active reservation. Fails with `Conflict` when the game
    /// already has one.
    async fn insert(&self, reservation: Reservation) -> AppResult<Reservation>;

    /// Complete a single reservation if it is still active
    async fn complete(&self, id: Uuid) -> AppResult<bool>;

    /// Complete every active reservation of a game, returning rows affected
    async fn complete_active_for_game(&self, game_id: Uuid) -> AppResult<u64>;

    async fn list_active_by_game_ids(&self, game_ids: &[Uuid]) -> AppResult<Vec<Reservation>>;

    /// Full history for a game, newest first
    async fn list_for_game(&self, game_id: Uuid) -> AppResult<Vec<Reservation>>;

    async fn count_for_game(&self, game_id: Uuid) -> AppResult<i64>;
}

/// Role lookup of the identity service
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> AppResult<bool>;
}

/// Append-only notification audit log
#[async_trait]
pub trait EmailLogStore: Send + Sync {
    async fn append(&self, entry: EmailLog) -> AppResult<()>;

    /// Most recent entries first
    async fn list(&self, limit: i64) -> AppResult<Vec<EmailLog>>;
}

/// Bundle of store handles shared by the services
#[derive(Clone)]
pub struct Repository {
    pub games: Arc<dyn GameStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pub roles: Arc<dyn RoleStore>,
    pub email_logs: Arc<dyn EmailLogStore>,
}

impl Repository {
    /// Create a PostgreSQL-backed repository with the given pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            games: Arc::new(games::GamesRepository::new(pool.clone())),
            reservations: Arc::new(reservations::ReservationsRepository::new(pool.clone())),
            roles: Arc::new(roles::RolesRepository::new(pool.clone())),
            email_logs: Arc::new(email_logs::EmailLogsRepository::new(pool)),
        }
    }

    /// Create a repository backed by a single in-process store
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            games: store.clone(),
            reservations: store.clone(),
            roles: store.clone(),
            email_logs: store,
        }
    }

    /// Connect to the configured store, running migrations for PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        if config.url == MEMORY_URL {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            return Ok(Self::in_memory(MemoryStore::new()));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }
}
