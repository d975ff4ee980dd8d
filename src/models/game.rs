//! Game (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::GameStatus;
use super::reservation::Reservation;

/// Game record as stored.
///
/// `status` is persisted but only trusted for administrative states; the
/// booking state shown to visitors is derived from `borrowed_until` on every
/// read (see `services::status`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    /// Free-form play time, e.g. "30-45 min"
    pub play_time: Option<String>,
    /// Free-form age hint, e.g. "12+"
    pub recommended_age: Option<String>,
    /// Complexity between 1.0 and 5.0
    pub complexity_rating: Option<f64>,
    pub status: GameStatus,
    pub condition_notes: Option<String>,
    /// Set while the game is lent out under an active reservation
    pub borrowed_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Case-insensitive substring match against title OR description
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false)
    }
}

/// Create game request (admin)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateGame {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[validate(range(min = 0, message = "Minimum players cannot be negative"))]
    pub min_players: Option<i32>,
    #[validate(range(min = 0, message = "Maximum players cannot be negative"))]
    pub max_players: Option<i32>,
    pub play_time: Option<String>,
    pub recommended_age: Option<String>,
    #[validate(range(min = 1.0, max = 5.0, message = "Complexity rating must be between 1 and 5"))]
    pub complexity_rating: Option<f64>,
    /// Initial status; booking states are rejected
    pub status: Option<GameStatus>,
    pub condition_notes: Option<String>,
}

/// Update game request (admin). Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGame {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[validate(range(min = 0, message = "Minimum players cannot be negative"))]
    pub min_players: Option<i32>,
    #[validate(range(min = 0, message = "Maximum players cannot be negative"))]
    pub max_players: Option<i32>,
    pub play_time: Option<String>,
    pub recommended_age: Option<String>,
    #[validate(range(min = 1.0, max = 5.0, message = "Complexity rating must be between 1 and 5"))]
    pub complexity_rating: Option<f64>,
    pub status: Option<GameStatus>,
    pub condition_notes: Option<String>,
}

/// Catalog search parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct GameQuery {
    /// Case-insensitive search in title or description
    pub search: Option<String>,
}

impl GameQuery {
    /// Search term, ignoring blank input
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A game as presented by the catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub game: Game,
    /// Status computed at read time
    pub derived_status: GameStatus,
    /// Current borrower; only filled in for admins
    pub active_reservation: Option<Reservation>,
}
