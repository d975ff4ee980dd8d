//! Games repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::GameStore;
use crate::{
    error::AppResult,
    models::{Game, GameStatus, UpdateGame},
};

#[derive(Clone)]
pub struct GamesRepository {
    pool: Pool<Postgres>,
}

impl GamesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStore for GamesRepository {
    async fn list(&self, search: Option<String>) -> AppResult<Vec<Game>> {
        let games = sqlx::query_as::<_, Game>(
            r#"
            SELECT * FROM games
            WHERE $1::text IS NULL
               OR strpos(lower(title), lower($1)) > 0
               OR strpos(lower(COALESCE(description, '')), lower($1)) > 0
            ORDER BY lower(title), title
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(games)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Game>> {
        let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    async fn insert(&self, game: Game) -> AppResult<Game> {
        let row = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (
                id, title, description, image_url, min_players, max_players,
                play_time, recommended_age, complexity_rating, status,
                condition_notes, borrowed_until, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(game.id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(&game.image_url)
        .bind(game.min_players)
        .bind(game.max_players)
        .bind(&game.play_time)
        .bind(&game.recommended_age)
        .bind(game.complexity_rating)
        .bind(game.status)
        .bind(&game.condition_notes)
        .bind(game.borrowed_until)
        .bind(game.created_at)
        .bind(game.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, data: &UpdateGame) -> AppResult<Option<Game>> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $2".to_string()];
        let mut idx = 3;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.title, "title");
        add_field!(data.description, "description");
        add_field!(data.image_url, "image_url");
        add_field!(data.min_players, "min_players");
        add_field!(data.max_players, "max_players");
        add_field!(data.play_time, "play_time");
        add_field!(data.recommended_age, "recommended_age");
        add_field!(data.complexity_rating, "complexity_rating");
        add_field!(data.status, "status");
        add_field!(data.condition_notes, "condition_notes");

        let query = format!("UPDATE games SET {} WHERE id = $1 RETURNING *", sets.join(", "));

        let mut builder = sqlx::query_as::<_, Game>(&query).bind(id).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.description);
        bind_field!(data.image_url);
        bind_field!(data.min_players);
        bind_field!(data.max_players);
        bind_field!(data.play_time);
        bind_field!(data.recommended_age);
        bind_field!(data.complexity_rating);
        bind_field!(data.status);
        bind_field!(data.condition_notes);

        let game = builder.fetch_optional(&self.pool).await?;
        Ok(game)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_borrowed(
        &self,
        id: Uuid,
        until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE games
            SET status = $2, borrowed_until = $3, updated_at = $4
            WHERE id = $1
              AND status NOT IN ('maintenance', 'retired')
              AND (borrowed_until IS NULL OR borrowed_until < $4)
            "#,
        )
        .bind(id)
        .bind(GameStatus::Borrowed)
        .bind(until)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_available(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE games SET status = $2, borrowed_until = NULL, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(GameStatus::Available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
