//! Game catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CatalogEntry, CreateGame, Game, GameQuery, UpdateGame},
    AppState,
};

use super::{AdminUser, MaybeUser};

/// List games with their current status
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(GameQuery),
    responses(
        (status = 200, description = "Games ordered by title; borrowers are included for admins", body = Vec<CatalogEntry>),
        (status = 401, description = "Invalid token")
    )
)]
pub async fn list_games(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<GameQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let include_borrowers = user.is_admin(&state).await?;
    let games = state
        .services
        .catalog
        .list_games(&query, include_borrowers)
        .await?;
    Ok(Json(games))
}

/// Get a game by ID
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Game details", body = CatalogEntry),
        (status = 404, description = "Game not found")
    )
)]
pub async fn get_game(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CatalogEntry>> {
    let include_borrowers = user.is_admin(&state).await?;
    let entry = state.services.catalog.get_entry(id, include_borrowers).await?;
    Ok(Json(entry))
}

/// Add a game to the catalog
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    security(("bearer_auth" = [])),
    request_body = CreateGame,
    responses(
        (status = 201, description = "Game created", body = Game),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn create_game(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(data): Json<CreateGame>,
) -> AppResult<(StatusCode, Json<Game>)> {
    let game = state.services.catalog.create_game(data).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Update a game
#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "games",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    request_body = UpdateGame,
    responses(
        (status = 200, description = "Game updated", body = Game),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn update_game(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateGame>,
) -> AppResult<Json<Game>> {
    let game = state.services.catalog.update_game(id, data).await?;
    Ok(Json(game))
}

/// Delete a game that was never reserved
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Game not found"),
        (status = 409, description = "Game has reservations")
    )
)]
pub async fn delete_game(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_game(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
