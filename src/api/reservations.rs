//! Reservation and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CatalogEntry, Reservation},
    services::intake::BorrowRequest,
    AppState,
};

use super::AdminUser;

/// Reservation response
#[derive(Serialize, ToSchema)]
pub struct ReservationResponse {
    pub reservation: Reservation,
    /// Status message
    pub message: String,
}

/// Return response with the game as it now stands
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Number of reservations completed by this return
    pub completed: u64,
    pub game: CatalogEntry,
}

/// Request to borrow a game
#[utoipa::path(
    post,
    path = "/games/{id}/reservations",
    tag = "reservations",
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Invalid borrower or dates"),
        (status = 404, description = "Game not found"),
        (status = 409, description = "Game is not available"),
        (status = 503, description = "Store unavailable, retry")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    request.check(Utc::now().date_naive())?;

    let reservation = state
        .services
        .availability
        .reserve(request.into_reservation(game_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            message: format!(
                "Game reserved from {} to {}",
                reservation.pickup_date, reservation.return_date
            ),
            reservation,
        }),
    ))
}

/// Reservation history of a game
#[utoipa::path(
    get,
    path = "/games/{id}/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Reservations, newest first", body = Vec<Reservation>),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn list_game_reservations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(game_id): Path<Uuid>,
) -> AppResult<Json<Vec<Reservation>>> {
    state.services.catalog.get_game(game_id).await?;
    let reservations = state.services.ledger.list_for_game(game_id).await?;
    Ok(Json(reservations))
}

/// Mark a borrowed game as returned
#[utoipa::path(
    post,
    path = "/games/{id}/return",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Game returned", body = ReturnResponse),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Game not found"),
        (status = 503, description = "Store unavailable, retry")
    )
)]
pub async fn return_game(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(game_id): Path<Uuid>,
) -> AppResult<Json<ReturnResponse>> {
    let completed = state.services.availability.mark_returned(game_id).await?;
    let game = state.services.catalog.get_entry(game_id, true).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        completed,
        game,
    }))
}
