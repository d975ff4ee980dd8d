//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{email_logs, games, health, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meeple Library API",
        version = "1.0.0",
        description = "Board game lending library REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        games::list_games,
        games::get_game,
        games::create_game,
        games::update_game,
        games::delete_game,
        // Reservations
        reservations::create_reservation,
        reservations::list_game_reservations,
        reservations::return_game,
        // Notifications
        email_logs::list_email_logs,
    ),
    components(
        schemas(
            // Catalog
            crate::models::game::Game,
            crate::models::game::CatalogEntry,
            crate::models::game::CreateGame,
            crate::models::game::UpdateGame,
            crate::models::enums::GameStatus,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::enums::ReservationStatus,
            crate::services::intake::BorrowRequest,
            reservations::ReservationResponse,
            reservations::ReturnResponse,
            // Notifications
            crate::models::email_log::EmailLog,
            crate::models::enums::DeliveryStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Game catalog"),
        (name = "reservations", description = "Reservations and returns"),
        (name = "notifications", description = "Notification delivery log")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
