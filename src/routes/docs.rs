//! OpenAPI document and the Swagger UI mount.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::SharedState;

/// OpenAPI description of the whole surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courtside Backend",
        description = "Live basketball game ledger, statistics and realtime rooms.",
    ),
    paths(
        crate::routes::games::create_game,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::start_game,
        crate::routes::games::finalize_game,
        crate::routes::games::cancel_game,
        crate::routes::games::set_timeout,
        crate::routes::games::update_score,
        crate::routes::games::add_roster_player,
        crate::routes::games::create_team,
        crate::routes::games::get_team,
        crate::routes::games::create_user,
        crate::routes::events::record_event,
        crate::routes::events::list_events,
        crate::routes::events::delete_event,
        crate::routes::stats::game_stats,
        crate::routes::stats::game_summary,
        crate::routes::stats::live_player_stats,
        crate::routes::stats::player_game_stats,
        crate::routes::stats::career_stats,
        crate::routes::websocket::spectate,
        crate::routes::websocket::spectators,
        crate::routes::websocket::active_games,
        crate::routes::health::healthcheck,
    ),
    tags(
        (name = "games", description = "Game lifecycle and rosters"),
        (name = "events", description = "The game event ledger"),
        (name = "stats", description = "Live and finalized statistics"),
        (name = "teams", description = "Teams"),
        (name = "users", description = "User bootstrap"),
        (name = "realtime", description = "Spectator rooms"),
        (name = "health", description = "Liveness"),
    ),
)]
pub struct ApiDoc;

/// Mount the Swagger UI backed by [`ApiDoc`].
pub fn router() -> Router<SharedState> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
