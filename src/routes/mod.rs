//! HTTP surface: route composition and bearer-token authentication.

pub mod docs;
pub mod events;
pub mod games;
pub mod health;
pub mod stats;
pub mod websocket;

use axum::{Router, extract::FromRequestParts, http::header, http::request::Parts};

use crate::{error::AppError, state::SharedState};

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
///
/// Handlers that take this parameter reject unauthenticated requests with
/// 401 before any business logic runs; read-only endpoints simply omit it.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub i64);

impl FromRequestParts<SharedState> for AuthedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a bearer token".into()))?;

        let user_id = state
            .identity()
            .resolve(token)
            .await
            .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;

        Ok(AuthedUser(user_id))
    }
}

/// Assemble the full application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .merge(games::router())
        .merge(events::router())
        .merge(stats::router())
        .merge(websocket::router())
        .merge(health::router())
        .merge(docs::router())
        .with_state(state)
}
