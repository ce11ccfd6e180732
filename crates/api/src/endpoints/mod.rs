//! API endpoints.

mod auth;
mod categories;
mod comments;
mod genres;
mod reviews;
mod titles;
mod users;

use axum::Router;
use yamdb_common::AppResult;

use crate::middleware::AppState;

/// Create the API router. Mounted under `/api/v1` by the server.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(categories::router())
        .merge(genres::router())
        .merge(titles::router())
        .merge(reviews::router())
        .merge(comments::router())
        .merge(users::router())
}

/// Resolve an author ID to a username for responses.
pub(crate) async fn author_username(state: &AppState, author_id: &str) -> AppResult<String> {
    Ok(state
        .user_service
        .find_by_id(author_id)
        .await?
        .map_or_else(|| author_id.to_string(), |u| u.username))
}
