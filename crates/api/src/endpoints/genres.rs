//! Genre endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use yamdb_common::AppResult;
use yamdb_core::GenreInput;
use yamdb_db::entities::genre;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Genre response.
#[derive(Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<genre::Model> for GenreResponse {
    fn from(g: genre::Model) -> Self {
        Self {
            name: g.name,
            slug: g.slug,
        }
    }
}

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// List genres. Open to everyone.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<GenreResponse>>> {
    let limit = query.limit.min(100);
    let genres = state
        .genre_service
        .list(query.search.as_deref(), limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(genres.into_iter().map(Into::into).collect()))
}

/// Create a genre (admin only).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GenreInput>,
) -> AppResult<ApiResponse<GenreResponse>> {
    let created = state.genre_service.create(&user, req).await?;

    Ok(ApiResponse::created(created.into()))
}

/// Delete a genre by slug (admin only).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.genre_service.delete_by_slug(&user, &slug).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/genres", get(list).post(create))
        .route("/genres/{slug}", delete(remove))
}
