//! Title endpoints, with reviews nested underneath.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use yamdb_common::AppResult;
use yamdb_core::{CreateTitleInput, TitleListQuery, TitleWithRating, UpdateTitleInput};

use super::{categories::CategoryResponse, genres::GenreResponse};
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Title response with derived rating.
#[derive(Serialize)]
pub struct TitleResponse {
    pub id: String,
    pub name: String,
    pub year: i16,
    /// Mean review score, null when unreviewed.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
}

impl From<TitleWithRating> for TitleResponse {
    fn from(t: TitleWithRating) -> Self {
        Self {
            id: t.title.id,
            name: t.title.name,
            year: t.title.year,
            rating: t.rating,
            description: t.title.description,
            genre: t.genres.into_iter().map(Into::into).collect(),
            category: t.category.map(Into::into),
        }
    }
}

/// List query parameters: catalog filters plus pagination.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i16>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// List titles. Open to everyone.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<TitleResponse>>> {
    let limit = query.limit.min(100);
    let filter = TitleListQuery {
        category: query.category,
        genre: query.genre,
        name: query.name,
        year: query.year,
    };

    let titles = state.title_service.list(&filter, limit, query.offset).await?;

    Ok(ApiResponse::ok(titles.into_iter().map(Into::into).collect()))
}

/// Fetch a single title. Open to everyone.
async fn show(
    State(state): State<AppState>,
    Path(title_id): Path<String>,
) -> AppResult<ApiResponse<TitleResponse>> {
    let title = state.title_service.get(&title_id).await?;

    Ok(ApiResponse::ok(title.into()))
}

/// Create a title (admin only).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTitleInput>,
) -> AppResult<ApiResponse<TitleResponse>> {
    let created = state.title_service.create(&user, req).await?;

    Ok(ApiResponse::created(created.into()))
}

/// Update a title (admin only).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    Json(req): Json<UpdateTitleInput>,
) -> AppResult<ApiResponse<TitleResponse>> {
    let updated = state.title_service.update(&user, &title_id, req).await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Delete a title (admin only).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.title_service.delete(&user, &title_id).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/titles", get(list).post(create))
        .route("/titles/{title_id}", get(show).patch(update).delete(remove))
}
