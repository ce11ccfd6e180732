//! Category endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use yamdb_common::AppResult;
use yamdb_core::CategoryInput;
use yamdb_db::entities::category;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Category response.
#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            name: c.name,
            slug: c.slug,
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

/// List categories. Open to everyone.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let limit = query.limit.min(100);
    let categories = state
        .category_service
        .list(query.search.as_deref(), limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
    ))
}

/// Create a category (admin only).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let created = state.category_service.create(&user, req).await?;

    Ok(ApiResponse::created(created.into()))
}

/// Delete a category by slug (admin only).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.category_service.delete_by_slug(&user, &slug).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{slug}", delete(remove))
}
