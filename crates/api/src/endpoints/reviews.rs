//! Review endpoints, nested under a title.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use yamdb_common::AppResult;
use yamdb_core::{CreateReviewInput, UpdateReviewInput};
use yamdb_db::entities::review;

use super::author_username;
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Review response. The author appears by username.
#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub text: String,
    pub author: String,
    pub score: i16,
    pub pub_date: String,
}

impl ReviewResponse {
    fn from_model(r: review::Model, author: String) -> Self {
        Self {
            id: r.id,
            text: r.text,
            author,
            score: r.score,
            pub_date: r.pub_date.to_rfc3339(),
        }
    }
}

/// Path parameters for a review within a title.
#[derive(Debug, Deserialize)]
pub struct ReviewPath {
    pub title_id: String,
    pub review_id: String,
}

async fn hydrate(state: &AppState, reviews: Vec<review::Model>) -> AppResult<Vec<ReviewResponse>> {
    let mut out = Vec::with_capacity(reviews.len());
    for r in reviews {
        let author = author_username(state, &r.author_id).await?;
        out.push(ReviewResponse::from_model(r, author));
    }
    Ok(out)
}

/// List reviews of a title. Open to everyone.
async fn list(
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state
        .review_service
        .list(&title_id, page.limit(), page.offset)
        .await?;

    Ok(ApiResponse::ok(hydrate(&state, reviews).await?))
}

/// Fetch a single review. Open to everyone.
async fn show(
    State(state): State<AppState>,
    Path(path): Path<ReviewPath>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let r = state
        .review_service
        .get(&path.title_id, &path.review_id)
        .await?;
    let author = author_username(&state, &r.author_id).await?;

    Ok(ApiResponse::ok(ReviewResponse::from_model(r, author)))
}

/// Create a review. One per author per title.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    Json(req): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let created = state.review_service.create(&user, &title_id, req).await?;
    let author = user.username;

    Ok(ApiResponse::created(ReviewResponse::from_model(
        created, author,
    )))
}

/// Update a review (author, moderator or admin).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<ReviewPath>,
    Json(req): Json<UpdateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let updated = state
        .review_service
        .update(&user, &path.title_id, &path.review_id, req)
        .await?;
    let author = author_username(&state, &updated.author_id).await?;

    Ok(ApiResponse::ok(ReviewResponse::from_model(updated, author)))
}

/// Delete a review (author, moderator or admin).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<ReviewPath>,
) -> AppResult<impl IntoResponse> {
    state
        .review_service
        .delete(&user, &path.title_id, &path.review_id)
        .await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/titles/{title_id}/reviews", get(list).post(create))
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(show).patch(update).delete(remove),
        )
}
