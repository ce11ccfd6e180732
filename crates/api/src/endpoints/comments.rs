//! Comment endpoints, nested under a review.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use yamdb_common::AppResult;
use yamdb_core::{CreateCommentInput, UpdateCommentInput};
use yamdb_db::entities::comment;

use super::author_username;
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// Comment response. The author appears by username.
#[derive(Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub author: String,
    pub pub_date: String,
}

impl CommentResponse {
    fn from_model(c: comment::Model, author: String) -> Self {
        Self {
            id: c.id,
            text: c.text,
            author,
            pub_date: c.pub_date.to_rfc3339(),
        }
    }
}

/// Path parameters for the comment collection.
#[derive(Debug, Deserialize)]
pub struct CollectionPath {
    pub title_id: String,
    pub review_id: String,
}

/// Path parameters for a single comment.
#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub title_id: String,
    pub review_id: String,
    pub comment_id: String,
}

/// List comments on a review. Open to everyone.
async fn list(
    State(state): State<AppState>,
    Path(path): Path<CollectionPath>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list(&path.title_id, &path.review_id, page.limit(), page.offset)
        .await?;

    let mut out = Vec::with_capacity(comments.len());
    for c in comments {
        let author = author_username(&state, &c.author_id).await?;
        out.push(CommentResponse::from_model(c, author));
    }

    Ok(ApiResponse::ok(out))
}

/// Fetch a single comment. Open to everyone.
async fn show(
    State(state): State<AppState>,
    Path(path): Path<CommentPath>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let c = state
        .comment_service
        .get(&path.title_id, &path.review_id, &path.comment_id)
        .await?;
    let author = author_username(&state, &c.author_id).await?;

    Ok(ApiResponse::ok(CommentResponse::from_model(c, author)))
}

/// Comment on a review.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<CollectionPath>,
    Json(req): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let created = state
        .comment_service
        .create(&user, &path.title_id, &path.review_id, req)
        .await?;
    let author = user.username;

    Ok(ApiResponse::created(CommentResponse::from_model(
        created, author,
    )))
}

/// Update a comment (author, moderator or admin).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<CommentPath>,
    Json(req): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let updated = state
        .comment_service
        .update(&user, &path.title_id, &path.review_id, &path.comment_id, req)
        .await?;
    let author = author_username(&state, &updated.author_id).await?;

    Ok(ApiResponse::ok(CommentResponse::from_model(updated, author)))
}

/// Delete a comment (author, moderator or admin).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(path): Path<CommentPath>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .delete(&user, &path.title_id, &path.review_id, &path.comment_id)
        .await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(list).post(create),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(show).patch(update).delete(remove),
        )
}
