//! User administration and profile endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use yamdb_common::AppResult;
use yamdb_core::{AdminUserInput, AdminUserUpdateInput, ProfileUpdateInput};
use yamdb_db::entities::{user, UserRole};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{no_content, ApiResponse},
};

/// User response.
#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        let role = u.effective_role();
        Self {
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            bio: u.bio,
            role,
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

/// List users (admin only).
async fn list(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = query.limit.min(100);
    let users = state
        .user_service
        .list(&actor, query.search.as_deref(), limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Create a user with an explicit role (admin only).
async fn create(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AdminUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let created = state.user_service.create(&actor, req).await?;

    Ok(ApiResponse::created(created.into()))
}

/// The authenticated user's own profile.
async fn me(AuthUser(actor): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(actor.into())
}

/// Update the authenticated user's own profile. Role stays as it is.
async fn update_me(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfileUpdateInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(&actor, req).await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Look up a user by username (admin only).
async fn show(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let found = state.user_service.get_by_username(&actor, &username).await?;

    Ok(ApiResponse::ok(found.into()))
}

/// Update a user by username (admin only).
async fn update(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<AdminUserUpdateInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .update_by_username(&actor, &username, req)
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Delete a user by username (admin only).
async fn remove(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.user_service.delete_by_username(&actor, &username).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/me", get(me).patch(update_me))
        .route("/users/{username}", get(show).patch(update).delete(remove))
}
