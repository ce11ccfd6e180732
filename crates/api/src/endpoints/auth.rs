//! Signup and token endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use yamdb_common::AppResult;
use yamdb_core::{ObtainTokenInput, SignupInput};

use crate::{middleware::AppState, response::ApiResponse};

/// Signup response, echoing the registered pair.
#[derive(Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Token response.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a user and email a confirmation code.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupInput>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let user = state.auth_service.signup(req).await?;

    Ok(ApiResponse::ok(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// Exchange a confirmation code for an access token.
async fn token(
    State(state): State<AppState>,
    Json(req): Json<ObtainTokenInput>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state.auth_service.obtain_token(req).await?;

    Ok(ApiResponse::ok(TokenResponse { token }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/token", post(token))
}
