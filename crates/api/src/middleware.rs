//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use yamdb_core::{
    AuthService, CategoryService, CommentService, GenreService, ReviewService, TitleService,
    TokenService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub token_service: TokenService,
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub genre_service: GenreService,
    pub title_service: TitleService,
    pub review_service: ReviewService,
    pub comment_service: CommentService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` JWT to a user and stashes the model in request
/// extensions. Requests without a valid token pass through anonymously;
/// handlers that need a user reject them via the extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.token_service.decode_access_token(token) {
            Ok(claims) => {
                if let Ok(Some(user)) = state.user_service.find_by_id(&claims.sub).await {
                    req.extensions_mut().insert(user);
                }
            }
            Err(err) => tracing::debug!("discarding invalid bearer token: {err}"),
        }
    }

    next.run(req).await
}
