//! API integration tests.
//!
//! These tests drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;
use yamdb_api::{middleware::auth_middleware, router as api_router, AppState};
use yamdb_common::config::AuthConfig;
use yamdb_common::config::MailConfig;
use yamdb_core::{
    AuthService, CategoryService, CommentService, GenreService, MailerService, ReviewService,
    TitleService, TokenService, UserService,
};
use yamdb_db::entities::{category, title, user, UserRole};
use yamdb_db::repositories::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserRepository,
};

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-jwt-secret".to_string(),
        token_ttl_secs: 3600,
        code_secret: "test-code-secret".to_string(),
        code_ttl_secs: 3600,
    }
}

fn create_test_user(id: &str, username: &str, role: UserRole) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: None,
        last_name: None,
        bio: None,
        role,
        is_superuser: false,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn create_test_title(id: &str, name: &str, year: i16) -> title::Model {
    title::Model {
        id: id.to_string(),
        name: name.to_string(),
        year,
        description: None,
        category_id: None,
        created_at: Utc::now().into(),
    }
}

/// Build app state over an explicit (usually mock) connection.
fn state_with(db: DatabaseConnection) -> AppState {
    let conn = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&conn));
    let category_repo = CategoryRepository::new(Arc::clone(&conn));
    let genre_repo = GenreRepository::new(Arc::clone(&conn));
    let title_repo = TitleRepository::new(Arc::clone(&conn));
    let review_repo = ReviewRepository::new(Arc::clone(&conn));
    let comment_repo = CommentRepository::new(Arc::clone(&conn));

    let token_service = TokenService::new(auth_config());
    let mailer = MailerService::from_config(&MailConfig::default());

    AppState {
        auth_service: AuthService::new(user_repo.clone(), token_service.clone(), mailer),
        token_service,
        user_service: UserService::new(user_repo),
        category_service: CategoryService::new(category_repo.clone()),
        genre_service: GenreService::new(genre_repo.clone()),
        title_service: TitleService::new(
            title_repo.clone(),
            category_repo,
            genre_repo,
            review_repo.clone(),
        ),
        review_service: ReviewService::new(review_repo.clone(), title_repo.clone()),
        comment_service: CommentService::new(comment_repo, review_repo, title_repo),
    }
}

fn app_with(db: DatabaseConnection) -> Router {
    let state = state_with(db);
    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Issue a bearer token the router's state will accept.
fn bearer_for(user: &user::Model) -> String {
    let token = TokenService::new(auth_config())
        .issue_access_token(user)
        .unwrap();
    format!("Bearer {token}")
}

#[tokio::test]
async fn test_list_categories_anonymously() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_category_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"Books","slug":"books"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_category_forbidden_for_plain_user() {
    let plain = create_test_user("u1", "reader", UserRole::User);
    // One query: the auth middleware resolving the token subject
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[plain.clone()]])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", bearer_for(&plain))
                .body(Body::from(r#"{"name":"Books","slug":"books"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_category_as_admin() {
    let admin = create_test_user("a1", "admin", UserRole::Admin);
    let created = category::Model {
        id: "c1".to_string(),
        name: "Books".to_string(),
        slug: "books".to_string(),
        created_at: Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[admin.clone()]])
        .append_query_results([[created]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", bearer_for(&admin))
                .body(Body::from(r#"{"name":"Books","slug":"books"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_signup_reserved_username() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"me","email":"me@example.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"alice","email":"not-an-email"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_obtain_token_unknown_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/token")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"ghost","confirmation_code":"whatever"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_missing_title() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<title::Model>::new()])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/titles/missing")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_score_out_of_range() {
    let plain = create_test_user("u1", "reader", UserRole::User);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[plain.clone()]])
        .append_query_results([[create_test_title("t1", "Dune", 1965)]])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/titles/t1/reviews")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", bearer_for(&plain))
                .body(Body::from(r#"{"text":"Off the scale","score":11}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_returns_profile() {
    let plain = create_test_user("u1", "reader", UserRole::User);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[plain.clone()]])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .method("GET")
                .header("Authorization", bearer_for(&plain))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
