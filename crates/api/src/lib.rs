//! HTTP API layer for yamdb-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: catalog, reviews, comments, users and auth under `/api/v1`
//! - **Extractors**: Authentication, pagination
//! - **Middleware**: Bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
