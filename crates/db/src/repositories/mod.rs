//! Database repositories.

pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use genre::GenreRepository;
pub use review::ReviewRepository;
pub use title::{TitleQuery, TitleRepository};
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};
use yamdb_common::AppError;

/// Map a write-path database error, surfacing unique-constraint violations
/// as `Conflict`.
///
/// Concurrent writers can both pass an application-level duplicate pre-check;
/// the database constraint is the authoritative guard, and its violation must
/// report the same error kind the pre-check would have produced.
pub(crate) fn map_write_err(err: DbErr, conflict_msg: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict_msg.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}
