//! Genre management.

use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use yamdb_common::{AppError, AppResult, IdGenerator};
use yamdb_db::{entities::genre, repositories::GenreRepository};

use crate::services::policy;

/// Genre create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenreInput {
    /// Display name.
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    /// URL slug, unique.
    #[validate(
        length(min = 1, max = 50),
        custom(function = "crate::services::category::validate_slug")
    )]
    pub slug: String,
}

/// Genre service.
#[derive(Clone)]
pub struct GenreService {
    genre_repo: GenreRepository,
    id_gen: IdGenerator,
}

impl GenreService {
    /// Create a new genre service.
    #[must_use]
    pub fn new(genre_repo: GenreRepository) -> Self {
        Self {
            genre_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List genres, optionally filtered by name. Open to everyone.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<genre::Model>> {
        self.genre_repo.list(search, limit, offset).await
    }

    /// Create a genre (admin only).
    pub async fn create(
        &self,
        actor: &yamdb_db::entities::user::Model,
        input: GenreInput,
    ) -> AppResult<genre::Model> {
        if !policy::can_manage_catalog(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage the catalog".to_string(),
            ));
        }
        input.validate()?;

        let model = genre::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            slug: Set(input.slug),
            ..Default::default()
        };

        self.genre_repo.create(model).await
    }

    /// Delete a genre by slug (admin only). Association rows cascade; titles
    /// themselves are untouched.
    pub async fn delete_by_slug(
        &self,
        actor: &yamdb_db::entities::user::Model,
        slug: &str,
    ) -> AppResult<()> {
        if !policy::can_manage_catalog(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage the catalog".to_string(),
            ));
        }

        let existing = self.genre_repo.get_by_slug(slug).await?;
        self.genre_repo.delete(existing).await
    }
}
