//! Category management.

use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};
use yamdb_common::{AppError, AppResult, IdGenerator};
use yamdb_db::{entities::category, repositories::CategoryRepository};

use crate::services::policy;

/// Category create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    /// Display name.
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    /// URL slug, unique.
    #[validate(
        length(min = 1, max = 50),
        custom(function = "validate_slug")
    )]
    pub slug: String,
}

pub(crate) fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let ok = slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("slug_charset")
            .with_message("Slug may contain ASCII letters, digits, hyphens and underscores".into()))
    }
}

/// Category service.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List categories, optionally filtered by name. Open to everyone.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<category::Model>> {
        self.category_repo.list(search, limit, offset).await
    }

    /// Create a category (admin only).
    pub async fn create(
        &self,
        actor: &yamdb_db::entities::user::Model,
        input: CategoryInput,
    ) -> AppResult<category::Model> {
        if !policy::can_manage_catalog(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage the catalog".to_string(),
            ));
        }
        input.validate()?;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            slug: Set(input.slug),
            ..Default::default()
        };

        self.category_repo.create(model).await
    }

    /// Delete a category by slug (admin only). Titles keep existing with a
    /// NULL category.
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

        let existing = self.category_repo.get_by_slug(slug).await?;
        self.category_repo.delete(existing).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use yamdb_db::entities::{user, UserRole};

    fn create_test_user(role: UserRole) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            username: "actor".to_string(),
            email: "actor@example.com".to_string(),
            first_name: None,
            last_name: None,
            bio: None,
            role,
            is_superuser: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> CategoryService {
        CategoryService::new(CategoryRepository::new(Arc::new(db)))
    }

    #[test]
    fn test_slug_charset() {
        assert!(validate_slug("science-fiction_2").is_ok());
        assert!(validate_slug("no spaces").is_err());
        assert!(validate_slug("ünïcode").is_err());
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);
        let actor = create_test_user(UserRole::Moderator);

        let result = service
            .create(
                &actor,
                CategoryInput {
                    name: "Books".to_string(),
                    slug: "books".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);
        let actor = create_test_user(UserRole::Admin);

        let result = service
            .create(
                &actor,
                CategoryInput {
                    name: "Books".to_string(),
                    slug: "not a slug".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let service = service_with(db);
        let actor = create_test_user(UserRole::Admin);

        let result = service.delete_by_slug(&actor, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.list(None, 10, 0).await;
        assert!(result.is_ok());
    }
}
