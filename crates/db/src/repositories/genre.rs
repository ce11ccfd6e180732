//! Genre repository.

use std::sync::Arc;

use crate::entities::{genre, Genre};
use crate::repositories::map_write_err;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use yamdb_common::{AppError, AppResult};

/// Genre repository for database operations.
#[derive(Clone)]
pub struct GenreRepository {
    db: Arc<DatabaseConnection>,
}

impl GenreRepository {
    /// Create a new genre repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a genre by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<genre::Model>> {
        Genre::find()
            .filter(genre::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a genre by slug, returning an error if not found.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<genre::Model> {
        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {slug}")))
    }

    /// Find genres by slugs, preserving no particular order.
    pub async fn find_by_slugs(&self, slugs: &[String]) -> AppResult<Vec<genre::Model>> {
        if slugs.is_empty() {
            return Ok(vec![]);
        }

        Genre::find()
            .filter(genre::Column::Slug.is_in(slugs.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new genre. Duplicate slug surfaces as `Conflict`.
    pub async fn create(&self, model: genre::ActiveModel) -> AppResult<genre::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Genre with this slug already exists"))
    }

    /// Delete a genre. Association rows cascade.
    pub async fn delete(&self, model: genre::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List genres, optionally filtered by a name substring.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<genre::Model>> {
        let mut query = Genre::find().order_by_asc(genre::Column::Id);

        if let Some(needle) = search {
            query = query.filter(genre::Column::Name.contains(needle));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_genre(id: &str, name: &str, slug: &str) -> genre::Model {
        genre::Model {
            id: id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let g = create_test_genre("g1", "Science Fiction", "sci-fi");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[g]])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.find_by_slug("sci-fi").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_find_by_slugs_empty_input() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.find_by_slugs(&[]).await.unwrap();

        assert!(result.is_empty());
    }
}
