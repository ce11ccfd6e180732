//! Review repository.

use std::sync::Arc;

use crate::entities::{review, Review};
use crate::repositories::map_write_err;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use yamdb_common::{AppError, AppResult};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID scoped to a title (nested-route lookup).
    pub async fn find_in_title(
        &self,
        title_id: &str,
        review_id: &str,
    ) -> AppResult<Option<review::Model>> {
        Review::find_by_id(review_id)
            .filter(review::Column::TitleId.eq(title_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID scoped to a title, returning an error if not found.
    pub async fn get_in_title(&self, title_id: &str, review_id: &str) -> AppResult<review::Model> {
        self.find_in_title(title_id, review_id)
            .await?
            .ok_or_else(|| AppError::ReviewNotFound(review_id.to_string()))
    }

    /// Find the review a user wrote for a title, if any.
    pub async fn find_by_author_and_title(
        &self,
        author_id: &str,
        title_id: &str,
    ) -> AppResult<Option<review::Model>> {
        Review::find()
            .filter(review::Column::AuthorId.eq(author_id))
            .filter(review::Column::TitleId.eq(title_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has already reviewed a title.
    pub async fn has_reviewed(&self, author_id: &str, title_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_author_and_title(author_id, title_id)
            .await?
            .is_some())
    }

    /// Reviews of a title (paginated, oldest first).
    pub async fn find_by_title(
        &self,
        title_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::TitleId.eq(title_id))
            .order_by_asc(review::Column::PubDate)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All review scores for a title (aggregate fetch for the rating fold).
    pub async fn scores_for_title(&self, title_id: &str) -> AppResult<Vec<i16>> {
        Review::find()
            .filter(review::Column::TitleId.eq(title_id))
            .select_only()
            .column(review::Column::Score)
            .into_tuple::<i16>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    ///
    /// The (author, title) unique constraint is the authoritative duplicate
    /// guard; its violation surfaces as `Conflict`.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "You have already reviewed this title"))
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review. Its comments cascade.
    pub async fn delete(&self, model: review::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_review(id: &str, title_id: &str, author_id: &str, score: i16) -> review::Model {
        review::Model {
            id: id.to_string(),
            title_id: title_id.to_string(),
            author_id: author_id.to_string(),
            text: "A fine piece of work".to_string(),
            score,
            pub_date: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_author_and_title() {
        let r = create_test_review("r1", "t1", "u1", 7);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_by_author_and_title("u1", "t1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().score, 7);
    }

    #[tokio::test]
    async fn test_has_reviewed_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.has_reviewed("u1", "t2").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_get_in_title_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.get_in_title("t1", "r404").await;

        assert!(matches!(result, Err(AppError::ReviewNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let r1 = create_test_review("r1", "t1", "u1", 8);
        let r2 = create_test_review("r2", "t1", "u2", 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_by_title("t1", 10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
