//! Review management.
//!
//! Reviews are always addressed through their title, so every operation
//! starts by confirming the title exists. Authorization runs after the
//! lookups, which keeps missing resources reporting as `NotFound`.

use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;
use yamdb_common::{AppError, AppResult, IdGenerator};
use yamdb_db::{
    entities::{review, user},
    repositories::{ReviewRepository, TitleRepository},
};

use crate::services::policy;

/// Review create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewInput {
    /// Review body.
    #[validate(length(min = 1))]
    pub text: String,
    /// Score from 1 to 10.
    #[validate(range(min = 1, max = 10))]
    pub score: i16,
}

/// Review update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReviewInput {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub score: Option<i16>,
}

/// Review service.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    title_repo: TitleRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(review_repo: ReviewRepository, title_repo: TitleRepository) -> Self {
        Self {
            review_repo,
            title_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List reviews of a title (paginated, oldest first). Open to everyone.
    pub async fn list(
        &self,
        title_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<review::Model>> {
        if !self.title_repo.exists(title_id).await? {
            return Err(AppError::TitleNotFound(title_id.to_string()));
        }
        self.review_repo.find_by_title(title_id, limit, offset).await
    }

    /// Fetch a single review of a title. Open to everyone.
    pub async fn get(&self, title_id: &str, review_id: &str) -> AppResult<review::Model> {
        if !self.title_repo.exists(title_id).await? {
            return Err(AppError::TitleNotFound(title_id.to_string()));
        }
        self.review_repo.get_in_title(title_id, review_id).await
    }

    /// Create a review. One per author per title.
    pub async fn create(
        &self,
        actor: &user::Model,
        title_id: &str,
        input: CreateReviewInput,
    ) -> AppResult<review::Model> {
        if !self.title_repo.exists(title_id).await? {
            return Err(AppError::TitleNotFound(title_id.to_string()));
        }
        input.validate()?;

        if self.review_repo.has_reviewed(&actor.id, title_id).await? {
            return Err(AppError::Conflict(
                "You have already reviewed this title".to_string(),
            ));
        }

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            title_id: Set(title_id.to_string()),
            author_id: Set(actor.id.clone()),
            text: Set(input.text),
            score: Set(input.score),
            ..Default::default()
        };

        let created = self.review_repo.create(model).await?;
        tracing::info!(review_id = %created.id, title_id = %title_id, "Created review");
        Ok(created)
    }

    /// Update a review. Allowed for the author, moderators and admins.
    pub async fn update(
        &self,
        actor: &user::Model,
        title_id: &str,
        review_id: &str,
        input: UpdateReviewInput,
    ) -> AppResult<review::Model> {
        if !self.title_repo.exists(title_id).await? {
            return Err(AppError::TitleNotFound(title_id.to_string()));
        }
        let existing = self.review_repo.get_in_title(title_id, review_id).await?;

        if !policy::can_modify_contribution(actor, &existing.author_id) {
            return Err(AppError::Forbidden(
                "You may only edit your own review".to_string(),
            ));
        }
        input.validate()?;

        let mut model = existing.into_active_model();
        if let Some(text) = input.text {
            model.text = Set(text);
        }
        if let Some(score) = input.score {
            model.score = Set(score);
        }

        self.review_repo.update(model).await
    }

    /// Delete a review. Allowed for the author, moderators and admins.
    pub async fn delete(
        &self,
        actor: &user::Model,
        title_id: &str,
        review_id: &str,
    ) -> AppResult<()> {
        if !self.title_repo.exists(title_id).await? {
            return Err(AppError::TitleNotFound(title_id.to_string()));
        }
        let existing = self.review_repo.get_in_title(title_id, review_id).await?;

        if !policy::can_modify_contribution(actor, &existing.author_id) {
            return Err(AppError::Forbidden(
                "You may only delete your own review".to_string(),
            ));
        }

        self.review_repo.delete(existing).await?;
        tracing::info!(review_id = %review_id, title_id = %title_id, "Deleted review");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use yamdb_db::entities::{title, UserRole};

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            bio: None,
            role,
            is_superuser: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_title(id: &str) -> title::Model {
        title::Model {
            id: id.to_string(),
            name: "Dune".to_string(),
            year: 1965,
            description: None,
            category_id: None,
            created_at: Utc::now().into(),
        }
    }

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

    fn service_with(db: sea_orm::DatabaseConnection) -> ReviewService {
        let conn = Arc::new(db);
        ReviewService::new(ReviewRepository::new(conn.clone()), TitleRepository::new(conn))
    }

    #[tokio::test]
    async fn test_create_on_missing_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<title::Model>::new()])
            .into_connection();
        let service = service_with(db);
        let actor = create_test_user("u1", UserRole::User);

        let result = service
            .create(
                &actor,
                "missing",
                CreateReviewInput {
                    text: "Great".to_string(),
                    score: 8,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::TitleNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_score_out_of_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_title("t1")]])
            .into_connection();
        let service = service_with(db);
        let actor = create_test_user("u1", UserRole::User);

        let result = service
            .create(
                &actor,
                "t1",
                CreateReviewInput {
                    text: "Off the scale".to_string(),
                    score: 11,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_review() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_title("t1")]])
            .append_query_results([[create_test_review("r1", "t1", "u1", 7)]])
            .into_connection();
        let service = service_with(db);
        let actor = create_test_user("u1", UserRole::User);

        let result = service
            .create(
                &actor,
                "t1",
                CreateReviewInput {
                    text: "Again".to_string(),
                    score: 9,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_by_stranger_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_title("t1")]])
            .append_query_results([[create_test_review("r1", "t1", "u1", 7)]])
            .into_connection();
        let service = service_with(db);
        let stranger = create_test_user("u2", UserRole::User);

        let result = service
            .update(
                &stranger,
                "t1",
                "r1",
                UpdateReviewInput {
                    text: Some("Hijacked".to_string()),
                    score: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_review_is_not_found() {
        // Even a plain user gets NotFound, never Forbidden, for a missing review
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_title("t1")]])
            .append_query_results([Vec::<review::Model>::new()])
            .into_connection();
        let service = service_with(db);
        let actor = create_test_user("u2", UserRole::User);

        let result = service.delete(&actor, "t1", "r404").await;
        assert!(matches!(result, Err(AppError::ReviewNotFound(_))));
    }

    #[tokio::test]
    async fn test_moderator_may_delete_any_review() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_title("t1")]])
            .append_query_results([[create_test_review("r1", "t1", "u1", 7)]])
            .append_exec_results([sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = service_with(db);
        let moderator = create_test_user("m1", UserRole::Moderator);

        let result = service.delete(&moderator, "t1", "r1").await;
        assert!(result.is_ok());
    }
}
