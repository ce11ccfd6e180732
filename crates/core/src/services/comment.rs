//! Comment management.
//!
//! Comments live under `/titles/{title}/reviews/{review}/comments`, and the
//! whole ancestry is re-validated on every call: a review reached through
//! the wrong title is a `NotFound`, not a hit.

use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;
use yamdb_common::{AppError, AppResult, IdGenerator};
use yamdb_db::{
    entities::{comment, user},
    repositories::{CommentRepository, ReviewRepository, TitleRepository},
};

use crate::services::policy;

/// Comment create request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentInput {
    /// Comment body.
    #[validate(length(min = 1))]
    pub text: String,
}

/// Comment update request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentInput {
    /// New comment body.
    #[validate(length(min = 1))]
    pub text: String,
}

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    review_repo: ReviewRepository,
    title_repo: TitleRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        review_repo: ReviewRepository,
        title_repo: TitleRepository,
    ) -> Self {
        Self {
            comment_repo,
            review_repo,
            title_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn check_ancestry(&self, title_id: &str, review_id: &str) -> AppResult<()> {
        if !self.title_repo.exists(title_id).await? {
            return Err(AppError::TitleNotFound(title_id.to_string()));
        }
        self.review_repo.get_in_title(title_id, review_id).await?;
        Ok(())
    }

    /// List comments on a review (paginated, oldest first). Open to everyone.
    pub async fn list(
        &self,
        title_id: &str,
        review_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        self.check_ancestry(title_id, review_id).await?;
        self.comment_repo
            .find_by_review(review_id, limit, offset)
            .await
    }

    /// Fetch a single comment. Open to everyone.
    pub async fn get(
        &self,
        title_id: &str,
        review_id: &str,
        comment_id: &str,
    ) -> AppResult<comment::Model> {
        self.check_ancestry(title_id, review_id).await?;
        self.comment_repo.get_in_review(review_id, comment_id).await
    }

    /// Create a comment on a review.
    pub async fn create(
        &self,
        actor: &user::Model,
        title_id: &str,
        review_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        self.check_ancestry(title_id, review_id).await?;
        input.validate()?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            review_id: Set(review_id.to_string()),
            author_id: Set(actor.id.clone()),
            text: Set(input.text),
            ..Default::default()
        };

        let created = self.comment_repo.create(model).await?;
        tracing::info!(comment_id = %created.id, review_id = %review_id, "Created comment");
        Ok(created)
    }

    /// Update a comment. Allowed for the author, moderators and admins.
    pub async fn update(
        &self,
        actor: &user::Model,
        title_id: &str,
        review_id: &str,
        comment_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<comment::Model> {
        self.check_ancestry(title_id, review_id).await?;
        let existing = self.comment_repo.get_in_review(review_id, comment_id).await?;

        if !policy::can_modify_contribution(actor, &existing.author_id) {
            return Err(AppError::Forbidden(
                "You may only edit your own comment".to_string(),
            ));
        }
        input.validate()?;

        let mut model = existing.into_active_model();
        model.text = Set(input.text);

        self.comment_repo.update(model).await
    }

    /// Delete a comment. Allowed for the author, moderators and admins.
    pub async fn delete(
        &self,
        actor: &user::Model,
        title_id: &str,
        review_id: &str,
        comment_id: &str,
    ) -> AppResult<()> {
        self.check_ancestry(title_id, review_id).await?;
        let existing = self.comment_repo.get_in_review(review_id, comment_id).await?;

        if !policy::can_modify_contribution(actor, &existing.author_id) {
            return Err(AppError::Forbidden(
                "You may only delete your own comment".to_string(),
            ));
        }

        self.comment_repo.delete(existing).await?;
        tracing::info!(comment_id = %comment_id, review_id = %review_id, "Deleted comment");
        Ok(())
    }
}
