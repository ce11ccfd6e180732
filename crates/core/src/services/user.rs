//! User administration and profile management.

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;
use yamdb_common::{AppError, AppResult, IdGenerator};
use yamdb_db::{
    entities::{user, UserRole},
    repositories::UserRepository,
};

use crate::services::policy;

/// Admin user creation request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminUserInput {
    /// Username.
    #[validate(
        length(min = 1, max = 150),
        custom(function = "crate::services::auth::validate_username_charset")
    )]
    pub username: String,
    /// Email address.
    #[validate(email, length(max = 254))]
    pub email: String,
    /// First name.
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    /// Last name.
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    /// Profile biography.
    pub bio: Option<String>,
    /// Role, defaults to `user`.
    pub role: Option<UserRole>,
}

/// Admin user update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUserUpdateInput {
    #[validate(
        length(min = 1, max = 150),
        custom(function = "crate::services::auth::validate_username_charset")
    )]
    pub username: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

/// Self-service profile update. The role field is deliberately absent:
/// users cannot promote themselves.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdateInput {
    #[validate(
        length(min = 1, max = 150),
        custom(function = "crate::services::auth::validate_username_charset")
    )]
    pub username: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// User service for administration and profiles.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Look up a user by ID. Used by the auth layer and response hydration,
    /// so it carries no role gate.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(id).await
    }

    /// List users (admin only), paginated, with an optional username search.
    pub async fn list(
        &self,
        actor: &user::Model,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        if !policy::can_manage_users(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage users".to_string(),
            ));
        }
        self.user_repo.list(search, limit, offset).await
    }

    /// Look up a user by username (admin only).
    pub async fn get_by_username(
        &self,
        actor: &user::Model,
        username: &str,
    ) -> AppResult<user::Model> {
        if !policy::can_manage_users(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage users".to_string(),
            ));
        }
        self.user_repo.get_by_username(username).await
    }

    /// Create a user with an explicit role (admin only).
    pub async fn create(&self, actor: &user::Model, input: AdminUserInput) -> AppResult<user::Model> {
        if !policy::can_manage_users(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage users".to_string(),
            ));
        }
        input.validate()?;

        if input.username == "me" {
            return Err(AppError::Validation(
                "Username 'me' is reserved".to_string(),
            ));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            bio: Set(input.bio),
            role: Set(input.role.unwrap_or_default()),
            ..Default::default()
        };

        let created = self.user_repo.create(model).await?;
        tracing::info!(username = %created.username, role = ?created.role, "Admin created user");
        Ok(created)
    }

    /// Update a user by username (admin only).
    pub async fn update_by_username(
        &self,
        actor: &user::Model,
        username: &str,
        input: AdminUserUpdateInput,
    ) -> AppResult<user::Model> {
        if !policy::can_manage_users(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage users".to_string(),
            ));
        }
        input.validate()?;

        if input.username.as_deref() == Some("me") {
            return Err(AppError::Validation(
                "Username 'me' is reserved".to_string(),
            ));
        }

        let existing = self.user_repo.get_by_username(username).await?;
        let mut model = existing.into_active_model();

        if let Some(new_username) = input.username {
            model.username = Set(new_username);
        }
        if let Some(email) = input.email {
            model.email = Set(email);
        }
        if let Some(first_name) = input.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(bio) = input.bio {
            model.bio = Set(Some(bio));
        }
        if let Some(role) = input.role {
            model.role = Set(role);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }

    /// Delete a user by username (admin only). Their reviews and comments
    /// cascade.
    pub async fn delete_by_username(&self, actor: &user::Model, username: &str) -> AppResult<()> {
        if !policy::can_manage_users(actor) {
            return Err(AppError::Forbidden(
                "Only administrators may manage users".to_string(),
            ));
        }

        let existing = self.user_repo.get_by_username(username).await?;
        self.user_repo.delete(existing).await?;
        tracing::info!(username = %username, "Admin deleted user");
        Ok(())
    }

    /// Update the authenticated user's own profile. Role is untouched.
    pub async fn update_profile(
        &self,
        actor: &user::Model,
        input: ProfileUpdateInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if input.username.as_deref() == Some("me") {
            return Err(AppError::Validation(
                "Username 'me' is reserved".to_string(),
            ));
        }

        let mut model = actor.clone().into_active_model();

        if let Some(username) = input.username {
            model.username = Set(username);
        }
        if let Some(email) = input.email {
            model.email = Set(email);
        }
        if let Some(first_name) = input.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(bio) = input.bio {
            model.bio = Set(Some(bio));
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }
}
