//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User roles.
///
/// A closed enumeration: all role checks go through the predicate methods on
/// [`Model`] instead of comparing strings at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "moderator")]
    Moderator,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(nullable)]
    pub first_name: Option<String>,

    #[sea_orm(nullable)]
    pub last_name: Option<String>,

    /// Profile biography
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    pub role: UserRole,

    /// Superusers are treated as admins regardless of the stored role
    #[sea_orm(default_value = false)]
    pub is_superuser: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The role this user acts with: superusers are always coerced to admin.
    #[must_use]
    pub fn effective_role(&self) -> UserRole {
        if self.is_superuser {
            UserRole::Admin
        } else {
            self.role
        }
    }

    /// Whether this user acts as an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.effective_role() == UserRole::Admin
    }

    /// Whether this user acts as a moderator.
    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.effective_role() == UserRole::Moderator
    }

    /// Derived staff flag: true iff the effective role is admin.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_admin()
    }
}
