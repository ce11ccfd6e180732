//! Authorization policy predicates.
//!
//! Pure functions over a user model. Services check existence of the target
//! first, then consult these; a missing parent therefore surfaces as
//! `NotFound`, never `Forbidden`.

use yamdb_db::entities::user;

/// Whether the actor may create or modify catalog records (categories,
/// genres, titles). Reserved for admins.
#[must_use]
pub fn can_manage_catalog(actor: &user::Model) -> bool {
    actor.is_staff()
}

/// Whether the actor may administer user accounts.
#[must_use]
pub fn can_manage_users(actor: &user::Model) -> bool {
    actor.is_staff()
}

/// Whether the actor may edit or delete a review or comment written by
/// `author_id`. Authors keep control of their own contributions; moderators
/// and admins may act on anyone's.
#[must_use]
pub fn can_modify_contribution(actor: &user::Model, author_id: &str) -> bool {
    actor.id == author_id || actor.is_moderator() || actor.is_staff()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use yamdb_db::entities::UserRole;

    fn user_with(id: &str, role: UserRole, is_superuser: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            bio: None,
            role,
            is_superuser,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_catalog_admin_only() {
        assert!(can_manage_catalog(&user_with("a", UserRole::Admin, false)));
        assert!(!can_manage_catalog(&user_with(
            "m",
            UserRole::Moderator,
            false
        )));
        assert!(!can_manage_catalog(&user_with("u", UserRole::User, false)));
    }

    #[test]
    fn test_catalog_superuser_bypasses_role() {
        assert!(can_manage_catalog(&user_with("s", UserRole::User, true)));
    }

    #[test]
    fn test_user_admin_admin_only() {
        assert!(can_manage_users(&user_with("a", UserRole::Admin, false)));
        assert!(!can_manage_users(&user_with(
            "m",
            UserRole::Moderator,
            false
        )));
        assert!(!can_manage_users(&user_with("u", UserRole::User, false)));
    }

    #[test]
    fn test_author_may_modify_own_contribution() {
        let author = user_with("u1", UserRole::User, false);
        assert!(can_modify_contribution(&author, "u1"));
    }

    #[test]
    fn test_other_user_may_not_modify() {
        let other = user_with("u2", UserRole::User, false);
        assert!(!can_modify_contribution(&other, "u1"));
    }

    #[test]
    fn test_moderator_may_modify_any_contribution() {
        let moderator = user_with("m1", UserRole::Moderator, false);
        assert!(can_modify_contribution(&moderator, "u1"));
    }

    #[test]
    fn test_admin_may_modify_any_contribution() {
        let admin = user_with("a1", UserRole::Admin, false);
        assert!(can_modify_contribution(&admin, "u1"));
    }

    #[test]
    fn test_superuser_may_modify_any_contribution() {
        let superuser = user_with("s1", UserRole::User, true);
        assert!(can_modify_contribution(&superuser, "u1"));
    }
}
