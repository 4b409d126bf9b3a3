//! User directory business logic.
//!
//! Provides lookups used by the workflow engine to resolve approval levels
//! and group membership, plus the administrative create/archive operations.
//! Users are never hard-deleted: archiving keeps history references valid
//! while making the user unassignable.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Lowest valid approval level.
pub const MIN_APPROVAL_LEVEL: i32 = 1;
/// Highest valid approval level.
pub const MAX_APPROVAL_LEVEL: i32 = 3;

/// Finds a user by ID, returning None if not found.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Retrieves all non-archived users, ordered alphabetically by name.
///
/// Used to populate approver pickers; archived users are excluded because
/// they must not be assigned to new approvals.
pub async fn get_active_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::IsArchived.eq(false))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new user, validating the name, email, and approval level.
pub async fn create_user(
    db: &DatabaseConnection,
    name: String,
    email: String,
    role: user::UserRole,
    approval_level: i32,
    permissions: Vec<String>,
) -> Result<user::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "User name cannot be empty".to_string(),
        });
    }
    if email.trim().is_empty() {
        return Err(Error::Validation {
            message: "User email cannot be empty".to_string(),
        });
    }
    if !(MIN_APPROVAL_LEVEL..=MAX_APPROVAL_LEVEL).contains(&approval_level) {
        return Err(Error::Validation {
            message: format!(
                "Approval level must be between {MIN_APPROVAL_LEVEL} and {MAX_APPROVAL_LEVEL}, got {approval_level}"
            ),
        });
    }

    let user = user::ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(email.trim().to_string()),
        role: Set(role),
        approval_level: Set(approval_level),
        permissions: Set(serde_json::json!(permissions)),
        is_archived: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = user.insert(db).await?;
    Ok(result)
}

/// Archives a user (soft delete).
///
/// The user stays referenceable from approval history and group rosters but
/// can no longer be assigned as an approver or added to a group, and cannot
/// act on pending approvals.
pub async fn archive_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let mut active: user::ActiveModel = user.into();
    active.is_archived = Set(true);
    active.update(db).await.map_err(Into::into)
}

/// Whether a user carries the given capability tag.
#[must_use]
pub fn has_permission(user: &user::Model, tag: &str) -> bool {
    user.permissions
        .as_array()
        .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some(tag)))
}
