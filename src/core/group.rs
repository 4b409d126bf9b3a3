//! Approval group business logic.
//!
//! Groups are named cohorts of users with an ordinal level. The level is
//! unique across groups, enforced here at create/edit time. Membership rows
//! are weak references to users; archived users are rejected when a roster
//! is written, though existing rosters keep historical members.

use crate::{
    entities::{ApprovalGroup, ApprovalGroupMember, User, approval_group, approval_group_member},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// An approval group together with its resolved member IDs.
///
/// This is the shape `core::policy::can_act` consumes for group-based
/// approval checks.
#[derive(Debug, Clone)]
pub struct GroupRoster {
    /// The group itself
    pub group: approval_group::Model,
    /// IDs of the member users
    pub member_ids: Vec<i64>,
}

/// Finds a group by ID together with its member IDs, returning None if the
/// group does not exist.
///
/// Generic over the connection so the workflow engine can resolve rosters
/// inside an open transaction.
pub async fn get_group_roster<C>(db: &C, group_id: i64) -> Result<Option<GroupRoster>>
where
    C: ConnectionTrait,
{
    let Some(group) = ApprovalGroup::find_by_id(group_id).one(db).await? else {
        return Ok(None);
    };

    let member_ids = ApprovalGroupMember::find()
        .filter(approval_group_member::Column::GroupId.eq(group_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();

    Ok(Some(GroupRoster { group, member_ids }))
}

/// Retrieves all approval groups ordered by level.
pub async fn get_all_groups(db: &DatabaseConnection) -> Result<Vec<approval_group::Model>> {
    ApprovalGroup::find()
        .order_by_asc(approval_group::Column::Level)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new approval group with the given members.
///
/// Validates that the name is non-empty, the level is in range and not used
/// by another group, and every member exists and is not archived. The group
/// row and its membership rows are inserted in one transaction.
pub async fn create_group(
    db: &DatabaseConnection,
    name: String,
    level: i32,
    member_ids: Vec<i64>,
) -> Result<GroupRoster> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Group name cannot be empty".to_string(),
        });
    }
    if !(crate::core::user::MIN_APPROVAL_LEVEL..=crate::core::user::MAX_APPROVAL_LEVEL)
        .contains(&level)
    {
        return Err(Error::Validation {
            message: format!("Group level must be between 1 and 3, got {level}"),
        });
    }

    if let Some(existing) = ApprovalGroup::find()
        .filter(approval_group::Column::Level.eq(level))
        .one(db)
        .await?
    {
        return Err(Error::Validation {
            message: format!(
                "Approval level {level} is already used by group '{}'",
                existing.name
            ),
        });
    }

    check_members_assignable(db, &member_ids).await?;

    let txn = db.begin().await?;

    let group = approval_group::ActiveModel {
        name: Set(name.trim().to_string()),
        level: Set(level),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for user_id in &member_ids {
        approval_group_member::ActiveModel {
            group_id: Set(group.id),
            user_id: Set(*user_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(GroupRoster { group, member_ids })
}

/// Replaces a group's membership with the given user IDs.
///
/// Every new member must exist and not be archived. The old roster is
/// removed and the new one inserted in one transaction.
pub async fn update_group_members(
    db: &DatabaseConnection,
    group_id: i64,
    member_ids: Vec<i64>,
) -> Result<GroupRoster> {
    let group = ApprovalGroup::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or(Error::GroupNotFound { id: group_id })?;

    check_members_assignable(db, &member_ids).await?;

    let txn = db.begin().await?;

    ApprovalGroupMember::delete_many()
        .filter(approval_group_member::Column::GroupId.eq(group_id))
        .exec(&txn)
        .await?;

    for user_id in &member_ids {
        approval_group_member::ActiveModel {
            group_id: Set(group_id),
            user_id: Set(*user_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(GroupRoster { group, member_ids })
}

/// Verifies that every user in `member_ids` exists and is not archived.
async fn check_members_assignable(db: &DatabaseConnection, member_ids: &[i64]) -> Result<()> {
    for user_id in member_ids {
        let user = User::find_by_id(*user_id)
            .one(db)
            .await?
            .ok_or(Error::UserNotFound { id: *user_id })?;

        if user.is_archived {
            return Err(Error::Validation {
                message: format!("Archived user '{}' cannot be added to a group", user.name),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::user::archive_user;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_group_with_members() -> Result<()> {
        let db = setup_test_db().await?;
        let u1 = create_test_user(&db, "Ana", 2).await?;
        let u2 = create_test_user(&db, "Ben", 2).await?;

        let roster = create_group(&db, "Senior approvers".to_string(), 2, vec![u1.id, u2.id])
            .await?;

        assert_eq!(roster.group.level, 2);
        assert_eq!(roster.member_ids.len(), 2);

        let fetched = get_group_roster(&db, roster.group.id).await?.unwrap();
        assert_eq!(fetched.member_ids.len(), 2);
        assert!(fetched.member_ids.contains(&u1.id));
        assert!(fetched.member_ids.contains(&u2.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_group_level_must_be_unique() -> Result<()> {
        let db = setup_test_db().await?;
        create_group(&db, "First".to_string(), 2, vec![]).await?;

        let result = create_group(&db, "Second".to_string(), 2, vec![]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        // A different level is fine
        create_group(&db, "Second".to_string(), 3, vec![]).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_group_rejects_archived_member() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Ana", 2).await?;
        archive_user(&db, user.id).await?;

        let result = create_group(&db, "Approvers".to_string(), 1, vec![user.id]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_group_rejects_unknown_member() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_group(&db, "Approvers".to_string(), 1, vec![999]).await;
        assert!(matches!(result.unwrap_err(), Error::UserNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_group_members_replaces_roster() -> Result<()> {
        let db = setup_test_db().await?;
        let u1 = create_test_user(&db, "Ana", 2).await?;
        let u2 = create_test_user(&db, "Ben", 2).await?;

        let roster = create_group(&db, "Approvers".to_string(), 1, vec![u1.id]).await?;
        let updated = update_group_members(&db, roster.group.id, vec![u2.id]).await?;

        assert_eq!(updated.member_ids, vec![u2.id]);

        let fetched = get_group_roster(&db, roster.group.id).await?.unwrap();
        assert_eq!(fetched.member_ids, vec![u2.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_members_unknown_group() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_group_members(&db, 999, vec![]).await;
        assert!(matches!(result.unwrap_err(), Error::GroupNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_group_roster_missing() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_group_roster(&db, 42).await?.is_none());
        Ok(())
    }
}
