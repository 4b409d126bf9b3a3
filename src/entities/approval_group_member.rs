//! ApprovalGroupMember entity - Join table for approval group membership.
//!
//! Weak references: the group does not own its users, and rows are written
//! only through `core::group`, which rejects archived users.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group membership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_group_members")]
pub struct Model {
    /// Group ID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i64,
    /// User ID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
}

/// Defines relationships between ApprovalGroupMember and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each membership row belongs to one group
    #[sea_orm(
        belongs_to = "super::approval_group::Entity",
        from = "Column::GroupId",
        to = "super::approval_group::Column::Id"
    )]
    Group,
    /// Each membership row references one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::approval_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
