//! ApprovalGroup entity - A named cohort of users who may jointly satisfy a
//! project's approval requirement.
//!
//! Each group carries an ordinal level; the level is unique across groups,
//! enforced at create/edit time by `core::group`, not by the store.
//! Membership lives in the `approval_group_members` join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Approval group database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_groups")]
pub struct Model {
    /// Unique identifier for the group
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the group
    pub name: String,
    /// Authority tier of the group (1-3), unique across groups
    pub level: i32,
    /// When the group was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ApprovalGroup and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One group has many member rows
    #[sea_orm(has_many = "super::approval_group_member::Entity")]
    Members,
}

impl Related<super::approval_group_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
