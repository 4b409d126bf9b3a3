//! User entity - Represents members of the user directory.
//!
//! Each user carries a role, an approval level (authority tier 1-3), and a
//! set of capability tags. Users are archived rather than deleted so that
//! approval history referencing them stays valid.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserRole {
    /// Full administrative access, manages users and reference data
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Manages properties and projects
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Regular user
    #[sea_orm(string_value = "user")]
    User,
}

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login / contact email, unique across the directory
    #[sea_orm(unique)]
    pub email: String,
    /// Role of the user (admin, manager, user)
    pub role: UserRole,
    /// Authority tier for single-approver gating (1-3, higher subsumes lower)
    pub approval_level: i32,
    /// Capability tags stored as a JSON array of strings
    pub permissions: Json,
    /// Soft-delete flag - archived users keep their history but cannot be
    /// assigned as approvers or group members
    pub is_archived: bool,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user appears in many approval history records
    #[sea_orm(has_many = "super::approval_history::Entity")]
    ApprovalHistory,
    /// One user may belong to many approval groups
    #[sea_orm(has_many = "super::approval_group_member::Entity")]
    GroupMemberships,
}

impl Related<super::approval_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalHistory.def()
    }
}

impl Related<super::approval_group_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
