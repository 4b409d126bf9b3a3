//! ApprovalHistory entity - Immutable audit log of approval actions.
//!
//! Records are append-only and never edited or deleted. Every successful
//! status-changing approval action on a project appends exactly one record
//! in the same database transaction as the status change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision recorded by an approver
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ApprovalAction {
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Feedback recorded without leaving the pending state
    #[sea_orm(string_value = "requested-changes")]
    RequestedChanges,
}

/// Approval history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_history")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the project the action was taken on
    pub project_id: i64,
    /// User who took the action
    pub approver_id: i64,
    /// The decision taken
    pub action: ApprovalAction,
    /// Reviewer comments; required for reject/request-changes, optional for
    /// approve
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    /// When the action was taken
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ApprovalHistory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// Each record references the acting user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ApproverId",
        to = "super::user::Column::Id"
    )]
    Approver,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
