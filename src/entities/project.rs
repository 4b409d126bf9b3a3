//! Project entity - The central entity of the approval and funding core.
//!
//! A project belongs to a property, carries a budget and a funding schedule,
//! and moves through its lifecycle only via the workflow engine once it has
//! been submitted for approval.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProjectStatus {
    /// Being drafted, not yet submitted
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Created and awaiting submission
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Submitted and awaiting an approval decision
    #[sea_orm(string_value = "pending-approval")]
    PendingApproval,
    /// Approved by a qualified approver
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Approved and being planned
    #[sea_orm(string_value = "planning")]
    Planning,
    /// Work underway
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    /// Work finished
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Paused; resumes to the status recorded in `held_from`
    #[sea_orm(string_value = "on-hold")]
    OnHold,
    /// Rejected by an approver
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Priority of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum ProjectPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

/// How a project's approval requirement is satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum ApprovalType {
    /// A single assigned approver of sufficient level decides
    #[sea_orm(string_value = "single")]
    Single,
    /// Any member of the assigned approval group decides
    #[sea_orm(string_value = "group")]
    Group,
}

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the property this project belongs to
    pub property_id: i64,
    /// Human-readable name of the project
    pub name: String,
    /// Longer description, optional
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Total budget in dollars, fixed-point decimal
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub budget: Decimal,
    /// Current lifecycle status
    pub status: ProjectStatus,
    /// Priority of the project
    pub priority: ProjectPriority,
    /// Single-approver or group-based approval
    pub approval_type: ApprovalType,
    /// Minimum approver authority tier required (1-3)
    pub approval_level: i32,
    /// Assigned approver (single mode); set to the acting user on decision
    #[sea_orm(nullable)]
    pub assigned_approver_id: Option<i64>,
    /// Assigned approval group (group mode)
    #[sea_orm(nullable)]
    pub assigned_approval_group_id: Option<i64>,
    /// Status the project held immediately before being put on hold
    #[sea_orm(nullable)]
    pub held_from: Option<ProjectStatus>,
    /// User who created the project
    pub created_by: i64,
    /// When the project was created
    pub created_at: DateTimeUtc,
    /// When the project was last mutated through the workflow engine
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each project belongs to one property
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
    /// One project owns many funding entries
    #[sea_orm(has_many = "super::funding_detail::Entity")]
    FundingDetails,
    /// One project accumulates many approval history records
    #[sea_orm(has_many = "super::approval_history::Entity")]
    ApprovalHistory,
    /// One project may have many tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::funding_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundingDetails.def()
    }
}

impl Related<super::approval_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalHistory.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
