//! FundingDetail entity - One scheduled disbursement in a project's funding
//! schedule.
//!
//! Entries are owned by their project and deleted with it. Payment state is
//! tracked per entry; `paid_date` and `paid_by` are set together when an
//! entry transitions to paid and cleared together when it reverts to unpaid.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of scheduled disbursement
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
pub enum FundingType {
    /// Up-front deposit
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Progress payment tied to work milestones
    #[sea_orm(string_value = "progress")]
    Progress,
    /// Final payment on completion
    #[sea_orm(string_value = "final")]
    Final,
    /// General budget allocation
    #[sea_orm(string_value = "budget")]
    Budget,
}

/// Payment state of a funding entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Funding entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "funding_details")]
pub struct Model {
    /// Unique identifier for the funding entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the project this entry belongs to
    pub project_id: i64,
    /// Kind of disbursement (deposit, progress, final, budget)
    pub funding_type: FundingType,
    /// Amount in dollars, fixed-point decimal, always positive
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    /// Due date of the disbursement
    pub due_date: Date,
    /// Whether this entry has been paid
    pub payment_status: PaymentStatus,
    /// When the entry was paid; null while unpaid
    #[sea_orm(nullable)]
    pub paid_date: Option<DateTimeUtc>,
    /// User who recorded the payment; null while unpaid
    #[sea_orm(nullable)]
    pub paid_by: Option<i64>,
}

/// Defines relationships between FundingDetail and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each funding entry belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
