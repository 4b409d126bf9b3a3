//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod approval_group;
pub mod approval_group_member;
pub mod approval_history;
pub mod funding_detail;
pub mod project;
pub mod property;
pub mod task;
pub mod user;

// Re-export specific types to avoid conflicts
pub use approval_group::{
    Column as ApprovalGroupColumn, Entity as ApprovalGroup, Model as ApprovalGroupModel,
};
pub use approval_group_member::{
    Column as ApprovalGroupMemberColumn, Entity as ApprovalGroupMember,
    Model as ApprovalGroupMemberModel,
};
pub use approval_history::{
    Column as ApprovalHistoryColumn, Entity as ApprovalHistory, Model as ApprovalHistoryModel,
};
pub use funding_detail::{
    Column as FundingDetailColumn, Entity as FundingDetail, Model as FundingDetailModel,
};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};
pub use property::{Column as PropertyColumn, Entity as Property, Model as PropertyModel};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
