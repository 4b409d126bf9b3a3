//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    core::{user, workflow},
    entities::{self, project::ApprovalType, project::ProjectPriority, user::UserRole},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with the given approval level.
///
/// # Defaults
/// * `email`: derived from the name
/// * `role`: manager
/// * `permissions`: empty
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    approval_level: i32,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        name.to_string(),
        format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        UserRole::Manager,
        approval_level,
        vec![],
    )
    .await
}

/// Creates a test property with a fixed address.
pub async fn create_test_property(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::property::Model> {
    entities::property::ActiveModel {
        name: Set(name.to_string()),
        address: Set("1 Main St".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Builds a single-approver project draft with sensible defaults.
///
/// # Defaults
/// * `budget`: 10000
/// * `approval_level`: 3
/// * `status`: unset (defaults to pending on creation)
/// * `funding_details`: empty
#[must_use]
pub fn test_project_draft(
    property_id: i64,
    created_by: i64,
    approver_id: i64,
) -> workflow::ProjectDraft {
    workflow::ProjectDraft {
        property_id,
        name: "Roof replacement".to_string(),
        description: None,
        budget: Decimal::from(10_000),
        status: None,
        priority: ProjectPriority::Medium,
        approval_type: ApprovalType::Single,
        approval_level: 3,
        approver_id: Some(approver_id),
        approval_group_id: None,
        created_by,
        funding_details: vec![],
    }
}

/// Builds a progress-type funding draft due 2026-09-01.
#[must_use]
pub fn test_funding_draft(amount: i64) -> workflow::FundingEntryDraft {
    workflow::FundingEntryDraft {
        funding_type: entities::funding_detail::FundingType::Progress,
        amount: Decimal::from(amount),
        due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
    }
}

/// A complete test environment around one project.
pub struct ProjectContext {
    /// The property the project belongs to
    pub property: entities::property::Model,
    /// The user who created the project
    pub creator: entities::user::Model,
    /// A level-3 user assigned as the project's approver
    pub approver: entities::user::Model,
    /// The project itself, in `pending` status with an empty schedule
    pub project: entities::project::Model,
}

/// Sets up a database with a property, a creator, a level-3 approver, and a
/// pending single-approver project. Returns (db, context) for common
/// workflow test scenarios.
pub async fn setup_with_project() -> Result<(DatabaseConnection, ProjectContext)> {
    let db = setup_test_db().await?;
    let property = create_test_property(&db, "Oak House").await?;
    let creator = create_test_user(&db, "Ana", 1).await?;
    let approver = create_test_user(&db, "Ben", 3).await?;

    let draft = test_project_draft(property.id, creator.id, approver.id);
    let (project, _) = workflow::create_project(&db, draft).await?;

    Ok((
        db,
        ProjectContext {
            property,
            creator,
            approver,
            project,
        },
    ))
}
