//! Project read accessors - queries over projects, funding schedules, and
//! approval history, plus task-derived progress.
//!
//! Everything here is read-only; mutations go through `core::workflow`.
//! These functions back the dashboard and forecast views of the UI layer.

use crate::{
    core::funding,
    entities::{
        ApprovalHistory, FundingDetail, Project, Task, approval_history, funding_detail, project,
        project::ProjectStatus, task,
        task::TaskStatus,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};

/// Finds a project by ID, returning None if not found.
pub async fn get_project_by_id(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<project::Model>> {
    Project::find_by_id(project_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all projects under a property, newest first.
pub async fn get_projects_for_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Vec<project::Model>> {
    Project::find()
        .filter(project::Column::PropertyId.eq(property_id))
        .order_by_desc(project::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all projects in a given status, newest first.
///
/// The approval dashboard uses this with `PendingApproval` to build its
/// queue.
pub async fn get_projects_by_status(
    db: &DatabaseConnection,
    status: ProjectStatus,
) -> Result<Vec<project::Model>> {
    Project::find()
        .filter(project::Column::Status.eq(status))
        .order_by_desc(project::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a project's funding schedule ordered by due date.
pub async fn get_funding_for_project(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<funding_detail::Model>> {
    FundingDetail::find()
        .filter(funding_detail::Column::ProjectId.eq(project_id))
        .order_by_asc(funding_detail::Column::DueDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the current schedule report for a project.
pub async fn get_schedule_report(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<funding::ScheduleReport> {
    let project = Project::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    let entries = get_funding_for_project(db, project_id).await?;
    let schedule: Vec<funding::ScheduleEntry> =
        entries.iter().map(funding::ScheduleEntry::from).collect();
    Ok(funding::validate_schedule(&schedule, project.budget))
}

/// Retrieves funding entries due in the given inclusive date window, across
/// all projects, ordered by due date. Feeds the disbursement forecast.
pub async fn get_funding_due_between(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<funding_detail::Model>> {
    FundingDetail::find()
        .filter(funding_detail::Column::DueDate.gte(start))
        .filter(funding_detail::Column::DueDate.lte(end))
        .order_by_asc(funding_detail::Column::DueDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a project's approval history, newest first.
pub async fn get_history_for_project(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<approval_history::Model>> {
    ApprovalHistory::find()
        .filter(approval_history::Column::ProjectId.eq(project_id))
        .order_by_desc(approval_history::Column::CreatedAt)
        .order_by_desc(approval_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes a project's progress percentage from its tasks.
///
/// Progress is completed tasks over total tasks; a project with no tasks
/// reports 0.
pub async fn project_progress(db: &DatabaseConnection, project_id: i64) -> Result<f64> {
    let tasks = Task::find()
        .filter(task::Column::ProjectId.eq(project_id))
        .all(db)
        .await?;

    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    Ok(calculate_progress(completed, tasks.len()))
}

/// Calculates a progress percentage from completed and total counts.
///
/// Returns 0 when there is nothing to count.
#[must_use]
pub fn calculate_progress(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    // Cast safety: task counts are far below 2^52, so the conversion to f64
    // is exact.
    #[allow(clippy::cast_precision_loss)]
    {
        (completed as f64 / total as f64) * 100.0
    }
}
