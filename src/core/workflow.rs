//! Workflow engine - the sole mutation entry point over projects, funding
//! schedules, and approval history.
//!
//! Every operation validates its preconditions with a typed error before
//! touching the store, and every multi-row mutation runs inside a database
//! transaction so the project status change and its audit record commit
//! together or not at all. Status transitions use a compare-and-swap on the
//! current status (rows-affected checked), so two racing approvals on the
//! same project cannot both win.

use crate::{
    core::{funding, group, policy},
    entities::{
        FundingDetail, Project, User, approval_history,
        approval_history::ApprovalAction,
        funding_detail,
        funding_detail::{FundingType, PaymentStatus},
        project,
        project::{ApprovalType, ProjectPriority, ProjectStatus},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::info;

/// A not-yet-persisted funding entry, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct FundingEntryDraft {
    /// Kind of disbursement
    pub funding_type: FundingType,
    /// Amount in dollars
    pub amount: Decimal,
    /// Due date; may be absent while the caller is still composing the entry
    pub due_date: Option<NaiveDate>,
}

impl FundingEntryDraft {
    fn as_schedule_entry(&self) -> funding::ScheduleEntry {
        funding::ScheduleEntry {
            amount: self.amount,
            due_date: self.due_date,
        }
    }
}

/// Everything needed to create a project.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    /// Owning property
    pub property_id: i64,
    /// Project name
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Total budget in dollars
    pub budget: Decimal,
    /// Initial status; defaults to `Pending` when unset
    pub status: Option<ProjectStatus>,
    /// Priority
    pub priority: ProjectPriority,
    /// Single-approver or group-based approval
    pub approval_type: ApprovalType,
    /// Minimum approver authority tier (1-3)
    pub approval_level: i32,
    /// Assigned approver; required for single mode, forbidden for group mode
    pub approver_id: Option<i64>,
    /// Assigned approval group; required for group mode, forbidden for single
    pub approval_group_id: Option<i64>,
    /// Creating user
    pub created_by: i64,
    /// Initial funding schedule
    pub funding_details: Vec<FundingEntryDraft>,
}

/// Creates a project together with its funding schedule.
///
/// Validates the budget, approval level, funding schedule, and approver
/// assignment before any mutation; the project row and its funding entries
/// are then inserted in one transaction.
pub async fn create_project(
    db: &DatabaseConnection,
    draft: ProjectDraft,
) -> Result<(project::Model, Vec<funding_detail::Model>)> {
    if draft.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Project name cannot be empty".to_string(),
        });
    }
    if draft.budget <= Decimal::ZERO {
        return Err(Error::Validation {
            message: format!("Project budget must be positive, got {}", draft.budget),
        });
    }
    if !(crate::core::user::MIN_APPROVAL_LEVEL..=crate::core::user::MAX_APPROVAL_LEVEL)
        .contains(&draft.approval_level)
    {
        return Err(Error::Validation {
            message: format!(
                "Approval level must be between 1 and 3, got {}",
                draft.approval_level
            ),
        });
    }

    check_schedule_submittable(&draft.funding_details, draft.budget)?;

    crate::entities::Property::find_by_id(draft.property_id)
        .one(db)
        .await?
        .ok_or(Error::PropertyNotFound {
            id: draft.property_id,
        })?;

    match draft.approval_type {
        ApprovalType::Single => {
            if draft.approval_group_id.is_some() {
                return Err(Error::Validation {
                    message: "Single-approver projects cannot carry an approval group".to_string(),
                });
            }
            let approver_id = draft.approver_id.ok_or_else(|| Error::Validation {
                message: "Single-approver projects need an assigned approver".to_string(),
            })?;
            let approver = User::find_by_id(approver_id)
                .one(db)
                .await?
                .ok_or(Error::UserNotFound { id: approver_id })?;
            if approver.is_archived {
                return Err(Error::Validation {
                    message: format!(
                        "Archived user '{}' cannot be assigned as approver",
                        approver.name
                    ),
                });
            }
            if approver.approval_level < draft.approval_level {
                return Err(Error::Validation {
                    message: format!(
                        "Approver '{}' (level {}) is below the project's required level {}",
                        approver.name, approver.approval_level, draft.approval_level
                    ),
                });
            }
        }
        ApprovalType::Group => {
            if draft.approver_id.is_some() {
                return Err(Error::Validation {
                    message: "Group-approved projects cannot carry a single approver".to_string(),
                });
            }
            let group_id = draft.approval_group_id.ok_or_else(|| Error::Validation {
                message: "Group-approved projects need an assigned approval group".to_string(),
            })?;
            group::get_group_roster(db, group_id)
                .await?
                .ok_or(Error::GroupNotFound { id: group_id })?;
        }
    }

    let now = chrono::Utc::now();
    let txn = db.begin().await?;

    let project = project::ActiveModel {
        property_id: Set(draft.property_id),
        name: Set(draft.name.trim().to_string()),
        description: Set(draft.description),
        budget: Set(draft.budget),
        status: Set(draft.status.unwrap_or(ProjectStatus::Pending)),
        priority: Set(draft.priority),
        approval_type: Set(draft.approval_type),
        approval_level: Set(draft.approval_level),
        assigned_approver_id: Set(draft.approver_id),
        assigned_approval_group_id: Set(draft.approval_group_id),
        held_from: Set(None),
        created_by: Set(draft.created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut entries = Vec::with_capacity(draft.funding_details.len());
    for entry in draft.funding_details {
        // Dates were checked above; a missing one cannot reach this point
        let due_date = entry.due_date.ok_or_else(|| Error::Validation {
            message: "Funding entry needs a due date".to_string(),
        })?;
        let model = funding_detail::ActiveModel {
            project_id: Set(project.id),
            funding_type: Set(entry.funding_type),
            amount: Set(entry.amount),
            due_date: Set(due_date),
            payment_status: Set(PaymentStatus::Unpaid),
            paid_date: Set(None),
            paid_by: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        entries.push(model);
    }

    txn.commit().await?;

    info!(
        project_id = project.id,
        property_id = project.property_id,
        "created project with {} funding entries",
        entries.len()
    );
    Ok((project, entries))
}

/// Submits a draft/pending project for approval.
///
/// The funding schedule must be valid at this point: over-budget or
/// incomplete schedules may exist while composing, but block submission.
pub async fn submit_for_approval(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<project::Model> {
    let project = get_project(db, project_id).await?;

    if !matches!(
        project.status,
        ProjectStatus::Draft | ProjectStatus::Pending
    ) {
        return Err(Error::InvalidState {
            message: format!(
                "Project {project_id} cannot be submitted from status '{:?}'",
                project.status
            ),
        });
    }

    let entries = FundingDetail::find()
        .filter(funding_detail::Column::ProjectId.eq(project_id))
        .all(db)
        .await?;
    let schedule: Vec<funding::ScheduleEntry> =
        entries.iter().map(funding::ScheduleEntry::from).collect();
    let report = funding::validate_schedule(&schedule, project.budget);
    if !report.valid {
        if report.total_allocated > project.budget {
            return Err(Error::BudgetExceeded {
                total: report.total_allocated,
                budget: project.budget,
            });
        }
        return Err(Error::Validation {
            message: "Every funding entry needs a positive amount and a due date".to_string(),
        });
    }

    transition_status(db, project_id, project.status, ProjectStatus::PendingApproval).await?;
    info!(project_id, "project submitted for approval");
    get_project(db, project_id).await
}

/// Records an approval decision on a pending project.
///
/// Preconditions, in order: the project exists and is awaiting approval
/// (invalid-state), the acting user is authorized under the approval policy
/// (unauthorized), and a comment is present unless the action is an
/// approval (validation). The status change and the history record are
/// committed in one transaction; the acting user becomes the project's
/// assigned approver.
pub async fn submit_approval(
    db: &DatabaseConnection,
    project_id: i64,
    user_id: i64,
    action: ApprovalAction,
    comments: Option<String>,
) -> Result<(project::Model, approval_history::Model)> {
    let txn = db.begin().await?;

    let project = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    if project.status != ProjectStatus::PendingApproval {
        return Err(Error::InvalidState {
            message: format!(
                "Project {project_id} is not awaiting approval (status '{:?}')",
                project.status
            ),
        });
    }

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let roster = match (project.approval_type, project.assigned_approval_group_id) {
        (ApprovalType::Group, Some(group_id)) => group::get_group_roster(&txn, group_id).await?,
        _ => None,
    };

    if !policy::can_act(&user, &project, roster.as_ref()) {
        return Err(Error::Unauthorized { user_id });
    }

    let comment = comments.filter(|c| !c.trim().is_empty());
    if policy::requires_comment(action) && comment.is_none() {
        return Err(Error::Validation {
            message: "A comment is required when rejecting or requesting changes".to_string(),
        });
    }

    let new_status = policy::resolve_transition(action);
    let now = chrono::Utc::now();

    // Compare-and-swap on the pending status: a concurrent decision that
    // committed first leaves zero rows to update here.
    let updated = Project::update_many()
        .col_expr(project::Column::Status, Expr::value(new_status))
        .col_expr(project::Column::AssignedApproverId, Expr::value(Some(user_id)))
        .col_expr(project::Column::UpdatedAt, Expr::value(now))
        .filter(project::Column::Id.eq(project_id))
        .filter(project::Column::Status.eq(ProjectStatus::PendingApproval))
        .exec(&txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(Error::InvalidState {
            message: format!("Project {project_id} was decided concurrently"),
        });
    }

    let record = approval_history::ActiveModel {
        project_id: Set(project_id),
        approver_id: Set(user_id),
        action: Set(action),
        comments: Set(comment),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        project_id,
        approver_id = user_id,
        ?action,
        "recorded approval decision"
    );
    let project = get_project(db, project_id).await?;
    Ok((project, record))
}

/// Updates the payment state of one funding entry.
///
/// The entry must belong to the given project. Marking paid requires the
/// recording user and fails if the entry is already paid; marking unpaid
/// clears the payment fields. Sibling entries and the project itself are
/// untouched.
pub async fn update_payment_status(
    db: &DatabaseConnection,
    project_id: i64,
    funding_id: i64,
    new_status: PaymentStatus,
    paid_by: Option<i64>,
) -> Result<funding_detail::Model> {
    let entry = FundingDetail::find_by_id(funding_id)
        .one(db)
        .await?
        .filter(|e| e.project_id == project_id)
        .ok_or(Error::FundingEntryNotFound { id: funding_id })?;

    let updated = match new_status {
        PaymentStatus::Paid => {
            let paid_by = paid_by.ok_or_else(|| Error::Validation {
                message: "Marking an entry paid requires the recording user".to_string(),
            })?;
            funding::mark_paid(entry.clone(), paid_by, chrono::Utc::now())?
        }
        PaymentStatus::Unpaid => funding::mark_unpaid(entry.clone()),
    };

    let mut active: funding_detail::ActiveModel = entry.into();
    active.payment_status = Set(updated.payment_status);
    active.paid_date = Set(updated.paid_date);
    active.paid_by = Set(updated.paid_by);
    active.update(db).await.map_err(Into::into)
}

/// Appends a funding entry to a project's schedule and reports the
/// schedule's validity afterwards.
///
/// Matching the composing behavior of the funding form, an over-budget
/// addition is accepted here and surfaced via the report; submission is
/// where invalid schedules are blocked.
pub async fn add_funding_entry(
    db: &DatabaseConnection,
    project_id: i64,
    draft: FundingEntryDraft,
) -> Result<(funding_detail::Model, funding::ScheduleReport)> {
    let project = get_project(db, project_id).await?;

    if draft.amount <= Decimal::ZERO {
        return Err(Error::Validation {
            message: format!("Funding amount must be positive, got {}", draft.amount),
        });
    }
    let due_date = draft.due_date.ok_or_else(|| Error::Validation {
        message: "Funding entry needs a due date".to_string(),
    })?;

    let entry = funding_detail::ActiveModel {
        project_id: Set(project_id),
        funding_type: Set(draft.funding_type),
        amount: Set(draft.amount),
        due_date: Set(due_date),
        payment_status: Set(PaymentStatus::Unpaid),
        paid_date: Set(None),
        paid_by: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let report = schedule_report(db, project_id, project.budget).await?;
    Ok((entry, report))
}

/// Replaces the amount, type, and due date of an unpaid funding entry and
/// reports the schedule's validity afterwards.
pub async fn update_funding_entry(
    db: &DatabaseConnection,
    project_id: i64,
    funding_id: i64,
    draft: FundingEntryDraft,
) -> Result<(funding_detail::Model, funding::ScheduleReport)> {
    let project = get_project(db, project_id).await?;

    let entry = FundingDetail::find_by_id(funding_id)
        .one(db)
        .await?
        .filter(|e| e.project_id == project_id)
        .ok_or(Error::FundingEntryNotFound { id: funding_id })?;

    if entry.payment_status == PaymentStatus::Paid {
        return Err(Error::InvalidState {
            message: format!("Paid funding entry {funding_id} cannot be edited"),
        });
    }
    if draft.amount <= Decimal::ZERO {
        return Err(Error::Validation {
            message: format!("Funding amount must be positive, got {}", draft.amount),
        });
    }
    let due_date = draft.due_date.ok_or_else(|| Error::Validation {
        message: "Funding entry needs a due date".to_string(),
    })?;

    let mut active: funding_detail::ActiveModel = entry.into();
    active.funding_type = Set(draft.funding_type);
    active.amount = Set(draft.amount);
    active.due_date = Set(due_date);
    let updated = active.update(db).await?;

    let report = schedule_report(db, project_id, project.budget).await?;
    Ok((updated, report))
}

/// Removes an unpaid funding entry and reports the schedule's validity
/// afterwards.
pub async fn remove_funding_entry(
    db: &DatabaseConnection,
    project_id: i64,
    funding_id: i64,
) -> Result<funding::ScheduleReport> {
    let project = get_project(db, project_id).await?;

    let entry = FundingDetail::find_by_id(funding_id)
        .one(db)
        .await?
        .filter(|e| e.project_id == project_id)
        .ok_or(Error::FundingEntryNotFound { id: funding_id })?;

    if entry.payment_status == PaymentStatus::Paid {
        return Err(Error::InvalidState {
            message: format!("Paid funding entry {funding_id} cannot be removed"),
        });
    }

    entry.delete(db).await?;
    schedule_report(db, project_id, project.budget).await
}

/// Changes a project's budget.
///
/// Lowering the budget below the already-allocated funding total is
/// blocked, so a budget edit can never leave the schedule over-allocated.
pub async fn update_budget(
    db: &DatabaseConnection,
    project_id: i64,
    new_budget: Decimal,
) -> Result<project::Model> {
    if new_budget <= Decimal::ZERO {
        return Err(Error::Validation {
            message: format!("Project budget must be positive, got {new_budget}"),
        });
    }

    let project = get_project(db, project_id).await?;
    let report = schedule_report(db, project_id, new_budget).await?;
    if report.total_allocated > new_budget {
        return Err(Error::BudgetExceeded {
            total: report.total_allocated,
            budget: new_budget,
        });
    }

    let mut active: project::ActiveModel = project.into();
    active.budget = Set(new_budget);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Puts an active project on hold, remembering the status it held so
/// [`resume_project`] can restore it.
pub async fn hold_project(db: &DatabaseConnection, project_id: i64) -> Result<project::Model> {
    let project = get_project(db, project_id).await?;

    if !matches!(
        project.status,
        ProjectStatus::Approved | ProjectStatus::Planning | ProjectStatus::InProgress
    ) {
        return Err(Error::InvalidState {
            message: format!(
                "Project {project_id} cannot be put on hold from status '{:?}'",
                project.status
            ),
        });
    }

    let prior = project.status;
    let mut active: project::ActiveModel = project.into();
    active.status = Set(ProjectStatus::OnHold);
    active.held_from = Set(Some(prior));
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;
    info!(project_id, ?prior, "project put on hold");
    Ok(updated)
}

/// Resumes a held project, returning it to the status recorded when it was
/// put on hold (falling back to planning for records that predate the
/// snapshot).
pub async fn resume_project(db: &DatabaseConnection, project_id: i64) -> Result<project::Model> {
    let project = get_project(db, project_id).await?;

    if project.status != ProjectStatus::OnHold {
        return Err(Error::InvalidState {
            message: format!("Project {project_id} is not on hold"),
        });
    }

    let target = project.held_from.unwrap_or(ProjectStatus::Planning);
    let mut active: project::ActiveModel = project.into();
    active.status = Set(target);
    active.held_from = Set(None);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;
    info!(project_id, ?target, "project resumed");
    Ok(updated)
}

/// Advances an approved project through its execution states.
///
/// Allowed moves: approved -> planning -> in-progress -> completed. All
/// other combinations fail with an invalid-state error.
pub async fn advance_project(
    db: &DatabaseConnection,
    project_id: i64,
    new_status: ProjectStatus,
) -> Result<project::Model> {
    let project = get_project(db, project_id).await?;

    let allowed = matches!(
        (project.status, new_status),
        (ProjectStatus::Approved, ProjectStatus::Planning)
            | (ProjectStatus::Planning, ProjectStatus::InProgress)
            | (ProjectStatus::InProgress, ProjectStatus::Completed)
    );
    if !allowed {
        return Err(Error::InvalidState {
            message: format!(
                "Project {project_id} cannot move from '{:?}' to '{new_status:?}'",
                project.status
            ),
        });
    }

    transition_status(db, project_id, project.status, new_status).await?;
    get_project(db, project_id).await
}

/// Fetches a project or fails with the not-found error.
async fn get_project(db: &DatabaseConnection, project_id: i64) -> Result<project::Model> {
    Project::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })
}

/// Computes the schedule report over a project's stored entries.
async fn schedule_report(
    db: &DatabaseConnection,
    project_id: i64,
    budget: Decimal,
) -> Result<funding::ScheduleReport> {
    let entries = FundingDetail::find()
        .filter(funding_detail::Column::ProjectId.eq(project_id))
        .all(db)
        .await?;
    let schedule: Vec<funding::ScheduleEntry> =
        entries.iter().map(funding::ScheduleEntry::from).collect();
    Ok(funding::validate_schedule(&schedule, budget))
}

/// Compare-and-swap status update: only applies if the project still holds
/// `from`, failing with an invalid-state error otherwise.
async fn transition_status<C>(
    db: &C,
    project_id: i64,
    from: ProjectStatus,
    to: ProjectStatus,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let updated = Project::update_many()
        .col_expr(project::Column::Status, Expr::value(to))
        .col_expr(project::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(project::Column::Id.eq(project_id))
        .filter(project::Column::Status.eq(from))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::InvalidState {
            message: format!("Project {project_id} changed status concurrently"),
        });
    }
    Ok(())
}

/// Validates a draft schedule the way submission does, mapping the failure
/// modes to their typed errors.
fn check_schedule_submittable(entries: &[FundingEntryDraft], budget: Decimal) -> Result<()> {
    let schedule: Vec<funding::ScheduleEntry> = entries
        .iter()
        .map(FundingEntryDraft::as_schedule_entry)
        .collect();
    let report = funding::validate_schedule(&schedule, budget);
    if report.valid {
        return Ok(());
    }
    if report.total_allocated > budget {
        return Err(Error::BudgetExceeded {
            total: report.total_allocated,
            budget,
        });
    }
    Err(Error::Validation {
        message: "Every funding entry needs a positive amount and a due date".to_string(),
    })
}
