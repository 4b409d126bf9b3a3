//! Approval policy - pure decision logic for the approval workflow.
//!
//! Given a project, an acting user, and a proposed action, these functions
//! decide admissibility and the resulting status transition. Nothing here
//! touches the database or mutates state; inadmissible actions are rejected
//! by the workflow engine before any mutation happens.

use crate::core::group::GroupRoster;
use crate::entities::{
    approval_history::ApprovalAction,
    project,
    project::{ApprovalType, ProjectStatus},
    user,
};

/// Decides whether `user` may act on `project`'s pending approval.
///
/// This is a predicate, not a fallible operation: any combination that does
/// not grant authority returns `false`. For single-approver projects the
/// user's approval level must meet the project's minimum level. For
/// group-based projects the user must be a member of the assigned group and
/// the group's level must meet the project's minimum level.
///
/// `roster` is the resolved membership of the project's assigned group, or
/// `None` when the project uses a single approver (or the group could not
/// be resolved).
#[must_use]
pub fn can_act(user: &user::Model, project: &project::Model, roster: Option<&GroupRoster>) -> bool {
    if project.status != ProjectStatus::PendingApproval || user.is_archived {
        return false;
    }

    match project.approval_type {
        ApprovalType::Single => user.approval_level >= project.approval_level,
        ApprovalType::Group => roster.is_some_and(|r| {
            project.assigned_approval_group_id == Some(r.group.id)
                && r.group.level >= project.approval_level
                && r.member_ids.contains(&user.id)
        }),
    }
}

/// Maps an approval action to the project status it produces.
///
/// Requesting changes is an explicit loop-back transition: the project stays
/// in `pending-approval` while the reviewer's feedback is recorded in the
/// approval history.
#[must_use]
pub const fn resolve_transition(action: ApprovalAction) -> ProjectStatus {
    match action {
        ApprovalAction::Approved => ProjectStatus::Approved,
        ApprovalAction::Rejected => ProjectStatus::Rejected,
        ApprovalAction::RequestedChanges => ProjectStatus::PendingApproval,
    }
}

/// Whether an action requires a non-empty reviewer comment.
///
/// Comments are optional only when approving; rejecting or requesting
/// changes without an explanation is not actionable for the project owner.
#[must_use]
pub const fn requires_comment(action: ApprovalAction) -> bool {
    !matches!(action, ApprovalAction::Approved)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::project::ProjectPriority;
    use crate::entities::user::UserRole;
    use rust_decimal::Decimal;

    fn test_user(id: i64, approval_level: i32) -> user::Model {
        user::Model {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            role: UserRole::Manager,
            approval_level,
            permissions: serde_json::json!([]),
            is_archived: false,
            created_at: chrono::Utc::now(),
        }
    }

    fn test_project(status: ProjectStatus, approval_level: i32) -> project::Model {
        let now = chrono::Utc::now();
        project::Model {
            id: 1,
            property_id: 1,
            name: "Roof replacement".to_string(),
            description: None,
            budget: Decimal::from(10_000),
            status,
            priority: ProjectPriority::Medium,
            approval_type: ApprovalType::Single,
            approval_level,
            assigned_approver_id: Some(2),
            assigned_approval_group_id: None,
            held_from: None,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_roster(group_id: i64, level: i32, member_ids: Vec<i64>) -> GroupRoster {
        GroupRoster {
            group: crate::entities::approval_group::Model {
                id: group_id,
                name: "Senior approvers".to_string(),
                level,
                created_at: chrono::Utc::now(),
            },
            member_ids,
        }
    }

    #[test]
    fn test_single_mode_level_gating() {
        let project = test_project(ProjectStatus::PendingApproval, 2);

        assert!(can_act(&test_user(5, 2), &project, None));
        assert!(can_act(&test_user(5, 3), &project, None));
        assert!(!can_act(&test_user(5, 1), &project, None));
    }

    #[test]
    fn test_only_pending_approval_is_actionable() {
        let user = test_user(5, 3);

        for status in [
            ProjectStatus::Draft,
            ProjectStatus::Pending,
            ProjectStatus::Approved,
            ProjectStatus::Rejected,
            ProjectStatus::Completed,
            ProjectStatus::OnHold,
        ] {
            let project = test_project(status, 1);
            assert!(!can_act(&user, &project, None), "{status:?} should not be actionable");
        }
    }

    #[test]
    fn test_archived_user_cannot_act() {
        let mut user = test_user(5, 3);
        user.is_archived = true;
        let project = test_project(ProjectStatus::PendingApproval, 1);

        assert!(!can_act(&user, &project, None));
    }

    #[test]
    fn test_group_mode_membership_gating() {
        let mut project = test_project(ProjectStatus::PendingApproval, 2);
        project.approval_type = ApprovalType::Group;
        project.assigned_approver_id = None;
        project.assigned_approval_group_id = Some(7);

        let roster = test_roster(7, 2, vec![10, 11]);

        // Member of the assigned group acts regardless of personal level
        assert!(can_act(&test_user(10, 1), &project, Some(&roster)));
        // Non-member is refused
        assert!(!can_act(&test_user(12, 3), &project, Some(&roster)));
        // Missing roster is refused
        assert!(!can_act(&test_user(10, 1), &project, None));
    }

    #[test]
    fn test_group_mode_level_gating() {
        let mut project = test_project(ProjectStatus::PendingApproval, 3);
        project.approval_type = ApprovalType::Group;
        project.assigned_approval_group_id = Some(7);

        // Group level below the project's minimum is refused
        let low_roster = test_roster(7, 2, vec![10]);
        assert!(!can_act(&test_user(10, 1), &project, Some(&low_roster)));

        let high_roster = test_roster(7, 3, vec![10]);
        assert!(can_act(&test_user(10, 1), &project, Some(&high_roster)));
    }

    #[test]
    fn test_group_mode_rejects_wrong_roster() {
        let mut project = test_project(ProjectStatus::PendingApproval, 1);
        project.approval_type = ApprovalType::Group;
        project.assigned_approval_group_id = Some(7);

        // Roster for a different group than the one assigned
        let other_roster = test_roster(8, 3, vec![10]);
        assert!(!can_act(&test_user(10, 1), &project, Some(&other_roster)));
    }

    #[test]
    fn test_resolve_transition() {
        assert_eq!(
            resolve_transition(ApprovalAction::Approved),
            ProjectStatus::Approved
        );
        assert_eq!(
            resolve_transition(ApprovalAction::Rejected),
            ProjectStatus::Rejected
        );
        // Requested changes loops back without leaving the pending state
        assert_eq!(
            resolve_transition(ApprovalAction::RequestedChanges),
            ProjectStatus::PendingApproval
        );
    }

    #[test]
    fn test_requires_comment() {
        assert!(!requires_comment(ApprovalAction::Approved));
        assert!(requires_comment(ApprovalAction::Rejected));
        assert!(requires_comment(ApprovalAction::RequestedChanges));
    }
}
