//! Funding ledger - validation and payment state rules for a project's
//! funding schedule.
//!
//! Schedule validation and the paid/unpaid transitions are pure functions;
//! the workflow engine persists their results. All amounts are fixed-point
//! decimals and comparisons are exact - no epsilon, no binary floating
//! point.

use crate::entities::funding_detail::{self, PaymentStatus};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeUtc;

/// One planned disbursement as seen by schedule validation.
///
/// Both stored entries and not-yet-persisted drafts reduce to this shape, so
/// the same validation runs at project creation and at every schedule edit.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    /// Amount in dollars
    pub amount: Decimal,
    /// Due date; drafts built up in the UI may not have one yet
    pub due_date: Option<NaiveDate>,
}

impl From<&funding_detail::Model> for ScheduleEntry {
    fn from(entry: &funding_detail::Model) -> Self {
        Self {
            amount: entry.amount,
            due_date: Some(entry.due_date),
        }
    }
}

/// Result of validating a funding schedule against a project budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Whether the schedule may be submitted
    pub valid: bool,
    /// Sum of all entry amounts
    pub total_allocated: Decimal,
    /// Budget minus total; negative when over-allocated
    pub remaining: Decimal,
}

/// Validates a funding schedule against a budget.
///
/// The schedule is valid iff the total allocated does not exceed the budget
/// and every entry has a positive amount and a due date. This runs on every
/// add/edit/remove of an entry, not just once at submission.
#[must_use]
pub fn validate_schedule(entries: &[ScheduleEntry], budget: Decimal) -> ScheduleReport {
    let total_allocated: Decimal = entries.iter().map(|e| e.amount).sum();
    let entries_ok = entries
        .iter()
        .all(|e| e.amount > Decimal::ZERO && e.due_date.is_some());

    ScheduleReport {
        valid: entries_ok && total_allocated <= budget,
        total_allocated,
        remaining: budget - total_allocated,
    }
}

/// Marks a funding entry as paid, stamping the payer and payment time.
///
/// Fails with an invalid-state error if the entry is already paid; revert
/// with [`mark_unpaid`] first to re-record a payment.
pub fn mark_paid(
    entry: funding_detail::Model,
    paid_by: i64,
    now: DateTimeUtc,
) -> Result<funding_detail::Model> {
    if entry.payment_status == PaymentStatus::Paid {
        return Err(Error::InvalidState {
            message: format!("Funding entry {} is already paid", entry.id),
        });
    }

    Ok(funding_detail::Model {
        payment_status: PaymentStatus::Paid,
        paid_date: Some(now),
        paid_by: Some(paid_by),
        ..entry
    })
}

/// Reverts a funding entry to unpaid, clearing the payer and payment time.
///
/// Payment state is not a one-way ratchet; no precondition beyond the entry
/// existing.
#[must_use]
pub fn mark_unpaid(entry: funding_detail::Model) -> funding_detail::Model {
    funding_detail::Model {
        payment_status: PaymentStatus::Unpaid,
        paid_date: None,
        paid_by: None,
        ..entry
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::funding_detail::FundingType;

    fn entry(amount: i64) -> ScheduleEntry {
        ScheduleEntry {
            amount: Decimal::from(amount),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
        }
    }

    fn test_funding_model(id: i64) -> funding_detail::Model {
        funding_detail::Model {
            id,
            project_id: 1,
            funding_type: FundingType::Progress,
            amount: Decimal::from(2_500),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            payment_status: PaymentStatus::Unpaid,
            paid_date: None,
            paid_by: None,
        }
    }

    #[test]
    fn test_validate_schedule_within_budget() {
        let entries = vec![entry(3_000), entry(4_000)];
        let report = validate_schedule(&entries, Decimal::from(10_000));

        assert!(report.valid);
        assert_eq!(report.total_allocated, Decimal::from(7_000));
        assert_eq!(report.remaining, Decimal::from(3_000));
    }

    #[test]
    fn test_validate_schedule_over_budget() {
        // Budget 10000 with entries {3000, 4000, 4000}: over by 1000
        let entries = vec![entry(3_000), entry(4_000), entry(4_000)];
        let report = validate_schedule(&entries, Decimal::from(10_000));

        assert!(!report.valid);
        assert_eq!(report.total_allocated, Decimal::from(11_000));
        assert_eq!(report.remaining, Decimal::from(-1_000));
    }

    #[test]
    fn test_validate_schedule_exact_budget_is_valid() {
        let entries = vec![entry(6_000), entry(4_000)];
        let report = validate_schedule(&entries, Decimal::from(10_000));

        assert!(report.valid);
        assert_eq!(report.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_validate_schedule_exact_cents() {
        // 0.1 + 0.2 style sums must not produce rounding artifacts
        let entries = vec![
            ScheduleEntry {
                amount: Decimal::new(10, 2),
                due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            },
            ScheduleEntry {
                amount: Decimal::new(20, 2),
                due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            },
        ];
        let report = validate_schedule(&entries, Decimal::new(30, 2));

        assert!(report.valid);
        assert_eq!(report.total_allocated, Decimal::new(30, 2));
        assert_eq!(report.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_validate_schedule_rejects_nonpositive_amounts() {
        let entries = vec![entry(3_000), entry(0)];
        let report = validate_schedule(&entries, Decimal::from(10_000));
        assert!(!report.valid);

        let entries = vec![entry(-50)];
        let report = validate_schedule(&entries, Decimal::from(10_000));
        assert!(!report.valid);
    }

    #[test]
    fn test_validate_schedule_rejects_missing_date() {
        let entries = vec![ScheduleEntry {
            amount: Decimal::from(1_000),
            due_date: None,
        }];
        let report = validate_schedule(&entries, Decimal::from(10_000));

        assert!(!report.valid);
        assert_eq!(report.total_allocated, Decimal::from(1_000));
    }

    #[test]
    fn test_validate_empty_schedule() {
        let report = validate_schedule(&[], Decimal::from(10_000));

        assert!(report.valid);
        assert_eq!(report.total_allocated, Decimal::ZERO);
        assert_eq!(report.remaining, Decimal::from(10_000));
    }

    #[test]
    fn test_mark_paid_sets_all_payment_fields() {
        let now = chrono::Utc::now();
        let paid = mark_paid(test_funding_model(1), 42, now).unwrap();

        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.paid_date, Some(now));
        assert_eq!(paid.paid_by, Some(42));
        // Untouched fields survive
        assert_eq!(paid.amount, Decimal::from(2_500));
    }

    #[test]
    fn test_mark_paid_twice_fails() {
        let now = chrono::Utc::now();
        let paid = mark_paid(test_funding_model(1), 42, now).unwrap();

        let result = mark_paid(paid, 43, now);
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidState { message: _ }
        ));
    }

    #[test]
    fn test_mark_unpaid_clears_payment_fields() {
        let now = chrono::Utc::now();
        let paid = mark_paid(test_funding_model(1), 42, now).unwrap();
        let unpaid = mark_unpaid(paid);

        assert_eq!(unpaid.payment_status, PaymentStatus::Unpaid);
        assert_eq!(unpaid.paid_date, None);
        assert_eq!(unpaid.paid_by, None);
    }

    #[test]
    fn test_unpaid_then_paid_produces_fresh_state() {
        let first = chrono::Utc::now();
        let paid = mark_paid(test_funding_model(1), 42, first).unwrap();
        let unpaid = mark_unpaid(paid);

        let second = chrono::Utc::now();
        let repaid = mark_paid(unpaid, 43, second).unwrap();

        assert_eq!(repaid.payment_status, PaymentStatus::Paid);
        assert_eq!(repaid.paid_date, Some(second));
        assert_eq!(repaid.paid_by, Some(43));
    }
}
