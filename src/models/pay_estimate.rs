//! Pay estimate models.
//!
//! This module contains the [`PayEstimate`] type produced by the payroll
//! estimator and the [`AuditStep`] records explaining how it was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Text attached to every estimate so no consumer mistakes it for payroll.
pub const ESTIMATE_DISCLAIMER: &str =
    "Approximate estimate only. The official calculation is done by the accounting department.";

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The approximate monthly pay for one employee.
///
/// `approximate` is always true and `disclaimer` always set: output layers
/// must present the figure as an estimate.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{PayEstimate, ESTIMATE_DISCLAIMER};
/// use rust_decimal::Decimal;
///
/// let estimate = PayEstimate {
///     employee_id: 1001,
///     year: 2024,
///     month: 10,
///     base_salary: Decimal::new(137500, 0),
///     hour_rate: Decimal::ZERO,
///     hours_delta: Decimal::ZERO,
///     hours_adjustment: Decimal::ZERO,
///     vacation_pay: Decimal::ZERO,
///     sick_pay: Decimal::ZERO,
///     total: Decimal::new(137500, 0),
///     approximate: true,
///     disclaimer: ESTIMATE_DISCLAIMER.to_string(),
///     audit_steps: vec![],
/// };
/// assert!(estimate.approximate);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayEstimate {
    /// The employee the estimate is for.
    pub employee_id: i64,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1 to 12).
    pub month: u32,
    /// The global base monthly salary used.
    pub base_salary: Decimal,
    /// Base salary divided by planned hours, rounded to cents.
    pub hour_rate: Decimal,
    /// Recorded hours minus planned hours.
    pub hours_delta: Decimal,
    /// `hours_delta` priced at the hourly rate, rounded to cents.
    pub hours_adjustment: Decimal,
    /// Vacation days times the employee's vacation rate.
    pub vacation_pay: Decimal,
    /// Sick days times the employee's sick rate.
    pub sick_pay: Decimal,
    /// Salary plus all adjustments, rounded to cents.
    pub total: Decimal,
    /// Always true.
    pub approximate: bool,
    /// Always [`ESTIMATE_DISCLAIMER`].
    pub disclaimer: String,
    /// How each figure was derived.
    pub audit_steps: Vec<AuditStep>,
}
