//! Approximate monthly pay estimation.
//!
//! The base salary pays for the planned hours. Hours recorded above or below
//! the plan are paid or deducted at the implied hourly rate, and vacation and
//! sick days are paid at the employee's own day-rates.

use rust_decimal::Decimal;

use crate::models::{AuditStep, ESTIMATE_DISCLAIMER, Employee, MonthStats, PayEstimate};

/// Decimal places of reported money figures.
const MONEY_DP: u32 = 2;

/// Estimates the month's pay from reconciled totals.
///
/// Intermediate values keep full precision; `hour_rate`, `hours_adjustment`
/// and `total` are rounded to cents. When the month plans no hours the hourly
/// rate is zero, so recorded hours add nothing.
///
/// # Example
///
/// ```
/// use shift_ledger::calculation::{estimate, reconcile_records, ShiftCycle};
/// use shift_ledger::models::{Crew, Employee};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: 1,
///     full_name: "Anna".to_string(),
///     crew: Crew::One,
///     vacation_rate: Decimal::ZERO,
///     sick_rate: Decimal::ZERO,
/// };
/// let stats = reconcile_records(&ShiftCycle::default(), &employee, 2024, 10, &[]).unwrap();
/// let pay = estimate(&stats, &employee, Decimal::new(137500, 0));
///
/// assert!(pay.approximate);
/// assert_eq!(pay.total, Decimal::ZERO);
/// ```
pub fn estimate(stats: &MonthStats, employee: &Employee, base_salary: Decimal) -> PayEstimate {
    let mut audit_steps = Vec::with_capacity(4);

    let hour_rate = if stats.planned_hours > Decimal::ZERO {
        base_salary / stats.planned_hours
    } else {
        Decimal::ZERO
    };
    audit_steps.push(AuditStep {
        step_number: 1,
        rule_id: "hour_rate".to_string(),
        rule_name: "Implied Hourly Rate".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "planned_hours": stats.planned_hours.to_string()
        }),
        output: serde_json::json!({
            "hour_rate": hour_rate.round_dp(MONEY_DP).to_string()
        }),
        reasoning: if stats.planned_hours > Decimal::ZERO {
            format!(
                "{} / {} planned hours = {} per hour",
                base_salary,
                stats.planned_hours,
                hour_rate.round_dp(MONEY_DP)
            )
        } else {
            "No planned hours this month, hourly rate is zero".to_string()
        },
    });

    let hours_delta = stats.hours_delta();
    let hours_adjustment = hours_delta * hour_rate;
    audit_steps.push(AuditStep {
        step_number: 2,
        rule_id: "hours_adjustment".to_string(),
        rule_name: "Hours Adjustment".to_string(),
        input: serde_json::json!({
            "total_worked_hours": stats.total_worked_hours.to_string(),
            "planned_hours": stats.planned_hours.to_string(),
            "hour_rate": hour_rate.round_dp(MONEY_DP).to_string()
        }),
        output: serde_json::json!({
            "hours_delta": hours_delta.to_string(),
            "hours_adjustment": hours_adjustment.round_dp(MONEY_DP).to_string()
        }),
        reasoning: format!(
            "({} - {}) hours x {} = {}",
            stats.total_worked_hours,
            stats.planned_hours,
            hour_rate.round_dp(MONEY_DP),
            hours_adjustment.round_dp(MONEY_DP)
        ),
    });

    let vacation_pay = Decimal::from(stats.vacation_days) * employee.vacation_rate;
    let sick_pay = Decimal::from(stats.sick_days) * employee.sick_rate;
    audit_steps.push(AuditStep {
        step_number: 3,
        rule_id: "absence_pay".to_string(),
        rule_name: "Absence Pay".to_string(),
        input: serde_json::json!({
            "vacation_days": stats.vacation_days,
            "vacation_rate": employee.vacation_rate.to_string(),
            "sick_days": stats.sick_days,
            "sick_rate": employee.sick_rate.to_string()
        }),
        output: serde_json::json!({
            "vacation_pay": vacation_pay.to_string(),
            "sick_pay": sick_pay.to_string()
        }),
        reasoning: format!(
            "{} vacation days x {} + {} sick days x {}",
            stats.vacation_days, employee.vacation_rate, stats.sick_days, employee.sick_rate
        ),
    });

    let total = (base_salary + hours_adjustment + vacation_pay + sick_pay).round_dp(MONEY_DP);
    audit_steps.push(AuditStep {
        step_number: 4,
        rule_id: "total".to_string(),
        rule_name: "Estimated Total".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "hours_adjustment": hours_adjustment.round_dp(MONEY_DP).to_string(),
            "vacation_pay": vacation_pay.to_string(),
            "sick_pay": sick_pay.to_string()
        }),
        output: serde_json::json!({
            "total": total.to_string()
        }),
        reasoning: format!(
            "{} + {} + {} + {} = {} (approximate)",
            base_salary,
            hours_adjustment.round_dp(MONEY_DP),
            vacation_pay,
            sick_pay,
            total
        ),
    });

    PayEstimate {
        employee_id: employee.id,
        year: stats.year,
        month: stats.month,
        base_salary,
        hour_rate: hour_rate.round_dp(MONEY_DP),
        hours_delta,
        hours_adjustment: hours_adjustment.round_dp(MONEY_DP),
        vacation_pay,
        sick_pay,
        total,
        approximate: true,
        disclaimer: ESTIMATE_DISCLAIMER.to_string(),
        audit_steps,
    }
}
