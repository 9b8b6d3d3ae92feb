use rust_decimal::Decimal;

use crate::domain::catalog::MobilePlan;
use crate::domain::household::HouseholdLine;
use crate::domain::recommendation::LineAssignment;
use crate::errors::DomainError;

/// Usage beyond the plan's included quotas, clamped at zero.
pub fn overages(line: &HouseholdLine, plan: &MobilePlan) -> (Decimal, Decimal) {
    let overage_gb = (line.expected_gb - plan.quota_gb).max(Decimal::ZERO);
    let overage_min = (line.expected_min - plan.quota_min).max(Decimal::ZERO);
    (overage_gb, overage_min)
}

/// Monthly price plus billed overage for one line on one plan.
pub fn line_cost(line: &HouseholdLine, plan: &MobilePlan) -> Decimal {
    let (overage_gb, overage_min) = overages(line, plan);
    plan.monthly_price + overage_gb * plan.overage_gb + overage_min * plan.overage_min
}

/// Picks the minimum-total-cost plan for every household line independently.
///
/// Assignments do not depend on which bundle candidate is later priced, so
/// one matching pass serves every candidate of the request.
pub fn match_lines(
    lines: &[HouseholdLine],
    plans: &[MobilePlan],
) -> Result<Vec<LineAssignment>, DomainError> {
    lines
        .iter()
        .map(|line| {
            let plan = best_plan(line, plans).ok_or_else(|| {
                DomainError::InvariantViolation("catalog contains no mobile plans".to_string())
            })?;
            let (overage_gb, overage_min) = overages(line, plan);
            Ok(LineAssignment {
                line: line.clone(),
                plan: plan.clone(),
                line_cost: line_cost(line, plan),
                overage_gb,
                overage_min,
            })
        })
        .collect()
}

// Strict `<` keeps the first catalog plan on equal cost; `Iterator::min_by`
// would keep the last and silently flip the tie-break.
fn best_plan<'a>(line: &HouseholdLine, plans: &'a [MobilePlan]) -> Option<&'a MobilePlan> {
    let mut best: Option<(&MobilePlan, Decimal)> = None;

    for plan in plans {
        let cost = line_cost(line, plan);
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((plan, cost)),
        }
    }

    best.map(|(plan, _)| plan)
}
