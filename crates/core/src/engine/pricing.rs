use rust_decimal::Decimal;

use crate::domain::recommendation::{
    BundleCandidate, LineAssignment, PriceBreakdown, PricedCandidate,
};

/// Multi-line discount tier, applied to the mobile subtotal only.
pub fn multi_line_discount_rate(line_count: usize) -> Decimal {
    match line_count {
        0 | 1 => Decimal::ZERO,
        2 => Decimal::new(5, 2),
        _ => Decimal::new(10, 2),
    }
}

/// Returns (discounted mobile total, discount amount).
pub fn apply_multi_line_discount(mobile_total: Decimal, line_count: usize) -> (Decimal, Decimal) {
    let amount = mobile_total * multi_line_discount_rate(line_count);
    (mobile_total - amount, amount)
}

/// Bundle discount by service composition. TV never discounts without home,
/// even paired with mobile; the asymmetry is contractual.
pub fn bundle_discount_rate(has_mobile: bool, has_home: bool, has_tv: bool) -> Decimal {
    if has_mobile && has_home && has_tv {
        return Decimal::new(15, 2);
    }

    if has_mobile && has_home {
        return Decimal::new(10, 2);
    }

    Decimal::ZERO
}

/// Final recurring total with the bundle discount applied to the subtotal.
/// `mobile_after_line_discount` already carries the multi-line discount.
pub fn grand_total_breakdown(
    mobile_after_line_discount: Decimal,
    home_cost: Decimal,
    tv_cost: Decimal,
    bundle_rate: Decimal,
) -> PriceBreakdown {
    let subtotal = mobile_after_line_discount + home_cost + tv_cost;
    let bundle_discount = subtotal * bundle_rate;

    PriceBreakdown {
        mobile_total: mobile_after_line_discount,
        home_total: home_cost,
        tv_total: tv_cost,
        subtotal,
        bundle_discount,
        bundle_discount_rate: bundle_rate,
        grand_total: subtotal - bundle_discount,
    }
}

/// Prices one candidate against the household's fixed line assignments.
pub fn price_candidate(
    candidate: BundleCandidate,
    assignments: &[LineAssignment],
) -> PricedCandidate {
    let mobile_total: Decimal = assignments.iter().map(|assignment| assignment.line_cost).sum();
    let (mobile_after_discount, line_discount) =
        apply_multi_line_discount(mobile_total, assignments.len());

    let home_cost =
        candidate.home_plan.as_ref().map(|plan| plan.monthly_price).unwrap_or(Decimal::ZERO);
    let tv_cost =
        candidate.tv_plan.as_ref().map(|plan| plan.monthly_price).unwrap_or(Decimal::ZERO);

    let bundle_rate =
        bundle_discount_rate(true, candidate.home_plan.is_some(), candidate.tv_plan.is_some());
    let breakdown = grand_total_breakdown(mobile_after_discount, home_cost, tv_cost, bundle_rate);
    let reasoning = build_reasoning(&candidate, assignments, line_discount, &breakdown);

    PricedCandidate {
        line_assignments: assignments.to_vec(),
        mobile_total,
        line_discount,
        home_cost,
        tv_cost,
        bundle_discount: breakdown.bundle_discount,
        bundle_discount_rate: bundle_rate,
        grand_total: breakdown.grand_total,
        total_savings: line_discount + breakdown.bundle_discount,
        reasoning,
        candidate,
        breakdown,
    }
}

/// Human-readable selection summary.
///
/// The multi-line percent shown is derived from the count tier, not
/// recomputed from the discount amount, and a household with zero lines
/// leaves the leading clause empty (`"Selected plans: , ..."`). Both
/// behaviors are relied upon downstream and kept as-is.
pub fn build_reasoning(
    candidate: &BundleCandidate,
    assignments: &[LineAssignment],
    line_discount: Decimal,
    breakdown: &PriceBreakdown,
) -> String {
    let mut reasoning = String::from("Selected plans: ");

    if !assignments.is_empty() {
        reasoning.push_str(&format!("{} mobile line(s)", assignments.len()));

        if line_discount > Decimal::ZERO {
            let percent = if assignments.len() >= 3 { 10 } else { 5 };
            reasoning.push_str(&format!(" ({percent}% multi-line discount)"));
        }
    }

    if let Some(home) = &candidate.home_plan {
        reasoning.push_str(&format!(", {}", home.name));
    }

    if let Some(tv) = &candidate.tv_plan {
        reasoning.push_str(&format!(", {}", tv.name));
    }

    if breakdown.bundle_discount_rate > Decimal::ZERO {
        let percent = (breakdown.bundle_discount_rate * Decimal::ONE_HUNDRED).normalize();
        reasoning.push_str(&format!(". Bundle discount: {percent}% off total"));
    }

    reasoning.push('.');
    reasoning
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::catalog::{HomePlan, MobilePlan, Technology, TvPlan};
    use crate::domain::household::HouseholdLine;
    use crate::domain::recommendation::{BundleCandidate, LineAssignment};

    use super::{
        apply_multi_line_discount, bundle_discount_rate, multi_line_discount_rate, price_candidate,
    };

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal literal")
    }

    fn assignment(line_id: &str, plan_name: &str, cost: &str) -> LineAssignment {
        LineAssignment {
            line: HouseholdLine {
                line_id: line_id.to_string(),
                expected_gb: dec("5"),
                expected_min: dec("300"),
                tv_hd_hours: Decimal::ZERO,
            },
            plan: MobilePlan {
                plan_id: 1,
                plan_name: plan_name.to_string(),
                quota_gb: dec("5"),
                quota_min: dec("300"),
                monthly_price: dec(cost),
                overage_gb: dec("2.00"),
                overage_min: dec("0.50"),
            },
            line_cost: dec(cost),
            overage_gb: Decimal::ZERO,
            overage_min: Decimal::ZERO,
        }
    }

    fn fiber_50() -> HomePlan {
        HomePlan {
            home_id: 1,
            name: "Fiber 50".to_string(),
            tech: Technology::Fiber,
            down_mbps: 50,
            monthly_price: dec("89.90"),
            install_fee: Decimal::ZERO,
        }
    }

    fn fiber_100() -> HomePlan {
        HomePlan {
            home_id: 2,
            name: "Fiber 100Mbps".to_string(),
            tech: Technology::Fiber,
            down_mbps: 100,
            monthly_price: dec("119.90"),
            install_fee: Decimal::ZERO,
        }
    }

    fn standard_tv() -> TvPlan {
        TvPlan {
            tv_id: 2,
            name: "Standard TV".to_string(),
            hd_hours_included: dec("60"),
            monthly_price: dec("59.90"),
        }
    }

    #[test]
    fn multi_line_tiers() {
        assert_eq!(multi_line_discount_rate(1), Decimal::ZERO);
        assert_eq!(multi_line_discount_rate(2), dec("0.05"));
        assert_eq!(multi_line_discount_rate(3), dec("0.10"));
        assert_eq!(multi_line_discount_rate(5), dec("0.10"));
    }

    #[test]
    fn multi_line_discount_amounts() {
        assert_eq!(apply_multi_line_discount(dec("100"), 1), (dec("100"), dec("0")));
        assert_eq!(apply_multi_line_discount(dec("200"), 2), (dec("190.00"), dec("10.00")));
        assert_eq!(apply_multi_line_discount(dec("300"), 3), (dec("270.00"), dec("30.00")));
        assert_eq!(apply_multi_line_discount(dec("500"), 5), (dec("450.00"), dec("50.00")));
    }

    #[test]
    fn bundle_rate_requires_mobile_and_home() {
        assert_eq!(bundle_discount_rate(true, true, true), dec("0.15"));
        assert_eq!(bundle_discount_rate(true, true, false), dec("0.10"));
        assert_eq!(bundle_discount_rate(true, false, true), Decimal::ZERO);
        assert_eq!(bundle_discount_rate(true, false, false), Decimal::ZERO);
        assert_eq!(bundle_discount_rate(false, true, true), Decimal::ZERO);
        assert_eq!(bundle_discount_rate(false, false, false), Decimal::ZERO);
    }

    #[test]
    fn mobile_only_single_line_has_no_discounts() {
        let candidate =
            BundleCandidate { home_plan: None, tv_plan: None, label: "Mobile Only".to_string() };
        let priced = price_candidate(candidate, &[assignment("L1", "Basic 5GB", "49.90")]);

        assert_eq!(priced.mobile_total, dec("49.90"));
        assert_eq!(priced.line_discount, Decimal::ZERO);
        assert_eq!(priced.home_cost, Decimal::ZERO);
        assert_eq!(priced.tv_cost, Decimal::ZERO);
        assert_eq!(priced.bundle_discount, Decimal::ZERO);
        assert_eq!(priced.grand_total, dec("49.90"));
        assert_eq!(priced.total_savings, Decimal::ZERO);
        assert_eq!(priced.reasoning, "Selected plans: 1 mobile line(s).");
    }

    #[test]
    fn mobile_plus_home_gets_ten_percent_off_the_subtotal() {
        let candidate = BundleCandidate {
            home_plan: Some(fiber_50()),
            tv_plan: None,
            label: "Mobile + Fiber 50".to_string(),
        };
        let priced = price_candidate(candidate, &[assignment("L1", "Basic 5GB", "49.90")]);

        assert_eq!(priced.breakdown.subtotal, dec("139.80"));
        assert_eq!(priced.bundle_discount, dec("13.98"));
        assert_eq!(priced.grand_total, dec("125.82"));
        assert_eq!(priced.total_savings, dec("13.98"));
    }

    #[test]
    fn install_fee_is_excluded_from_recurring_pricing() {
        let mut home = fiber_50();
        home.install_fee = dec("199.00");
        let candidate =
            BundleCandidate { home_plan: Some(home), tv_plan: None, label: "Mobile + Fiber 50".to_string() };
        let priced = price_candidate(candidate, &[assignment("L1", "Basic 5GB", "49.90")]);

        assert_eq!(priced.breakdown.subtotal, dec("139.80"));
    }

    #[test]
    fn line_discount_applies_to_mobile_only_before_the_bundle_discount() {
        let candidate = BundleCandidate {
            home_plan: Some(fiber_50()),
            tv_plan: None,
            label: "Mobile + Fiber 50".to_string(),
        };
        let assignments =
            [assignment("L1", "Basic 5GB", "49.90"), assignment("L2", "Standard 10GB", "79.90")];
        let priced = price_candidate(candidate, &assignments);

        // Mobile 129.80 - 5% = 123.31; + 89.90 home = 213.21; - 10% = 191.889.
        assert_eq!(priced.mobile_total, dec("129.80"));
        assert_eq!(priced.line_discount, dec("6.49"));
        assert_eq!(priced.breakdown.subtotal, dec("213.21"));
        assert_eq!(priced.bundle_discount, dec("21.321"));
        assert_eq!(priced.grand_total, dec("191.889"));
        assert_eq!(priced.total_savings, dec("27.811"));
    }

    #[test]
    fn reasoning_for_triple_bundle_with_all_discounts() {
        let candidate = BundleCandidate {
            home_plan: Some(fiber_100()),
            tv_plan: Some(standard_tv()),
            label: "Triple: Fiber 100Mbps + Standard TV".to_string(),
        };
        let assignments = [
            assignment("L1", "Basic Plan", "49.90"),
            assignment("L2", "Standard Plan", "79.90"),
            assignment("L3", "Premium Plan", "129.90"),
        ];
        let priced = price_candidate(candidate, &assignments);

        assert_eq!(
            priced.reasoning,
            "Selected plans: 3 mobile line(s) (10% multi-line discount), Fiber 100Mbps, \
             Standard TV. Bundle discount: 15% off total."
        );
    }

    #[test]
    fn reasoning_for_two_lines_with_home() {
        let candidate = BundleCandidate {
            home_plan: Some(fiber_100()),
            tv_plan: None,
            label: "Mobile + Fiber 100Mbps".to_string(),
        };
        let assignments =
            [assignment("L1", "Basic Plan", "49.90"), assignment("L2", "Standard Plan", "79.90")];
        let priced = price_candidate(candidate, &assignments);

        assert_eq!(
            priced.reasoning,
            "Selected plans: 2 mobile line(s) (5% multi-line discount), Fiber 100Mbps. \
             Bundle discount: 10% off total."
        );
    }

    #[test]
    fn reasoning_with_zero_lines_keeps_the_empty_leading_clause() {
        let candidate = BundleCandidate {
            home_plan: Some(fiber_100()),
            tv_plan: Some(standard_tv()),
            label: "Triple: Fiber 100Mbps + Standard TV".to_string(),
        };
        let priced = price_candidate(candidate, &[]);

        // With no mobile lines the bundle discount still applies (the engine
        // always treats mobile as present), so the tail carries the rate.
        assert_eq!(
            priced.reasoning,
            "Selected plans: , Fiber 100Mbps, Standard TV. Bundle discount: 15% off total."
        );
    }
}
