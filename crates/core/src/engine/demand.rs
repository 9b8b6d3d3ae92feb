use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::household::HouseholdLine;

/// Floor on the offered home speed regardless of usage.
pub const MIN_HOME_MBPS: f64 = 10.0;

/// Peak-vs-average headroom multiplier.
const PEAK_SAFETY_FACTOR: f64 = 3.0;

/// 30 days x 24 hours x 3600 seconds.
const SECONDS_PER_MONTH: f64 = 2_592_000.0;

/// Required home download speed from the household's total monthly volume.
///
/// Volume converts at 1024^3 bytes per GB while the bit rate uses decimal
/// megabits. The mixed bases are part of the pricing contract; do not
/// "correct" them to a single unit system.
pub fn required_home_mbps(lines: &[HouseholdLine]) -> f64 {
    let total_gb: Decimal = lines.iter().map(|line| line.expected_gb).sum();
    let total_gb = total_gb.to_f64().unwrap_or(0.0);
    if total_gb <= 0.0 {
        return MIN_HOME_MBPS;
    }

    let total_bits = total_gb * 8.0 * 1024.0 * 1024.0 * 1024.0;
    let avg_mbps = total_bits / SECONDS_PER_MONTH / 1_000_000.0;
    let required = (avg_mbps * PEAK_SAFETY_FACTOR).ceil();

    required.max(MIN_HOME_MBPS)
}

/// Required TV capacity: the single heaviest viewer drives the whole
/// household, so this is a maximum, not a sum.
pub fn required_tv_hours(lines: &[HouseholdLine]) -> Decimal {
    lines.iter().map(|line| line.tv_hd_hours).max().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::household::HouseholdLine;

    use super::{required_home_mbps, required_tv_hours, MIN_HOME_MBPS};

    fn line(id: &str, gb: &str, tv_hours: &str) -> HouseholdLine {
        HouseholdLine {
            line_id: id.to_string(),
            expected_gb: gb.parse().expect("gb"),
            expected_min: Decimal::new(300, 0),
            tv_hd_hours: tv_hours.parse().expect("tv hours"),
        }
    }

    #[test]
    fn empty_household_gets_the_floor() {
        assert_eq!(required_home_mbps(&[]), MIN_HOME_MBPS);
    }

    #[test]
    fn zero_usage_gets_the_floor_not_a_division_fault() {
        assert_eq!(required_home_mbps(&[line("L1", "0", "0")]), MIN_HOME_MBPS);
    }

    #[test]
    fn light_usage_hits_the_floor() {
        // 10 GB -> ~0.1 Mbps raw with the safety factor, floored at 10.
        assert_eq!(required_home_mbps(&[line("L1", "10", "0")]), 10.0);
        assert_eq!(required_home_mbps(&[line("L1", "50", "0")]), 10.0);
    }

    #[test]
    fn family_of_three_with_40_gb_total_hits_the_floor() {
        let lines = [line("L1", "8", "25"), line("L2", "12", "40"), line("L3", "20", "60")];
        assert_eq!(required_home_mbps(&lines), 10.0);
    }

    #[test]
    fn extreme_usage_household_requires_roughly_50_mbps() {
        let lines = [line("L1", "2000", "200"), line("L2", "1500", "150"), line("L3", "1500", "300")];
        let mbps = required_home_mbps(&lines);
        assert!((mbps - 50.0).abs() <= 2.0, "expected ~50 Mbps, got {mbps}");
    }

    #[test]
    fn result_is_never_below_the_floor() {
        for gb in ["0", "1", "8", "100", "900", "5000"] {
            assert!(required_home_mbps(&[line("L1", gb, "0")]) >= MIN_HOME_MBPS);
        }
    }

    #[test]
    fn tv_requirement_is_the_maximum_not_the_sum() {
        let lines = [line("L1", "5", "25"), line("L2", "5", "60"), line("L3", "5", "40")];
        assert_eq!(required_tv_hours(&lines), Decimal::new(60, 0));
    }

    #[test]
    fn tv_requirement_defaults_to_zero() {
        assert_eq!(required_tv_hours(&[]), Decimal::ZERO);
    }
}
