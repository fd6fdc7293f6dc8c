/// Federal R&D credit rate, in percent.
pub const FEDERAL_RATE_PERCENT: i64 = 20;

/// Credit earned on `actual_spend` when `eligible_rd_percent` of it qualifies:
/// `round(actual_spend × eligible_rd_percent / 100 × 0.20)`.
///
/// Computed in integer arithmetic so ties round half-up exactly (2.5 → 3).
/// Negative inputs are clamped to zero and percentages above 100 to 100; the
/// store rejects both before they get here.
pub fn tax_credit(actual_spend: i64, eligible_rd_percent: i64) -> i64 {
    let spend = i128::from(actual_spend.max(0));
    let percent = i128::from(eligible_rd_percent.clamp(0, 100));
    let denominator = 100 * 100 / i128::from(FEDERAL_RATE_PERCENT);

    let credit = (spend * percent + denominator / 2) / denominator;
    i64::try_from(credit).unwrap_or(i64::MAX)
}
