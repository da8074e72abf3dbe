use bizplan_core::ratios::coverage::{classify_dscr, dscr, RiskTier, HIGH_RISK_DSCR, LOW_RISK_DSCR};
use bizplan_core::ratios::key_ratios::{
    calculate_key_ratios, key_ratios, BalanceSheetSnapshot, KeyRatiosInput, RatioSet,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Key ratios
// ===========================================================================

fn cafe_snapshot() -> KeyRatiosInput {
    KeyRatiosInput {
        net_profit: dec!(42_000),
        total_revenue: dec!(350_000),
        net_operating_income: dec!(55_000),
        balance_sheet: BalanceSheetSnapshot {
            total_assets: dec!(210_000),
            current_assets: dec!(36_000),
            current_liabilities: dec!(24_000),
            total_debt: dec!(90_000),
            interest_expense: dec!(6_000),
            depreciation: dec!(11_000),
        },
    }
}

#[test]
fn test_cafe_ratios() {
    let out = calculate_key_ratios(&cafe_snapshot()).unwrap();
    let r = &out.result;
    assert_eq!(r.profit_margin, dec!(12));
    assert_eq!(r.return_on_assets, dec!(20));
    assert_eq!(r.current_ratio, dec!(1.5));
    // 90k / 120k
    assert_eq!(r.debt_to_equity_ratio, dec!(0.75));
    // (55k + 11k) / 6k
    assert_eq!(r.interest_coverage_ratio, dec!(11));
    // (42k + 11k + 6k) / 24k
    assert_eq!(r.operating_cash_flow_ratio, dec!(59_000) / dec!(24_000));
}

#[test]
fn test_zero_current_liabilities_zeroes_liquidity_ratios() {
    let mut input = cafe_snapshot();
    input.balance_sheet.current_liabilities = Decimal::ZERO;
    let out = calculate_key_ratios(&input).unwrap();
    assert_eq!(out.result.current_ratio, Decimal::ZERO);
    assert_eq!(out.result.operating_cash_flow_ratio, Decimal::ZERO);
    // Other ratios unaffected
    assert_eq!(out.result.interest_coverage_ratio, dec!(11));
}

#[test]
fn test_ratio_set_serialises_with_roa_alias() {
    let parsed: RatioSet = serde_json::from_value(serde_json::json!({
        "profit_margin": "1",
        "roa": "2",
        "current_ratio": "3",
        "debt_to_equity_ratio": "4",
        "interest_coverage_ratio": "5",
        "operating_cash_flow_ratio": "6"
    }))
    .unwrap();
    assert_eq!(parsed.return_on_assets, dec!(2));
}

#[test]
fn test_ratios_beyond_decimal_range_read_as_zero() {
    let huge = dec!(1_000_000_000_000_000_000_000_000_000);
    let tiny = dec!(0.001);
    let r = key_ratios(huge, tiny, tiny, huge, tiny, Decimal::ZERO, huge, tiny, Decimal::ZERO);
    assert_eq!(r.profit_margin, Decimal::ZERO);
    assert_eq!(r.return_on_assets, Decimal::ZERO);
    assert_eq!(r.current_ratio, Decimal::ZERO);
    assert_eq!(r.interest_coverage_ratio, Decimal::ZERO);
    assert_eq!(r.operating_cash_flow_ratio, Decimal::ZERO);
    // equity = tiny, debt 0
    assert_eq!(r.debt_to_equity_ratio, Decimal::ZERO);
}

// ===========================================================================
// DSCR and risk tiers
// ===========================================================================

#[test]
fn test_tier_boundaries() {
    assert_eq!(classify_dscr(HIGH_RISK_DSCR - dec!(0.0001)), RiskTier::HighRisk);
    assert_eq!(classify_dscr(HIGH_RISK_DSCR), RiskTier::MediumRisk);
    assert_eq!(classify_dscr(LOW_RISK_DSCR), RiskTier::LowRisk);
    assert_eq!(classify_dscr(dscr(dec!(50_000), dec!(40_000))), RiskTier::LowRisk);
    assert_eq!(classify_dscr(dscr(dec!(50_000), Decimal::ZERO)), RiskTier::HighRisk);
}

// ===========================================================================
// Properties
// ===========================================================================

fn any_amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000).prop_map(|c| Decimal::new(c, 2))
}

fn non_positive() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..=0).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_dscr_zero_without_debt_service(noi in any_amount(), service in non_positive()) {
        prop_assert_eq!(dscr(noi, service), Decimal::ZERO);
    }

    #[test]
    fn prop_dscr_is_quotient(noi in any_amount(), service in 1i64..10_000_000) {
        let service = Decimal::new(service, 2);
        prop_assert_eq!(dscr(noi, service), noi / service);
    }

    #[test]
    fn prop_non_positive_denominators_give_zero(
        net_profit in any_amount(),
        noi in any_amount(),
        current_assets in any_amount(),
        depreciation in any_amount(),
        total_debt in any_amount(),
        revenue in non_positive(),
        current_liabilities in non_positive(),
        interest in non_positive(),
    ) {
        // total_assets == total_debt forces zero equity; total_assets <= 0 is
        // only guaranteed when the debt is non-positive too.
        let r = key_ratios(
            net_profit,
            revenue,
            total_debt,
            current_assets,
            current_liabilities,
            total_debt,
            noi,
            interest,
            depreciation,
        );
        prop_assert_eq!(r.profit_margin, Decimal::ZERO);
        prop_assert_eq!(r.current_ratio, Decimal::ZERO);
        prop_assert_eq!(r.debt_to_equity_ratio, Decimal::ZERO);
        prop_assert_eq!(r.interest_coverage_ratio, Decimal::ZERO);
        prop_assert_eq!(r.operating_cash_flow_ratio, Decimal::ZERO);
        if total_debt <= Decimal::ZERO {
            prop_assert_eq!(r.return_on_assets, Decimal::ZERO);
        }
    }
}
