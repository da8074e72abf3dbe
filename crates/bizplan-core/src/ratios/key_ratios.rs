use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::guarded_divide;
use crate::types::*;
use crate::BizplanResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Balance-sheet values supplied by the caller; none of these are derived
/// from the forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetSnapshot {
    #[serde(default)]
    pub total_assets: Money,
    pub current_assets: Money,
    pub current_liabilities: Money,
    pub total_debt: Money,
    pub interest_expense: Money,
    pub depreciation: Money,
}

impl BalanceSheetSnapshot {
    /// Build a snapshot whose totals come from itemised assets and
    /// liabilities.
    pub fn from_items(
        assets: &[LineItem],
        liabilities: &[LineItem],
        current_assets: Money,
        current_liabilities: Money,
        interest_expense: Money,
        depreciation: Money,
    ) -> Self {
        Self {
            total_assets: total_of(assets),
            current_assets,
            current_liabilities,
            total_debt: total_of(liabilities),
            interest_expense,
            depreciation,
        }
    }

    pub fn equity(&self) -> Money {
        self.total_assets - self.total_debt
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRatiosInput {
    pub net_profit: Money,
    pub total_revenue: Money,
    /// NOI (EBIT): gross profit less operating expenses.
    pub net_operating_income: Money,
    #[serde(flatten)]
    pub balance_sheet: BalanceSheetSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    /// Percent of revenue.
    pub profit_margin: Percent,
    /// Percent of total assets.
    #[serde(alias = "roa")]
    pub return_on_assets: Percent,
    pub current_ratio: Multiple,
    pub debt_to_equity_ratio: Multiple,
    pub interest_coverage_ratio: Multiple,
    pub operating_cash_flow_ratio: Multiple,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Profitability, liquidity, leverage and coverage ratios.
///
/// Each ratio is guarded on its own: a non-positive denominator yields 0 for
/// that ratio only. Debt-to-equity therefore reads 0 for a business with zero
/// or negative equity, which is indistinguishable from an unlevered one;
/// callers that care must inspect `total_assets - total_debt` themselves.
#[allow(clippy::too_many_arguments)]
pub fn key_ratios(
    net_profit: Money,
    total_revenue: Money,
    total_assets: Money,
    current_assets: Money,
    current_liabilities: Money,
    total_debt: Money,
    net_operating_income: Money,
    interest_expense: Money,
    depreciation: Money,
) -> RatioSet {
    let equity = total_assets - total_debt;
    let ebitda = net_operating_income + depreciation;
    // Approximation: no working-capital movements are available.
    let operating_cash_flow = net_profit + depreciation + interest_expense;

    RatioSet {
        profit_margin: as_percent(guarded_divide(net_profit, total_revenue)),
        return_on_assets: as_percent(guarded_divide(net_profit, total_assets)),
        current_ratio: guarded_divide(current_assets, current_liabilities),
        debt_to_equity_ratio: guarded_divide(total_debt, equity),
        interest_coverage_ratio: guarded_divide(ebitda, interest_expense),
        operating_cash_flow_ratio: guarded_divide(operating_cash_flow, current_liabilities),
    }
}

/// Fraction to percentage points; a result beyond `Decimal` range reads as 0
/// like any other unusable ratio.
fn as_percent(fraction: Decimal) -> Percent {
    fraction.checked_mul(dec!(100)).unwrap_or(Decimal::ZERO)
}

/// [`key_ratios`] over a typed input, wrapped in the output envelope.
pub fn calculate_key_ratios(
    input: &KeyRatiosInput,
) -> BizplanResult<ComputationOutput<RatioSet>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let bs = &input.balance_sheet;

    let output = key_ratios(
        input.net_profit,
        input.total_revenue,
        bs.total_assets,
        bs.current_assets,
        bs.current_liabilities,
        bs.total_debt,
        input.net_operating_income,
        bs.interest_expense,
        bs.depreciation,
    );

    for (label, denominator) in [
        ("total_revenue", input.total_revenue),
        ("total_assets", bs.total_assets),
        ("current_liabilities", bs.current_liabilities),
        ("equity", bs.equity()),
        ("interest_expense", bs.interest_expense),
    ] {
        if denominator <= Decimal::ZERO {
            warnings.push(format!(
                "{label} is not positive; dependent ratios reported as 0."
            ));
        }
    }
    if bs.equity() < Decimal::ZERO {
        tracing::warn!(equity = %bs.equity(), "negative equity, debt-to-equity suppressed");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ebitda": "net_operating_income + depreciation",
        "operating_cash_flow": "net_profit + depreciation + interest_expense",
        "zero_denominator": "ratio reported as 0",
    });

    Ok(with_metadata(
        "Key financial ratios",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
