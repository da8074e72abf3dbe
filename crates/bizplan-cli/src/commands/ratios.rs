use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use bizplan_core::ratios::coverage::{self, RiskTier};
use bizplan_core::ratios::key_ratios::{self, BalanceSheetSnapshot, KeyRatiosInput};
use bizplan_core::types::Multiple;

use super::structured_input;

/// Arguments for the key ratio set
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RatiosArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual net profit
    #[arg(long)]
    pub net_profit: Option<Decimal>,

    /// Annual revenue
    #[arg(long, alias = "revenue")]
    pub total_revenue: Option<Decimal>,

    /// Annual net operating income
    #[arg(long, alias = "noi")]
    pub net_operating_income: Option<Decimal>,

    /// Total assets
    #[arg(long, default_value = "0")]
    pub total_assets: Decimal,

    /// Current assets
    #[arg(long, default_value = "0")]
    pub current_assets: Decimal,

    /// Current liabilities
    #[arg(long, default_value = "0")]
    pub current_liabilities: Decimal,

    /// Total debt (total liabilities)
    #[arg(long, default_value = "0")]
    pub total_debt: Decimal,

    /// Annual interest expense
    #[arg(long, default_value = "0")]
    pub interest_expense: Decimal,

    /// Annual depreciation
    #[arg(long, default_value = "0")]
    pub depreciation: Decimal,
}

/// Arguments for a standalone DSCR
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DscrArgs {
    /// Annual net operating income
    #[arg(long, alias = "noi")]
    pub net_operating_income: Decimal,

    /// Annual debt service
    #[arg(long, conflicts_with = "monthly_payment")]
    pub debt_service: Option<Decimal>,

    /// Monthly loan payment, annualised into debt service
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct DscrOutput {
    dscr: Multiple,
    annual_debt_service: Decimal,
    risk_tier: Option<RiskTier>,
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ratios_input: KeyRatiosInput = match structured_input(args.input.as_deref())? {
        Some(input) => input,
        None => KeyRatiosInput {
            net_profit: args
                .net_profit
                .ok_or("--net-profit is required (or provide --input)")?,
            total_revenue: args
                .total_revenue
                .ok_or("--total-revenue is required (or provide --input)")?,
            net_operating_income: args
                .net_operating_income
                .ok_or("--net-operating-income is required (or provide --input)")?,
            balance_sheet: BalanceSheetSnapshot {
                total_assets: args.total_assets,
                current_assets: args.current_assets,
                current_liabilities: args.current_liabilities,
                total_debt: args.total_debt,
                interest_expense: args.interest_expense,
                depreciation: args.depreciation,
            },
        },
    };

    let result = key_ratios::calculate_key_ratios(&ratios_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dscr(args: DscrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let annual_debt_service = match (args.debt_service, args.monthly_payment) {
        (Some(annual), _) => annual,
        (None, Some(monthly)) => monthly * Decimal::from(12),
        (None, None) => return Err("--debt-service or --monthly-payment is required".into()),
    };

    let dscr = coverage::dscr(args.net_operating_income, annual_debt_service);
    let risk_tier = (annual_debt_service > Decimal::ZERO).then(|| coverage::classify_dscr(dscr));

    Ok(serde_json::to_value(DscrOutput {
        dscr,
        annual_debt_service,
        risk_tier,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(noi: i64, annual: Option<i64>, monthly: Option<i64>) -> DscrArgs {
        DscrArgs {
            net_operating_income: Decimal::from(noi),
            debt_service: annual.map(Decimal::from),
            monthly_payment: monthly.map(Decimal::from),
        }
    }

    #[test]
    fn test_dscr_from_monthly_payment() {
        let out = run_dscr(args(120_000, None, Some(10_000))).unwrap();
        assert_eq!(out["risk_tier"], "medium_risk");
        assert_eq!(out["annual_debt_service"], "120000");
    }

    #[test]
    fn test_dscr_without_debt_service_has_no_tier() {
        let out = run_dscr(args(50_000, Some(0), None)).unwrap();
        assert_eq!(out["dscr"], "0");
        assert!(out["risk_tier"].is_null());
    }

    #[test]
    fn test_dscr_requires_debt_service() {
        assert!(run_dscr(args(50_000, None, None)).is_err());
    }
}
