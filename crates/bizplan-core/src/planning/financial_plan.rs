use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::forecast::products::{
    annual_operating_expenses, validate_catalogue, validate_expenses, Expense, Product,
};
use crate::forecast::profitability::{forecast, ForecastParameters, ProfitabilityForecast};
use crate::forecast::seasonality::SeasonalityProfile;
use crate::lending::amortization::{amortize, AmortizationSchedule, LoanTerms};
use crate::lending::assessment::{assess_loan, LoanAssessment, LoanAssessmentInput};
use crate::ratios::key_ratios::{key_ratios, BalanceSheetSnapshot, RatioSet};
use crate::ratios::messages::AssessmentMessages;
use crate::{types::*, BizplanResult};

fn default_cogs_percentage() -> Percent {
    dec!(35)
}

fn default_tax_rate() -> Percent {
    dec!(8)
}

/// Everything a business owner has entered, in one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialPlanInput {
    pub products: Vec<Product>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default = "default_cogs_percentage")]
    pub cogs_percentage: Percent,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Percent,
    #[serde(default)]
    pub seasonality: SeasonalityProfile,
    /// Overrides the total implied by `expenses` when set.
    #[serde(default)]
    pub annual_operating_expenses: Option<Money>,
    #[serde(default)]
    pub assets: Vec<LineItem>,
    #[serde(default)]
    pub liabilities: Vec<LineItem>,
    #[serde(default)]
    pub current_assets: Money,
    #[serde(default)]
    pub current_liabilities: Money,
    #[serde(default)]
    pub interest_expense: Money,
    #[serde(default)]
    pub depreciation: Money,
    #[serde(default)]
    pub loan: Option<LoanTerms>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialPlan {
    pub forecast: ProfitabilityForecast,
    pub annual_operating_expenses: Money,
    pub balance_sheet: BalanceSheetSnapshot,
    pub net_operating_income: Money,
    /// Computed from annual figures; applies to the quarterly view as well.
    pub ratios: RatioSet,
    pub loan: Option<AmortizationSchedule>,
    pub assessment: Option<LoanAssessment>,
}

/// Forecast, ratios and (optionally) loan assessment in a single pass.
pub fn build_financial_plan(
    input: &FinancialPlanInput,
    messages: &AssessmentMessages,
) -> BizplanResult<ComputationOutput<FinancialPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let opex = input
        .annual_operating_expenses
        .unwrap_or_else(|| annual_operating_expenses(&input.expenses));

    let params = ForecastParameters {
        cogs_percentage: input.cogs_percentage,
        tax_rate: input.tax_rate,
        annual_operating_expenses: opex,
        seasonality: input.seasonality.clone(),
    };
    params.validate()?;
    validate_catalogue(&input.products)?;
    validate_expenses(&input.expenses)?;

    if input.products.is_empty() {
        warnings.push("No products supplied; every revenue figure is zero.".into());
    }
    if input.seasonality.is_degenerate() {
        warnings.push("Seasonality factors sum to zero; uniform profile used.".into());
    }

    let projected = forecast(&input.products, &params);

    let balance_sheet = BalanceSheetSnapshot::from_items(
        &input.assets,
        &input.liabilities,
        input.current_assets,
        input.current_liabilities,
        input.interest_expense,
        input.depreciation,
    );
    let net_operating_income = projected.annual.gross_profit - opex;

    let ratios = key_ratios(
        projected.annual.net_profit,
        projected.annual.revenue,
        balance_sheet.total_assets,
        balance_sheet.current_assets,
        balance_sheet.current_liabilities,
        balance_sheet.total_debt,
        net_operating_income,
        balance_sheet.interest_expense,
        balance_sheet.depreciation,
    );

    let (loan, assessment) = match &input.loan {
        Some(terms) => {
            let schedule = amortize(terms.principal, terms.annual_rate, terms.term_years)?;
            if schedule.schedule.is_empty() {
                warnings.push("Loan terms are degenerate; no schedule produced.".into());
            }
            let assessment = assess_loan(
                &LoanAssessmentInput {
                    monthly_payment: schedule.monthly_payment,
                    net_operating_income,
                    interest_expense: input.interest_expense,
                    annual_net_profit: projected.annual.net_profit,
                    quarterly_net_profit: projected.quarterly.net_profit,
                },
                messages,
            );
            (Some(schedule), Some(assessment))
        }
        None => (None, None),
    };

    if net_operating_income < Decimal::ZERO {
        warnings.push("Net operating income is negative.".into());
    }

    tracing::debug!(
        %net_operating_income,
        financed = loan.is_some(),
        "financial plan built"
    );

    let output = FinancialPlan {
        forecast: projected,
        annual_operating_expenses: opex,
        balance_sheet,
        net_operating_income,
        ratios,
        loan,
        assessment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "net_operating_income": "annual gross profit - annual operating expenses",
        "opex_source": if input.annual_operating_expenses.is_some() { "override" } else { "expense list" },
        "total_assets": "sum of asset line items",
        "total_debt": "sum of liability line items",
    });

    Ok(with_metadata(
        "Small-business financial plan",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::products::VolumeUnit;
    use crate::ratios::coverage::RiskTier;
    use crate::BizplanError;

    fn sample_input() -> FinancialPlanInput {
        FinancialPlanInput {
            products: vec![Product::new("Widget", dec!(100), 10, VolumeUnit::Monthly).unwrap()],
            expenses: vec![Expense::new("Rent", dec!(100), VolumeUnit::Monthly).unwrap()],
            cogs_percentage: dec!(35),
            tax_rate: dec!(8),
            seasonality: SeasonalityProfile::uniform(),
            annual_operating_expenses: None,
            assets: vec![LineItem { description: "Kit".into(), amount: dec!(20_000) }],
            liabilities: vec![LineItem { description: "Loan".into(), amount: dec!(5_000) }],
            current_assets: dec!(15_000),
            current_liabilities: dec!(8_000),
            interest_expense: dec!(2_000),
            depreciation: dec!(3_000),
            loan: Some(LoanTerms::new(dec!(12_000), Decimal::ZERO, 2).unwrap()),
        }
    }

    #[test]
    fn test_plan_derives_noi_from_expense_list() {
        let out = build_financial_plan(&sample_input(), &AssessmentMessages::default()).unwrap();
        let plan = &out.result;
        assert_eq!(plan.annual_operating_expenses, dec!(1_200));
        // gross 7800 - opex 1200
        assert_eq!(plan.net_operating_income, dec!(6_600));
        assert_eq!(plan.balance_sheet.total_assets, dec!(20_000));
        assert_eq!(plan.balance_sheet.total_debt, dec!(5_000));
    }

    #[test]
    fn test_plan_ratios_use_annual_figures() {
        let out = build_financial_plan(&sample_input(), &AssessmentMessages::default()).unwrap();
        let plan = &out.result;
        let expected = key_ratios(
            plan.forecast.annual.net_profit,
            plan.forecast.annual.revenue,
            dec!(20_000),
            dec!(15_000),
            dec!(8_000),
            dec!(5_000),
            dec!(6_600),
            dec!(2_000),
            dec!(3_000),
        );
        assert_eq!(plan.ratios, expected);
        assert_eq!(plan.ratios.interest_coverage_ratio, dec!(4.8));
    }

    #[test]
    fn test_plan_assesses_loan() {
        let out = build_financial_plan(&sample_input(), &AssessmentMessages::default()).unwrap();
        let plan = &out.result;
        let loan = plan.loan.as_ref().unwrap();
        assert_eq!(loan.monthly_payment, dec!(500));
        let assessment = plan.assessment.as_ref().unwrap();
        // 6600 / 6000
        assert_eq!(assessment.dscr, dec!(1.1));
        assert_eq!(assessment.risk_tier, Some(RiskTier::MediumRisk));
    }

    #[test]
    fn test_opex_override_and_no_loan() {
        let mut input = sample_input();
        input.annual_operating_expenses = Some(dec!(12_000));
        input.loan = None;
        let out = build_financial_plan(&input, &AssessmentMessages::default()).unwrap();
        assert_eq!(out.result.annual_operating_expenses, dec!(12_000));
        assert!(out.result.loan.is_none());
        assert!(out.result.assessment.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("negative")));
    }

    #[test]
    fn test_plan_rejects_negative_line_values() {
        let mut input = sample_input();
        input.products[0].unit_price = dec!(-1);
        assert!(build_financial_plan(&input, &AssessmentMessages::default()).is_err());

        let mut input = sample_input();
        input.expenses[0].amount = dec!(-1);
        match build_financial_plan(&input, &AssessmentMessages::default()).unwrap_err() {
            BizplanError::InvalidInput { field, .. } => assert_eq!(field, "amount"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
