use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::products::{annual_operating_expenses, base_annual_revenue, Expense, Product};
use crate::ratios::coverage::dscr;
use crate::{types::*, BizplanError, BizplanResult};

const MAX_PROJECTION_YEARS: u32 = 50;

fn default_years() -> u32 {
    5
}

fn default_revenue_growth() -> Percent {
    dec!(10)
}

fn default_opex_growth() -> Percent {
    dec!(5)
}

fn default_projection_tax_rate() -> Percent {
    dec!(25)
}

/// Inputs for a multi-year profit & loss projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlProjectionInput {
    pub year_one_revenue: Money,
    pub year_one_operating_expenses: Money,
    pub cogs_percentage: Percent,
    #[serde(default)]
    pub depreciation: Money,
    #[serde(default)]
    pub interest_expense: Money,
    /// Loan instalment used for the annual DSCR column; zero when unfinanced.
    #[serde(default)]
    pub monthly_loan_payment: Money,
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default = "default_revenue_growth")]
    pub revenue_growth: Percent,
    #[serde(default = "default_opex_growth")]
    pub opex_growth: Percent,
    #[serde(default = "default_projection_tax_rate")]
    pub tax_rate: Percent,
}

impl PnlProjectionInput {
    /// Seed year one from a catalogue and expense list, with default growth.
    pub fn from_catalogue(
        products: &[Product],
        expenses: &[Expense],
        cogs_percentage: Percent,
        depreciation: Money,
        interest_expense: Money,
        monthly_loan_payment: Money,
    ) -> Self {
        Self {
            year_one_revenue: base_annual_revenue(products),
            year_one_operating_expenses: annual_operating_expenses(expenses),
            cogs_percentage,
            depreciation,
            interest_expense,
            monthly_loan_payment,
            years: default_years(),
            revenue_growth: default_revenue_growth(),
            opex_growth: default_opex_growth(),
            tax_rate: default_projection_tax_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlYear {
    pub year: u32,
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub net_operating_income: Money,
    pub depreciation: Money,
    pub earnings_before_tax: Money,
    pub tax: Money,
    pub net_income: Money,
    pub dscr: Multiple,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlProjection {
    pub years: Vec<PnlYear>,
    pub annual_debt_service: Money,
    pub cumulative_net_income: Money,
}

/// Project revenue, costs and DSCR forward with compound growth.
pub fn project_pnl(
    input: &PnlProjectionInput,
) -> BizplanResult<ComputationOutput<PnlProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let revenue_step = Decimal::ONE + input.revenue_growth / dec!(100);
    let opex_step = Decimal::ONE + input.opex_growth / dec!(100);
    let cogs_rate = input.cogs_percentage / dec!(100);
    let tax_rate = input.tax_rate / dec!(100);
    let annual_debt_service = input.monthly_loan_payment * dec!(12);

    if annual_debt_service <= Decimal::ZERO {
        warnings.push("No loan payment supplied; DSCR reported as 0.".into());
    }

    let mut revenue = input.year_one_revenue;
    let mut opex = input.year_one_operating_expenses;
    let mut years = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        if year > 1 {
            revenue *= revenue_step;
            opex *= opex_step;
        }
        let cogs = revenue * cogs_rate;
        let gross_profit = revenue - cogs;
        let noi = gross_profit - opex;
        let ebt = noi - input.depreciation - input.interest_expense;
        let tax = (ebt * tax_rate).max(Decimal::ZERO);

        years.push(PnlYear {
            year,
            revenue,
            cogs,
            gross_profit,
            operating_expenses: opex,
            net_operating_income: noi,
            depreciation: input.depreciation,
            earnings_before_tax: ebt,
            tax,
            net_income: ebt - tax,
            dscr: dscr(noi, annual_debt_service),
        });
    }

    if let Some(first_loss) = years.iter().find(|y| y.net_income < Decimal::ZERO) {
        warnings.push(format!("Net loss projected in year {}.", first_loss.year));
    }

    let cumulative_net_income = years.iter().map(|y| y.net_income).sum();
    let output = PnlProjection {
        years,
        annual_debt_service,
        cumulative_net_income,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "revenue_growth_pct": input.revenue_growth.to_string(),
        "opex_growth_pct": input.opex_growth.to_string(),
        "tax_rate_pct": input.tax_rate.to_string(),
        "tax_floor": "no tax credit on losses",
    });

    Ok(with_metadata(
        "Multi-year P&L projection",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &PnlProjectionInput) -> BizplanResult<()> {
    if input.years == 0 || input.years > MAX_PROJECTION_YEARS {
        return Err(BizplanError::InvalidInput {
            field: "years".into(),
            reason: format!("Projection horizon must be 1-{MAX_PROJECTION_YEARS} years"),
        });
    }
    for (field, value) in [
        ("cogs_percentage", input.cogs_percentage),
        ("tax_rate", input.tax_rate),
    ] {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(BizplanError::InvalidInput {
                field: field.into(),
                reason: format!("{value} is outside 0-100"),
            });
        }
    }
    if input.year_one_revenue < Decimal::ZERO {
        return Err(BizplanError::InvalidInput {
            field: "year_one_revenue".into(),
            reason: "Revenue cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::products::VolumeUnit;

    fn sample_input() -> PnlProjectionInput {
        PnlProjectionInput {
            year_one_revenue: dec!(100_000),
            year_one_operating_expenses: dec!(30_000),
            cogs_percentage: dec!(35),
            depreciation: dec!(3_000),
            interest_expense: dec!(2_000),
            monthly_loan_payment: dec!(1_000),
            years: 5,
            revenue_growth: dec!(10),
            opex_growth: dec!(5),
            tax_rate: dec!(25),
        }
    }

    #[test]
    fn test_year_one_figures() {
        let out = project_pnl(&sample_input()).unwrap();
        let y1 = &out.result.years[0];
        assert_eq!(y1.gross_profit, dec!(65_000));
        assert_eq!(y1.net_operating_income, dec!(35_000));
        assert_eq!(y1.earnings_before_tax, dec!(30_000));
        assert_eq!(y1.tax, dec!(7_500));
        assert_eq!(y1.net_income, dec!(22_500));
        // 35k / 12k
        assert_eq!(y1.dscr, dec!(35_000) / dec!(12_000));
    }

    #[test]
    fn test_growth_compounds_from_year_two() {
        let out = project_pnl(&sample_input()).unwrap();
        let years = &out.result.years;
        assert_eq!(years.len(), 5);
        assert_eq!(years[1].revenue, dec!(110_000));
        assert_eq!(years[2].revenue, dec!(121_000));
        assert_eq!(years[1].operating_expenses, dec!(31_500));
    }

    #[test]
    fn test_loss_year_has_no_tax() {
        let mut input = sample_input();
        input.year_one_operating_expenses = dec!(80_000);
        let out = project_pnl(&input).unwrap();
        let y1 = &out.result.years[0];
        assert_eq!(y1.tax, Decimal::ZERO);
        assert_eq!(y1.net_income, y1.earnings_before_tax);
        assert!(out.warnings.iter().any(|w| w.contains("year 1")));
    }

    #[test]
    fn test_no_loan_reports_zero_dscr() {
        let mut input = sample_input();
        input.monthly_loan_payment = Decimal::ZERO;
        let out = project_pnl(&input).unwrap();
        assert!(out.result.years.iter().all(|y| y.dscr.is_zero()));
    }

    #[test]
    fn test_zero_years_rejected() {
        let mut input = sample_input();
        input.years = 0;
        assert!(project_pnl(&input).is_err());
    }

    #[test]
    fn test_from_catalogue_seeds_year_one() {
        let products = vec![Product::new("Widget", dec!(100), 10, VolumeUnit::Monthly).unwrap()];
        let expenses = vec![Expense::new("Rent", dec!(500), VolumeUnit::Monthly).unwrap()];
        let input = PnlProjectionInput::from_catalogue(
            &products,
            &expenses,
            dec!(35),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert_eq!(input.year_one_revenue, dec!(12_000));
        assert_eq!(input.year_one_operating_expenses, dec!(6_000));
        assert_eq!(input.years, 5);
    }
}
