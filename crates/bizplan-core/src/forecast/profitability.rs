use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::products::{base_annual_revenue, validate_catalogue, Product};
use super::seasonality::{SeasonalityProfile, MONTHS_PER_YEAR};
use crate::{types::*, BizplanError, BizplanResult};

const QUARTERS_PER_YEAR: usize = 4;
const MONTHS_PER_QUARTER: usize = 3;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

fn default_cogs_percentage() -> Percent {
    dec!(35)
}

fn default_tax_rate() -> Percent {
    dec!(8)
}

/// Cost assumptions applied to every month of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParameters {
    #[serde(default = "default_cogs_percentage")]
    pub cogs_percentage: Percent,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Percent,
    #[serde(default)]
    pub annual_operating_expenses: Money,
    #[serde(default, alias = "seasonality_factors")]
    pub seasonality: SeasonalityProfile,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            cogs_percentage: default_cogs_percentage(),
            tax_rate: default_tax_rate(),
            annual_operating_expenses: Decimal::ZERO,
            seasonality: SeasonalityProfile::uniform(),
        }
    }
}

impl ForecastParameters {
    pub fn validate(&self) -> BizplanResult<()> {
        check_percentage("cogs_percentage", self.cogs_percentage)?;
        check_percentage("tax_rate", self.tax_rate)?;
        if self.annual_operating_expenses < Decimal::ZERO {
            return Err(BizplanError::InvalidInput {
                field: "annual_operating_expenses".into(),
                reason: "Operating expenses cannot be negative".into(),
            });
        }
        Ok(())
    }
}

fn check_percentage(field: &str, value: Percent) -> BizplanResult<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(BizplanError::InvalidInput {
            field: field.into(),
            reason: format!("{value} is outside 0-100"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecastLine {
    pub month: u32,
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub net_profit: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub revenue: Money,
    pub gross_profit: Money,
    pub net_profit: Money,
    pub tax: Money,
}

impl PeriodSummary {
    /// Straight sum over the given months.
    pub fn aggregate(lines: &[MonthlyForecastLine]) -> Self {
        lines.iter().fold(Self::default(), |acc, l| Self {
            revenue: acc.revenue + l.revenue,
            gross_profit: acc.gross_profit + l.gross_profit,
            net_profit: acc.net_profit + l.net_profit,
            tax: acc.tax + l.tax,
        })
    }

    /// Arithmetic mean of several summaries; zero when there are none.
    pub fn mean(summaries: &[PeriodSummary]) -> Self {
        if summaries.is_empty() {
            return Self::default();
        }
        let count = Decimal::from(summaries.len() as u64);
        let total = summaries.iter().fold(Self::default(), |acc, s| Self {
            revenue: acc.revenue + s.revenue,
            gross_profit: acc.gross_profit + s.gross_profit,
            net_profit: acc.net_profit + s.net_profit,
            tax: acc.tax + s.tax,
        });
        Self {
            revenue: total.revenue / count,
            gross_profit: total.gross_profit / count,
            net_profit: total.net_profit / count,
            tax: total.tax / count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityForecast {
    pub monthly: Vec<MonthlyForecastLine>,
    /// Q1..Q4 sums.
    pub quarters: Vec<PeriodSummary>,
    /// Representative quarter: the mean of the four quarter sums, not any
    /// single calendar quarter.
    pub quarterly: PeriodSummary,
    pub annual: PeriodSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitabilityInput {
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub params: ForecastParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuarterlyRevenue {
    pub description: String,
    pub quarters: Vec<Money>,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRevenueBreakdown {
    pub products: Vec<ProductQuarterlyRevenue>,
    pub quarter_totals: Vec<Money>,
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Seasonality-adjusted monthly, quarterly and annual profit forecast.
///
/// Inputs are taken as already sanitised: prices are non-negative and the
/// percentages lie in 0-100. Use [`calculate_profitability`] to have the
/// parameters checked first.
pub fn forecast(products: &[Product], params: &ForecastParameters) -> ProfitabilityForecast {
    let annual_revenue = base_annual_revenue(products);
    let base_monthly_revenue = if annual_revenue > Decimal::ZERO {
        annual_revenue / dec!(12)
    } else {
        Decimal::ZERO
    };
    let monthly_opex = params.annual_operating_expenses / dec!(12);
    let cogs_rate = params.cogs_percentage / dec!(100);
    let tax_rate = params.tax_rate / dec!(100);

    let monthly: Vec<MonthlyForecastLine> = params
        .seasonality
        .normalized()
        .iter()
        .enumerate()
        .map(|(i, factor)| {
            let revenue = base_monthly_revenue * *factor;
            let cogs = revenue * cogs_rate;
            let gross_profit = revenue - cogs;
            let profit_before_tax = gross_profit - monthly_opex;
            // No tax credit on a loss-making month.
            let tax = if profit_before_tax > Decimal::ZERO {
                profit_before_tax * tax_rate
            } else {
                Decimal::ZERO
            };
            MonthlyForecastLine {
                month: i as u32 + 1,
                revenue,
                cogs,
                gross_profit,
                operating_expenses: monthly_opex,
                net_profit: profit_before_tax - tax,
                tax,
            }
        })
        .collect();

    let quarters: Vec<PeriodSummary> = monthly
        .chunks(MONTHS_PER_QUARTER)
        .map(PeriodSummary::aggregate)
        .collect();
    debug_assert_eq!(quarters.len(), QUARTERS_PER_YEAR);

    let quarterly = PeriodSummary::mean(&quarters);
    let annual = PeriodSummary::aggregate(&monthly);

    tracing::debug!(
        products = products.len(),
        annual_revenue = %annual.revenue,
        annual_net_profit = %annual.net_profit,
        "profitability forecast computed"
    );

    ProfitabilityForecast {
        monthly,
        quarters,
        quarterly,
        annual,
    }
}

/// Validated forecast wrapped in the standard output envelope.
pub fn calculate_profitability(
    input: &ProfitabilityInput,
) -> BizplanResult<ComputationOutput<ProfitabilityForecast>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.params.validate()?;
    validate_catalogue(&input.products)?;

    if input.products.is_empty() {
        warnings.push("No products supplied; every revenue figure is zero.".into());
    }
    if input.params.seasonality.is_degenerate() {
        tracing::warn!("seasonality factors sum to zero, using uniform profile");
        warnings.push("Seasonality factors sum to zero; uniform profile used.".into());
    }

    let output = forecast(&input.products, &input.params);

    if output.annual.net_profit < Decimal::ZERO {
        warnings.push("Forecast shows an annual net loss.".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "cogs_percentage": input.params.cogs_percentage.to_string(),
        "tax_rate": input.params.tax_rate.to_string(),
        "annual_operating_expenses": input.params.annual_operating_expenses.to_string(),
        "quarterly_basis": "mean of the four quarter sums",
        "tax_on_losses": "none",
    });

    Ok(with_metadata(
        "Seasonality-adjusted profitability forecast",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Per-product revenue for each calendar quarter after seasonality.
pub fn revenue_by_quarter(
    products: &[Product],
    seasonality: &SeasonalityProfile,
) -> QuarterlyRevenueBreakdown {
    let factors = seasonality.normalized();
    let mut quarter_totals = vec![Decimal::ZERO; QUARTERS_PER_YEAR];

    let rows: Vec<ProductQuarterlyRevenue> = products
        .iter()
        .map(|p| {
            let monthly_revenue = p.annual_revenue() / dec!(12);
            let quarters: Vec<Money> = factors
                .chunks(MONTHS_PER_QUARTER)
                .map(|q| q.iter().map(|f| monthly_revenue * *f).sum())
                .collect();
            for (total, q) in quarter_totals.iter_mut().zip(&quarters) {
                *total += *q;
            }
            ProductQuarterlyRevenue {
                description: p.description.clone(),
                total: quarters.iter().copied().sum(),
                quarters,
            }
        })
        .collect();

    debug_assert_eq!(factors.len(), MONTHS_PER_YEAR);
    let total = quarter_totals.iter().copied().sum();
    QuarterlyRevenueBreakdown {
        products: rows,
        quarter_totals,
        total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::products::VolumeUnit;
    use pretty_assertions::assert_eq;

    fn single_product() -> Vec<Product> {
        vec![Product::new("Widget", dec!(100), 10, VolumeUnit::Monthly).unwrap()]
    }

    #[test]
    fn test_uniform_single_product_month() {
        let result = forecast(&single_product(), &ForecastParameters::default());
        assert_eq!(result.monthly.len(), 12);
        for (i, line) in result.monthly.iter().enumerate() {
            assert_eq!(
                line,
                &MonthlyForecastLine {
                    month: i as u32 + 1,
                    revenue: dec!(1000),
                    cogs: dec!(350),
                    gross_profit: dec!(650),
                    operating_expenses: Decimal::ZERO,
                    net_profit: dec!(598),
                    tax: dec!(52),
                }
            );
        }
        assert_eq!(result.annual.revenue, dec!(12000));
        assert_eq!(result.annual.net_profit, dec!(7176));
    }

    #[test]
    fn test_quarterly_is_mean_of_quarters() {
        let mut params = ForecastParameters::default();
        params.seasonality = SeasonalityProfile::new(&[
            dec!(1), dec!(1), dec!(1), dec!(1), dec!(1), dec!(1),
            dec!(2), dec!(2), dec!(2), dec!(0), dec!(0), dec!(0),
        ])
        .unwrap();
        let result = forecast(&single_product(), &params);
        // Seasonality sum 12 so factors are used as-is.
        assert_eq!(result.quarters[0].revenue, dec!(3000));
        assert_eq!(result.quarters[2].revenue, dec!(6000));
        assert_eq!(result.quarters[3].revenue, Decimal::ZERO);
        assert_eq!(result.quarterly.revenue, dec!(3000));
        assert_eq!(result.quarterly.revenue * dec!(4), result.annual.revenue);
    }

    #[test]
    fn test_loss_month_pays_no_tax() {
        let params = ForecastParameters {
            annual_operating_expenses: dec!(12000),
            ..ForecastParameters::default()
        };
        let result = forecast(&single_product(), &params);
        // pbt = 650 - 1000 = -350
        let jan = &result.monthly[0];
        assert_eq!(jan.tax, Decimal::ZERO);
        assert_eq!(jan.net_profit, dec!(-350));
        assert_eq!(result.annual.net_profit, dec!(-4200));
    }

    #[test]
    fn test_empty_catalogue_is_all_zero() {
        let result = forecast(&[], &ForecastParameters::default());
        assert_eq!(result.annual, PeriodSummary::default());
        assert_eq!(result.quarterly, PeriodSummary::default());
        assert!(result.monthly.iter().all(|m| m.revenue.is_zero()));
    }

    #[test]
    fn test_forecast_is_idempotent() {
        let params = ForecastParameters {
            cogs_percentage: dec!(41.5),
            tax_rate: dec!(21),
            annual_operating_expenses: dec!(7000),
            seasonality: SeasonalityProfile::new(&[
                dec!(0.7), dec!(0.8), dec!(1.1), dec!(1.2), dec!(1.3), dec!(1.0),
                dec!(0.9), dec!(1.0), dec!(1.1), dec!(1.2), dec!(1.4), dec!(2.0),
            ])
            .unwrap(),
        };
        let a = forecast(&single_product(), &params);
        let b = forecast(&single_product(), &params);
        assert_eq!(a, b);
    }

    #[test]
    fn test_calculate_profitability_rejects_bad_percentage() {
        let input = ProfitabilityInput {
            products: single_product(),
            params: ForecastParameters {
                cogs_percentage: dec!(120),
                ..ForecastParameters::default()
            },
        };
        let err = calculate_profitability(&input).unwrap_err();
        match err {
            BizplanError::InvalidInput { field, .. } => assert_eq!(field, "cogs_percentage"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_calculate_profitability_warns_on_empty_and_zero_seasonality() {
        let input = ProfitabilityInput {
            products: vec![],
            params: ForecastParameters {
                seasonality: SeasonalityProfile::new(&[Decimal::ZERO; 12]).unwrap(),
                ..ForecastParameters::default()
            },
        };
        let out = calculate_profitability(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_input_deserialises_with_defaults() {
        let input: ProfitabilityInput = serde_json::from_value(serde_json::json!({
            "products": [
                {"description": "Widget", "price": 100, "sales_volume": 10, "sales_volume_unit": "monthly"}
            ]
        }))
        .unwrap();
        assert_eq!(input.params, ForecastParameters::default());
    }

    #[test]
    fn test_calculate_profitability_rejects_negative_seasonality_from_json() {
        let parsed = serde_json::from_value::<ProfitabilityInput>(serde_json::json!({
            "products": [{"description": "Widget", "price": 100, "sales_volume": 10}],
            "seasonality_factors": [-6, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 4]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_calculate_profitability_rejects_negative_price_from_json() {
        let input: ProfitabilityInput = serde_json::from_value(serde_json::json!({
            "products": [{"description": "Widget", "price": -100, "sales_volume": 10}]
        }))
        .unwrap();
        match calculate_profitability(&input).unwrap_err() {
            BizplanError::InvalidInput { field, .. } => assert_eq!(field, "unit_price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_revenue_by_quarter_matches_forecast() {
        let products = vec![
            Product::new("Widget", dec!(100), 10, VolumeUnit::Monthly).unwrap(),
            Product::new("Service", dec!(300), 6, VolumeUnit::Quarterly).unwrap(),
        ];
        let seasonality = SeasonalityProfile::new(&[
            dec!(1), dec!(1), dec!(1), dec!(2), dec!(2), dec!(2),
            dec!(1), dec!(1), dec!(1), dec!(0), dec!(0), dec!(0),
        ])
        .unwrap();
        let breakdown = revenue_by_quarter(&products, &seasonality);
        let params = ForecastParameters {
            seasonality,
            ..ForecastParameters::default()
        };
        let fc = forecast(&products, &params);

        assert_eq!(breakdown.products.len(), 2);
        // Widget: 1000/month, Q2 weights 2 each => 6000
        assert_eq!(breakdown.products[0].quarters[1], dec!(6000));
        assert_eq!(breakdown.products[0].total, dec!(12000));
        for (q, summary) in breakdown.quarter_totals.iter().zip(&fc.quarters) {
            assert_eq!(*q, summary.revenue);
        }
        assert_eq!(breakdown.total, fc.annual.revenue);
    }
}
