use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bizplan_core::forecast::products::{self, Expense, Product};
use bizplan_core::forecast::profitability::{self, ProfitabilityInput};
use bizplan_core::forecast::projection::{self, PnlProjectionInput};
use bizplan_core::forecast::seasonality::SeasonalityProfile;

use super::structured_input;

/// Arguments for the seasonality-adjusted profit forecast
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to JSON input file with products and forecast parameters
    #[arg(long)]
    pub input: Option<String>,

    /// Override the cost of goods sold percentage
    #[arg(long, alias = "cogs")]
    pub cogs_percentage: Option<Decimal>,

    /// Override the tax rate percentage
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Override annual operating expenses
    #[arg(long, alias = "opex")]
    pub operating_expenses: Option<Decimal>,
}

/// Arguments for the per-product quarterly revenue breakdown
#[derive(Args)]
pub struct QuarterlyRevenueArgs {
    /// Path to JSON input file with products and seasonality
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the multi-year P&L projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectionArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Year-one revenue
    #[arg(long, alias = "revenue")]
    pub year_one_revenue: Option<Decimal>,

    /// Year-one operating expenses
    #[arg(long, alias = "opex")]
    pub year_one_operating_expenses: Option<Decimal>,

    /// Cost of goods sold percentage
    #[arg(long, alias = "cogs", default_value = "35")]
    pub cogs_percentage: Decimal,

    /// Annual depreciation
    #[arg(long, default_value = "0")]
    pub depreciation: Decimal,

    /// Annual interest expense
    #[arg(long, default_value = "0")]
    pub interest_expense: Decimal,

    /// Monthly loan payment used for debt service
    #[arg(long, default_value = "0")]
    pub monthly_loan_payment: Decimal,

    /// Number of years to project
    #[arg(long, default_value = "5")]
    pub years: u32,

    /// Annual revenue growth percentage
    #[arg(long, default_value = "10")]
    pub revenue_growth: Decimal,

    /// Annual operating expense growth percentage
    #[arg(long, default_value = "5")]
    pub opex_growth: Decimal,

    /// Income tax percentage
    #[arg(long, default_value = "25")]
    pub tax_rate: Decimal,
}

/// Catalogue-only input for the quarterly breakdown; any other fields are ignored.
#[derive(serde::Deserialize)]
struct CatalogueInput {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default, alias = "seasonality_factors")]
    seasonality: SeasonalityProfile,
}

/// Catalogue and expense list, used to seed a projection from a plan file.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ProjectionSource {
    Explicit(PnlProjectionInput),
    Catalogue {
        products: Vec<Product>,
        #[serde(default)]
        expenses: Vec<Expense>,
    },
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut forecast_input: ProfitabilityInput = structured_input(args.input.as_deref())?
        .ok_or("--input file (or piped JSON) with a product list is required")?;

    if let Some(cogs) = args.cogs_percentage {
        forecast_input.params.cogs_percentage = cogs;
    }
    if let Some(tax) = args.tax_rate {
        forecast_input.params.tax_rate = tax;
    }
    if let Some(opex) = args.operating_expenses {
        forecast_input.params.annual_operating_expenses = opex;
    }

    let result = profitability::calculate_profitability(&forecast_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_quarterly_revenue(args: QuarterlyRevenueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalogue: CatalogueInput = structured_input(args.input.as_deref())?
        .ok_or("--input file (or piped JSON) with a product list is required")?;

    products::validate_catalogue(&catalogue.products)?;
    let result = profitability::revenue_by_quarter(&catalogue.products, &catalogue.seasonality);
    Ok(serde_json::to_value(result)?)
}

pub fn run_projection(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let projection_input = match structured_input(args.input.as_deref())? {
        Some(ProjectionSource::Explicit(input)) => input,
        Some(ProjectionSource::Catalogue { products, expenses }) => {
            PnlProjectionInput::from_catalogue(
                &products,
                &expenses,
                args.cogs_percentage,
                args.depreciation,
                args.interest_expense,
                args.monthly_loan_payment,
            )
        }
        None => PnlProjectionInput {
            year_one_revenue: args
                .year_one_revenue
                .ok_or("--year-one-revenue is required (or provide --input)")?,
            year_one_operating_expenses: args
                .year_one_operating_expenses
                .ok_or("--year-one-operating-expenses is required (or provide --input)")?,
            cogs_percentage: args.cogs_percentage,
            depreciation: args.depreciation,
            interest_expense: args.interest_expense,
            monthly_loan_payment: args.monthly_loan_payment,
            years: args.years,
            revenue_growth: args.revenue_growth,
            opex_growth: args.opex_growth,
            tax_rate: args.tax_rate,
        },
    };

    let result = projection::project_pnl(&projection_input)?;
    Ok(serde_json::to_value(result)?)
}
