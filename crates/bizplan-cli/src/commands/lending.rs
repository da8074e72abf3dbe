use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bizplan_core::lending::amortization::{self, LoanTerms};
use bizplan_core::lending::assessment::{self, LoanAssessmentInput};
use bizplan_core::ratios::messages::AssessmentMessages;

use super::structured_input;

/// Arguments for the loan amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "loan-amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long, alias = "interest-rate")]
    pub annual_rate: Option<Decimal>,

    /// Term in years
    #[arg(long, alias = "loan-term")]
    pub term_years: Option<i32>,
}

/// Arguments for the DSCR loan assessment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AssessLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly loan payment
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Annual net operating income
    #[arg(long, alias = "noi")]
    pub net_operating_income: Option<Decimal>,

    /// Annual interest expense
    #[arg(long, default_value = "0")]
    pub interest_expense: Decimal,

    /// Annual net profit
    #[arg(long, default_value = "0")]
    pub annual_net_profit: Decimal,

    /// Quarterly net profit, used when annual net profit is zero
    #[arg(long, default_value = "0")]
    pub quarterly_net_profit: Decimal,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match structured_input(args.input.as_deref())? {
        Some(terms) => terms,
        None => LoanTerms::new(
            args.principal
                .ok_or("--principal is required (or provide --input)")?,
            args.annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        )?,
    };

    let result = amortization::build_amortization_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_assess_loan(
    args: AssessLoanArgs,
    messages: &AssessmentMessages,
) -> Result<Value, Box<dyn std::error::Error>> {
    let assessment_input: LoanAssessmentInput = match structured_input(args.input.as_deref())? {
        Some(input) => input,
        None => LoanAssessmentInput {
            monthly_payment: args
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
            net_operating_income: args
                .net_operating_income
                .ok_or("--net-operating-income is required (or provide --input)")?,
            interest_expense: args.interest_expense,
            annual_net_profit: args.annual_net_profit,
            quarterly_net_profit: args.quarterly_net_profit,
        },
    };

    let result = assessment::calculate_loan_assessment(&assessment_input, messages)?;
    Ok(serde_json::to_value(result)?)
}

