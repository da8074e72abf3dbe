use clap::Args;
use serde_json::Value;

use bizplan_core::planning::financial_plan::{self, FinancialPlanInput};
use bizplan_core::ratios::messages::AssessmentMessages;

use super::structured_input;

/// Arguments for the full financial plan
#[derive(Args)]
pub struct PlanArgs {
    /// Path to JSON plan file: products, expenses, balance sheet items and optional loan
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_plan(
    args: PlanArgs,
    messages: &AssessmentMessages,
) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: FinancialPlanInput = structured_input(args.input.as_deref())?
        .ok_or("--input file (or piped JSON) with the plan is required")?;

    let result = financial_plan::build_financial_plan(&plan_input, messages)?;
    Ok(serde_json::to_value(result)?)
}
