use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::ratios::coverage::{classify_dscr, dscr, operating_interest_coverage, RiskTier};
use crate::ratios::messages::{AssessmentMessage, AssessmentMessages};
use crate::{types::*, BizplanResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAssessmentInput {
    pub monthly_payment: Money,
    pub net_operating_income: Money,
    #[serde(default)]
    pub interest_expense: Money,
    #[serde(default)]
    pub annual_net_profit: Money,
    #[serde(default)]
    pub quarterly_net_profit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAssessment {
    pub annual_debt_service: Money,
    pub dscr: Multiple,
    /// Absent when there is no loan payment to assess.
    pub risk_tier: Option<RiskTier>,
    pub message: Option<AssessmentMessage>,
    /// NOI / interest expense.
    pub interest_coverage: Multiple,
    pub monthly_net_profit: Money,
}

/// Judge whether operating income can carry a loan payment.
///
/// The message table is passed in by the caller; tiers it does not cover
/// come back with `message: None`.
pub fn assess_loan(input: &LoanAssessmentInput, messages: &AssessmentMessages) -> LoanAssessment {
    let annual_debt_service = input.monthly_payment * dec!(12);

    let (coverage, risk_tier) = if input.monthly_payment > Decimal::ZERO {
        let coverage = dscr(input.net_operating_income, annual_debt_service);
        (coverage, Some(classify_dscr(coverage)))
    } else {
        (Decimal::ZERO, None)
    };

    // Fall back to the quarterly figure when no annual profit is known.
    let monthly_net_profit = if input.annual_net_profit.is_zero() {
        input.quarterly_net_profit / dec!(3)
    } else {
        input.annual_net_profit / dec!(12)
    };

    LoanAssessment {
        annual_debt_service,
        dscr: coverage,
        risk_tier,
        message: risk_tier.and_then(|t| messages.get(t)).cloned(),
        interest_coverage: operating_interest_coverage(
            input.net_operating_income,
            input.interest_expense,
        ),
        monthly_net_profit,
    }
}

pub fn calculate_loan_assessment(
    input: &LoanAssessmentInput,
    messages: &AssessmentMessages,
) -> BizplanResult<ComputationOutput<LoanAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = assess_loan(input, messages);

    match output.risk_tier {
        None => warnings.push("No loan payment supplied; nothing to assess.".into()),
        Some(tier) if output.message.is_none() => {
            tracing::warn!(%tier, "no assessment message configured");
            warnings.push(format!("No assessment message configured for {tier}."));
        }
        Some(_) => {}
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_debt_service": "monthly_payment * 12",
        "high_risk_below": "1.0",
        "low_risk_from": "1.25",
    });

    Ok(with_metadata(
        "DSCR loan assessment",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
