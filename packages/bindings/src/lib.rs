use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bizplan_core::ratios::messages::AssessmentMessages;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Message table supplied by the host; tiers are still computed without one.
fn parse_messages(messages_json: Option<String>) -> NapiResult<AssessmentMessages> {
    match messages_json {
        Some(raw) => AssessmentMessages::from_json_str(&raw).map_err(to_napi_error),
        None => Ok(AssessmentMessages::default()),
    }
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_profitability(input_json: String) -> NapiResult<String> {
    let input: bizplan_core::forecast::profitability::ProfitabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bizplan_core::forecast::profitability::calculate_profitability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn revenue_by_quarter(input_json: String) -> NapiResult<String> {
    let input: bizplan_core::forecast::profitability::ProfitabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    bizplan_core::forecast::products::validate_catalogue(&input.products).map_err(to_napi_error)?;
    let output = bizplan_core::forecast::profitability::revenue_by_quarter(
        &input.products,
        &input.params.seasonality,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_pnl(input_json: String) -> NapiResult<String> {
    let input: bizplan_core::forecast::projection::PnlProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bizplan_core::forecast::projection::project_pnl(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lending
// ---------------------------------------------------------------------------

#[napi]
pub fn build_amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: bizplan_core::lending::amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bizplan_core::lending::amortization::build_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn assess_loan(input_json: String, messages_json: Option<String>) -> NapiResult<String> {
    let input: bizplan_core::lending::assessment::LoanAssessmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let messages = parse_messages(messages_json)?;
    let output = bizplan_core::lending::assessment::calculate_loan_assessment(&input, &messages)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

#[napi]
pub fn key_ratios(input_json: String) -> NapiResult<String> {
    let input: bizplan_core::ratios::key_ratios::KeyRatiosInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bizplan_core::ratios::key_ratios::calculate_key_ratios(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct DscrInput {
    net_operating_income: Decimal,
    total_debt_service: Decimal,
}

#[derive(Serialize)]
struct DscrOutput {
    dscr: Decimal,
    risk_tier: Option<bizplan_core::ratios::coverage::RiskTier>,
}

#[napi]
pub fn dscr(input_json: String) -> NapiResult<String> {
    let input: DscrInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let dscr = bizplan_core::ratios::coverage::dscr(
        input.net_operating_income,
        input.total_debt_service,
    );
    let risk_tier = (input.total_debt_service > Decimal::ZERO)
        .then(|| bizplan_core::ratios::coverage::classify_dscr(dscr));
    serde_json::to_string(&DscrOutput { dscr, risk_tier }).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn build_financial_plan(input_json: String, messages_json: Option<String>) -> NapiResult<String> {
    let input: bizplan_core::planning::financial_plan::FinancialPlanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let messages = parse_messages(messages_json)?;
    let output = bizplan_core::planning::financial_plan::build_financial_plan(&input, &messages)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
