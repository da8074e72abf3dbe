use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::pmt;
use crate::{types::*, BizplanError, BizplanResult};

/// Balances below this are treated as fully repaid. Decimal rounding of the
/// level payment leaves residue of this order after the final period.
pub const BALANCE_TOLERANCE: Money = dec!(0.0000001);

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A fixed-rate, level-payment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    #[serde(alias = "loan_amount")]
    pub principal: Money,
    /// Annual nominal rate in percent (6 = 6%).
    #[serde(alias = "interest_rate")]
    pub annual_rate: Percent,
    #[serde(alias = "loan_term")]
    pub term_years: i32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Percent, term_years: i32) -> BizplanResult<Self> {
        if principal < Decimal::ZERO {
            return Err(BizplanError::InvalidInput {
                field: "principal".into(),
                reason: "Principal cannot be negative".into(),
            });
        }
        if annual_rate < Decimal::ZERO {
            return Err(BizplanError::InvalidInput {
                field: "annual_rate".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if term_years < 0 {
            return Err(BizplanError::InvalidInput {
                field: "term_years".into(),
                reason: "Loan term cannot be negative".into(),
            });
        }
        Ok(Self {
            principal,
            annual_rate,
            term_years,
        })
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / dec!(100) / dec!(12)
    }

    /// Terms that produce an empty schedule and zero payment.
    pub fn is_degenerate(&self) -> bool {
        self.principal <= Decimal::ZERO || self.annual_rate < Decimal::ZERO || self.term_years <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based month number.
    pub period: u32,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub schedule: Vec<AmortizationEntry>,
}

impl AmortizationSchedule {
    pub fn empty() -> Self {
        Self {
            monthly_payment: Decimal::ZERO,
            schedule: Vec::new(),
        }
    }

    pub fn total_interest(&self) -> Money {
        self.schedule.iter().map(|e| e.interest_portion).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.schedule.iter().map(|e| e.principal_portion).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.monthly_payment * Decimal::from(self.schedule.len() as u64)
    }
}

/// Principal and interest paid in one loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyLoanSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanScheduleOutput {
    pub monthly_payment: Money,
    pub schedule: Vec<AmortizationEntry>,
    pub yearly: Vec<YearlyLoanSummary>,
    pub total_interest: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level monthly payment and full month-by-month schedule.
///
/// Non-positive principal, a negative rate or a non-positive term give a
/// zero payment and an empty schedule rather than an error.
///
/// When `(1 + r)^n` is beyond `Decimal` range the payment is taken as its
/// limit, `principal * r`; the neglected term is below decimal precision.
pub fn amortize(
    principal: Money,
    annual_rate: Percent,
    term_years: i32,
) -> BizplanResult<AmortizationSchedule> {
    if principal <= Decimal::ZERO || annual_rate < Decimal::ZERO || term_years <= 0 {
        tracing::debug!(%principal, %annual_rate, term_years, "degenerate loan terms");
        return Ok(AmortizationSchedule::empty());
    }

    let periods = (term_years as u32)
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| BizplanError::InvalidInput {
            field: "term_years".into(),
            reason: format!("{term_years} years is too long to schedule"),
        })?;
    let monthly_rate = annual_rate / dec!(100) / dec!(12);
    let monthly_payment = match pmt(monthly_rate, periods, principal, Decimal::ZERO) {
        Ok(payment) => -payment,
        Err(BizplanError::FinancialImpossibility(_)) => {
            tracing::warn!(%annual_rate, periods, "annuity factor overflows, using interest-only limit");
            principal * monthly_rate
        }
        Err(e) => return Err(e),
    };

    let mut schedule = Vec::with_capacity(periods as usize);
    let mut balance = principal;

    for period in 1..=periods {
        let interest_portion = balance * monthly_rate;
        let principal_portion = monthly_payment - interest_portion;
        balance -= principal_portion;
        // Only the last period absorbs rounding residue; earlier balances are
        // genuine principal still owed.
        let floor = if period == periods { BALANCE_TOLERANCE } else { Decimal::ZERO };
        if balance < floor {
            balance = Decimal::ZERO;
        }
        schedule.push(AmortizationEntry {
            period,
            interest_portion,
            principal_portion,
            remaining_balance: balance,
        });
    }

    tracing::debug!(%monthly_payment, periods, "amortization schedule built");

    Ok(AmortizationSchedule {
        monthly_payment,
        schedule,
    })
}

/// Roll a monthly schedule up into loan years (months 1-12 are year 1).
pub fn yearly_summary(schedule: &[AmortizationEntry]) -> Vec<YearlyLoanSummary> {
    let mut years: Vec<YearlyLoanSummary> = Vec::new();
    for entry in schedule {
        let year = (entry.period - 1) / MONTHS_PER_YEAR + 1;
        match years.last_mut() {
            Some(current) if current.year == year => {
                current.principal_paid += entry.principal_portion;
                current.interest_paid += entry.interest_portion;
                current.closing_balance = entry.remaining_balance;
            }
            _ => years.push(YearlyLoanSummary {
                year,
                principal_paid: entry.principal_portion,
                interest_paid: entry.interest_portion,
                closing_balance: entry.remaining_balance,
            }),
        }
    }
    years
}

/// Schedule for the given terms with yearly roll-up and totals.
pub fn build_amortization_schedule(
    terms: &LoanTerms,
) -> BizplanResult<ComputationOutput<LoanScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if terms.is_degenerate() {
        warnings.push(
            "Principal and term must be positive and rate non-negative; empty schedule returned."
                .into(),
        );
    }

    let amortized = amortize(terms.principal, terms.annual_rate, terms.term_years)?;
    if !amortized.schedule.is_empty() && terms.annual_rate.is_zero() {
        warnings.push("Zero interest rate; payments are straight-line principal.".into());
    }
    if let Some(last) = amortized.schedule.last() {
        if last.remaining_balance > Decimal::ZERO {
            warnings.push(format!(
                "Rate and term exceed decimal precision; {} of principal is not retired by the final payment.",
                last.remaining_balance
            ));
        }
    }

    let output = LoanScheduleOutput {
        monthly_payment: amortized.monthly_payment,
        yearly: yearly_summary(&amortized.schedule),
        total_interest: amortized.total_interest(),
        total_paid: amortized.total_paid(),
        schedule: amortized.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "principal": terms.principal.to_string(),
        "annual_rate_pct": terms.annual_rate.to_string(),
        "term_years": terms.term_years,
        "compounding": "monthly",
        "payment": "level annuity",
    });

    Ok(with_metadata(
        "Fixed-payment loan amortization",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
