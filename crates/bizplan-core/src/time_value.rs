use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::BizplanError;
use crate::types::{Money, Rate};
use crate::BizplanResult;

/// Compound growth factor `(1 + rate)^nper`, failing instead of overflowing.
pub fn compound_factor(rate: Rate, nper: u32) -> BizplanResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| {
            BizplanError::FinancialImpossibility(format!(
                "(1 + {rate})^{nper} exceeds decimal range"
            ))
        })
}

/// Future Value
pub fn fv(rate: Rate, nper: u32, pmt: Money, present_value: Money) -> BizplanResult<Money> {
    if rate.is_zero() {
        return Ok(-(present_value + pmt * Decimal::from(nper)));
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    Ok(-(present_value * factor + pmt * annuity_factor))
}

/// Payment (PMT), spreadsheet sign convention: a positive loan yields a
/// negative payment.
pub fn pmt(
    rate: Rate,
    nper: u32,
    present_value: Money,
    future_value: Money,
) -> BizplanResult<Money> {
    if nper == 0 {
        return Err(BizplanError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let growth = factor - Decimal::ONE;

    if growth.is_zero() {
        return Err(BizplanError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    // P * r(1+r)^n / ((1+r)^n - 1), generalised for a balloon value. The
    // factor is divided out first so large exponents cannot overflow.
    let leverage = factor / growth;
    Ok(-(present_value * rate * leverage + future_value * rate / growth))
}
