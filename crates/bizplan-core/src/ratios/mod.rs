pub mod coverage;
pub mod key_ratios;
pub mod messages;

use rust_decimal::Decimal;

/// `numerator / denominator`, or zero when the denominator is not positive
/// or the quotient does not fit in a `Decimal`.
///
/// Every ratio in this module reports 0 instead of failing on an empty or
/// negative base.
pub fn guarded_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}
