use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{BizplanError, BizplanResult};

pub const MONTHS_PER_YEAR: usize = 12;

/// Relative monthly demand weights, January first.
///
/// Raw factors may use any scale; `normalized` rescales them so the twelve
/// weights average to one. Deserialisation goes through
/// [`SeasonalityProfile::new`], so a plain list is checked the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct SeasonalityProfile {
    factors: [Decimal; MONTHS_PER_YEAR],
}

impl Default for SeasonalityProfile {
    fn default() -> Self {
        Self::uniform()
    }
}

impl TryFrom<Vec<Decimal>> for SeasonalityProfile {
    type Error = BizplanError;

    fn try_from(factors: Vec<Decimal>) -> BizplanResult<Self> {
        Self::new(&factors)
    }
}

impl From<SeasonalityProfile> for Vec<Decimal> {
    fn from(profile: SeasonalityProfile) -> Self {
        profile.factors.to_vec()
    }
}

impl SeasonalityProfile {
    pub fn uniform() -> Self {
        Self {
            factors: [Decimal::ONE; MONTHS_PER_YEAR],
        }
    }

    pub fn new(factors: &[Decimal]) -> BizplanResult<Self> {
        let factors: [Decimal; MONTHS_PER_YEAR] =
            factors
                .try_into()
                .map_err(|_| BizplanError::InvalidInput {
                    field: "seasonality_factors".into(),
                    reason: format!(
                        "Expected {MONTHS_PER_YEAR} monthly factors, got {}",
                        factors.len()
                    ),
                })?;
        if let Some(month) = factors.iter().position(|f| *f < Decimal::ZERO) {
            return Err(BizplanError::InvalidInput {
                field: "seasonality_factors".into(),
                reason: format!("Factor for month {} is negative", month + 1),
            });
        }
        Ok(Self { factors })
    }

    pub fn factors(&self) -> &[Decimal; MONTHS_PER_YEAR] {
        &self.factors
    }

    pub fn total(&self) -> Decimal {
        self.factors.iter().copied().sum()
    }

    /// True when the factors carry no information and the uniform profile
    /// is used instead.
    pub fn is_degenerate(&self) -> bool {
        self.total().is_zero()
    }

    /// Factors rescaled to sum to 12. An all-zero profile falls back to
    /// uniform weights.
    pub fn normalized(&self) -> [Decimal; MONTHS_PER_YEAR] {
        let total = self.total();
        if total.is_zero() {
            return [Decimal::ONE; MONTHS_PER_YEAR];
        }
        // Multiply before dividing so a uniform profile normalises to exact ones.
        self.factors.map(|f| f * dec!(12) / total)
    }
}
