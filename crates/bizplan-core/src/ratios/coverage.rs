use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::guarded_divide;
use crate::types::*;

/// DSCR below this is high risk.
pub const HIGH_RISK_DSCR: Multiple = dec!(1.0);

/// DSCR at or above this is low risk; between the two is medium.
pub const LOW_RISK_DSCR: Multiple = dec!(1.25);

/// Credit-risk band derived from DSCR. Serialises as the lookup key used by
/// assessment message tables (`high_risk`, `medium_risk`, `low_risk`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    HighRisk,
    MediumRisk,
    LowRisk,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::HighRisk, RiskTier::MediumRisk, RiskTier::LowRisk];

    pub fn key(self) -> &'static str {
        match self {
            RiskTier::HighRisk => "high_risk",
            RiskTier::MediumRisk => "medium_risk",
            RiskTier::LowRisk => "low_risk",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Debt Service Coverage Ratio: NOI / total debt service, 0 when there is no
/// debt service.
pub fn dscr(net_operating_income: Money, total_debt_service: Money) -> Multiple {
    guarded_divide(net_operating_income, total_debt_service)
}

/// Map a DSCR onto its risk tier.
pub fn classify_dscr(dscr: Multiple) -> RiskTier {
    if dscr < HIGH_RISK_DSCR {
        RiskTier::HighRisk
    } else if dscr < LOW_RISK_DSCR {
        RiskTier::MediumRisk
    } else {
        RiskTier::LowRisk
    }
}

/// Interest coverage on operating income alone (no depreciation add-back).
pub fn operating_interest_coverage(net_operating_income: Money, interest_expense: Money) -> Multiple {
    guarded_divide(net_operating_income, interest_expense)
}
