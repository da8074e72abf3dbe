use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::coverage::RiskTier;
use crate::{BizplanError, BizplanResult};

/// Human-readable text shown for one risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentMessage {
    pub status: String,
    pub caption: String,
    pub status_class: String,
    pub dscr_status: String,
}

/// Message table keyed by risk tier.
///
/// This is configuration: load it once at startup (from YAML or JSON) and
/// pass it by reference to whatever renders an assessment. Nothing in this
/// crate caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentMessages {
    messages: BTreeMap<RiskTier, AssessmentMessage>,
}

impl AssessmentMessages {
    pub fn new(messages: BTreeMap<RiskTier, AssessmentMessage>) -> Self {
        Self { messages }
    }

    pub fn get(&self, tier: RiskTier) -> Option<&AssessmentMessage> {
        self.messages.get(&tier)
    }

    pub fn missing_tiers(&self) -> Vec<RiskTier> {
        RiskTier::ALL
            .into_iter()
            .filter(|t| !self.messages.contains_key(t))
            .collect()
    }

    /// Fail unless every tier has a message.
    pub fn require_complete(self) -> BizplanResult<Self> {
        let missing = self.missing_tiers();
        if missing.is_empty() {
            return Ok(self);
        }
        let keys: Vec<&str> = missing.iter().map(|t| t.key()).collect();
        Err(BizplanError::InvalidInput {
            field: "assessment_messages".into(),
            reason: format!("missing tiers: {}", keys.join(", ")),
        })
    }

    pub fn from_json_str(raw: &str) -> BizplanResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
