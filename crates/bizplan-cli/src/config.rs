use bizplan_core::ratios::messages::AssessmentMessages;
use std::path::Path;

use crate::input;

const BUNDLED_MESSAGES: &str = include_str!("../assessment_messages.yaml");

/// Read the assessment message table once at startup.
pub fn load_messages(path: Option<&str>) -> Result<AssessmentMessages, Box<dyn std::error::Error>> {
    let table: AssessmentMessages = match path {
        None => serde_yaml::from_str(BUNDLED_MESSAGES)?,
        Some(p) => {
            let contents = input::file::read_text(p)?;
            if is_yaml(p) {
                serde_yaml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse '{}': {}", p, e))?
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| format!("Failed to parse '{}': {}", p, e))?
            }
        }
    };

    let missing = table.missing_tiers();
    if !missing.is_empty() {
        tracing::warn!(?missing, "assessment message table is incomplete");
    }
    Ok(table)
}

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizplan_core::ratios::coverage::RiskTier;

    #[test]
    fn test_bundled_table_is_complete() {
        let table = load_messages(None).unwrap();
        assert!(table.missing_tiers().is_empty());
        assert_eq!(table.get(RiskTier::HighRisk).unwrap().status_class, "danger");
    }

    #[test]
    fn test_yaml_detection() {
        assert!(is_yaml("msgs.yaml"));
        assert!(is_yaml("conf/msgs.yml"));
        assert!(!is_yaml("msgs.json"));
    }
}
