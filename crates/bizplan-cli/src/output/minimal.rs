use serde_json::{Map, Value};

/// Headline fields, most specific first.
const HEADLINE_KEYS: [&str; 7] = [
    "monthly_payment",
    "dscr",
    "net_operating_income",
    "cumulative_net_income",
    "current_ratio",
    "total",
    "annual",
];

/// Plan results nest their headline figures one level down.
const NESTED_KEYS: [&str; 2] = ["assessment", "loan"];

/// Print just the headline figure of a result.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match headline(map) {
            Some(val) => println!("{}", format_minimal(val)),
            None => match map.iter().next() {
                Some((key, val)) => println!("{}: {}", key, format_minimal(val)),
                None => println!("{{}}"),
            },
        },
        other => println!("{}", format_minimal(other)),
    }
}

fn headline(map: &Map<String, Value>) -> Option<&Value> {
    let direct = HEADLINE_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null());
    direct.or_else(|| {
        NESTED_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_object))
            .find_map(headline)
    })
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_prefers_payment() {
        let result = json!({"schedule": [], "monthly_payment": "599.55", "total_paid": "1"});
        assert_eq!(headline(result.as_object().unwrap()), Some(&json!("599.55")));
    }

    #[test]
    fn test_headline_looks_inside_plan_assessment() {
        let plan = json!({
            "ratios": {"current_ratio": "1.8"},
            "loan": null,
            "assessment": {"dscr": "1.4", "risk_tier": "low_risk"}
        });
        assert_eq!(headline(plan.as_object().unwrap()), Some(&json!("1.4")));
    }
}
