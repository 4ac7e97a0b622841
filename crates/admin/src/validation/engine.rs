use serde_json::Value;

use super::{Rule, RuleSet, ValidationErrors};

/// Evaluate `rules` against a JSON object payload.
///
/// `unique_holder(field, value)` returns the id of the record that already
/// holds `value`, if any. Non-object payloads are treated as empty objects.
pub fn evaluate(
    rules: &RuleSet,
    payload: &Value,
    unique_holder: &dyn Fn(&str, &str) -> Option<u64>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for (field, field_rules) in rules.iter() {
        match field.strip_suffix(".*") {
            Some(parent) => {
                if let Some(Value::Array(items)) = payload.get(parent) {
                    for (index, item) in items.iter().enumerate() {
                        let key = format!("{parent}.{index}");
                        check_value(&key, field, Some(item), field_rules, unique_holder, &mut errors);
                    }
                }
            }
            None => {
                check_value(field, field, payload.get(field), field_rules, unique_holder, &mut errors);
            }
        }
    }

    errors.into_result()
}

fn check_value(
    key: &str,
    rule_field: &str,
    value: Option<&Value>,
    rules: &[Rule],
    unique_holder: &dyn Fn(&str, &str) -> Option<u64>,
    errors: &mut ValidationErrors,
) {
    let attr = key.replace('_', " ");

    if rules.contains(&Rule::Required) && is_blank(value) {
        errors.add(key, format!("The {attr} field is required."));
        return;
    }

    let value = match value {
        None => return,
        Some(Value::Null) if rules.contains(&Rule::Nullable) => return,
        Some(v) => v,
    };

    for rule in rules {
        match rule {
            Rule::Required | Rule::Nullable => {}
            Rule::String => {
                if !value.is_string() {
                    errors.add(key, format!("The {attr} field must be a string."));
                    return;
                }
            }
            Rule::Array => {
                if !value.is_array() {
                    errors.add(key, format!("The {attr} field must be an array."));
                    return;
                }
            }
            Rule::Max(max) => match value {
                Value::String(s) if s.chars().count() > *max => {
                    errors.add(
                        key,
                        format!("The {attr} field must not be greater than {max} characters."),
                    );
                }
                Value::Array(items) if items.len() > *max => {
                    errors.add(key, format!("The {attr} field must not have more than {max} items."));
                }
                _ => {}
            },
            Rule::Unique { ignore } => {
                if let Some(s) = value.as_str() {
                    if let Some(holder) = unique_holder(rule_field, s) {
                        if Some(holder) != *ignore {
                            errors.add(key, format!("The {attr} has already been taken."));
                        }
                    }
                }
            }
            Rule::In(allowed) => {
                let ok = value.as_str().is_some_and(|s| allowed.contains(s));
                if !ok {
                    errors.add(key, format!("The selected {attr} is invalid."));
                }
            }
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use super::*;

    fn no_holders(_: &str, _: &str) -> Option<u64> {
        None
    }

    #[test]
    fn missing_required_field_reports_once() {
        let rules = RuleSet::new().field("name", vec![Rule::Required, Rule::String, Rule::Max(5)]);
        let errors = evaluate(&rules, &json!({}), &no_holders).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let rules = RuleSet::new().field("name", vec![Rule::Required]);
        assert!(evaluate(&rules, &json!({ "name": "   " }), &no_holders).is_err());
    }

    #[test]
    fn type_failure_stops_later_rules() {
        let rules = RuleSet::new().field("name", vec![Rule::Required, Rule::String, Rule::Max(1)]);
        let errors = evaluate(&rules, &json!({ "name": 12345 }), &no_holders).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name field must be a string."]);
    }

    #[test]
    fn nullable_skips_remaining_rules() {
        let rules = RuleSet::new().field("description", vec![Rule::Nullable, Rule::String]);
        assert!(evaluate(&rules, &json!({ "description": null }), &no_holders).is_ok());
    }

    #[test]
    fn null_without_nullable_fails_type_check() {
        let rules = RuleSet::new().field("description", vec![Rule::String]);
        let errors = evaluate(&rules, &json!({ "description": null }), &no_holders).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn optional_absent_field_is_skipped() {
        let rules = RuleSet::new().field("description", vec![Rule::String, Rule::Max(3)]);
        assert!(evaluate(&rules, &json!({}), &no_holders).is_ok());
    }

    #[test]
    fn max_counts_characters_not_bytes() {
        let rules = RuleSet::new().field("name", vec![Rule::String, Rule::Max(3)]);
        assert!(evaluate(&rules, &json!({ "name": "äöü" }), &no_holders).is_ok());
        assert!(evaluate(&rules, &json!({ "name": "äöüß" }), &no_holders).is_err());
    }

    #[test]
    fn wildcard_reports_concrete_index() {
        let allowed: BTreeSet<String> = ["A".to_string()].into();
        let rules = RuleSet::new().field("codes.*", vec![Rule::In(allowed)]);

        let errors = evaluate(&rules, &json!({ "codes": ["A", "B", "A", 7] }), &no_holders).unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["codes.1", "codes.3"]);
        assert_eq!(errors.get("codes.1").unwrap(), ["The selected codes.1 is invalid."]);
    }

    #[test]
    fn unique_honours_ignore() {
        let holder = |_: &str, v: &str| if v == "taken" { Some(5) } else { None };

        let rules = RuleSet::new().field("name", vec![Rule::Unique { ignore: Some(5) }]);
        assert!(evaluate(&rules, &json!({ "name": "taken" }), &holder).is_ok());

        let rules = RuleSet::new().field("name", vec![Rule::Unique { ignore: Some(6) }]);
        let errors = evaluate(&rules, &json!({ "name": "taken" }), &holder).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), ["The name has already been taken."]);
    }

    #[test]
    fn non_object_payload_behaves_like_empty_object() {
        let rules = RuleSet::new().field("name", vec![Rule::Required]);
        assert!(evaluate(&rules, &json!(["not", "an", "object"]), &no_holders).is_err());
    }
}
