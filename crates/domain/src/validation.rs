use serde::Serialize;
use serde_json::{Map, Value};

use crate::{ActionType, Operator, RawComboRule};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RuleValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check the structural shape of a combo rule before it is saved.
///
/// Every independent problem is collected into the error list, so an author
/// sees the full list in one pass. An unrecognized `action_type` does not
/// stop the remaining checks; the payload is checked against the shape the
/// claimed type demands, or not at all if the type is unknown.
#[must_use]
pub fn validate_combo_rule(rule: &RawComboRule) -> RuleValidation {
    let mut errors = Vec::new();

    let action_type = match rule.action_type.parse::<ActionType>() {
        Ok(action_type) => Some(action_type),
        Err(_) => {
            errors.push(format!(
                "action_type must be one of SWITCH_MOTION, REPLACE_DELTA, CLAMP_MUSCLE (got \"{}\")",
                rule.action_type
            ));
            None
        }
    };

    check_trigger_conditions(&rule.trigger_conditions_json, &mut errors);

    if let Some(action_type) = action_type {
        check_action_payload(action_type, &rule.action_payload_json, &mut errors);
    }

    RuleValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_trigger_conditions(conditions: &Value, errors: &mut Vec<String>) {
    let Value::Array(conditions) = conditions else {
        errors.push(format!(
            "trigger_conditions_json must be an array of conditions (got {})",
            json_type(conditions)
        ));
        return;
    };

    if conditions.is_empty() {
        errors.push("trigger_conditions_json must have at least one condition".to_string());
    }

    for (index, condition) in conditions.iter().enumerate() {
        check_condition(index, condition, errors);
    }
}

fn check_condition(index: usize, condition: &Value, errors: &mut Vec<String>) {
    let path = format!("trigger_conditions_json[{index}]");

    let Value::Object(fields) = condition else {
        errors.push(format!(
            "{path} must be an object (got {})",
            json_type(condition)
        ));
        return;
    };

    check_string_field(fields, &path, "tableKey", errors);

    match fields.get("operator") {
        None => errors.push(format!("{path}.operator is missing")),
        Some(Value::String(token)) => {
            if token.parse::<Operator>().is_err() {
                errors.push(format!(
                    "{path}.operator must be one of eq, in, not_eq, not_in (got \"{token}\")"
                ));
            }
        }
        Some(other) => errors.push(format!(
            "{path}.operator must be a string (got {})",
            json_type(other)
        )),
    }

    match fields.get("value") {
        None => errors.push(format!("{path}.value is missing")),
        Some(Value::String(value)) => {
            if value.is_empty() {
                errors.push(format!("{path}.value must not be empty"));
            }
        }
        Some(Value::Array(values)) => {
            for (value_index, value) in values.iter().enumerate() {
                if !value.is_string() {
                    errors.push(format!(
                        "{path}.value[{value_index}] must be a string (got {})",
                        json_type(value)
                    ));
                }
            }
        }
        Some(other) => errors.push(format!(
            "{path}.value must be a string or an array of strings (got {})",
            json_type(other)
        )),
    }
}

fn check_action_payload(action_type: ActionType, payload: &Value, errors: &mut Vec<String>) {
    let Value::Object(fields) = payload else {
        errors.push(format!(
            "action_payload_json must be an object (got {})",
            json_type(payload)
        ));
        return;
    };

    match action_type {
        ActionType::SwitchMotion => {
            check_string_field(fields, "action_payload_json", "proxy_motion_id", errors);
        }
        ActionType::ReplaceDelta => {
            check_string_field(fields, "action_payload_json", "table_key", errors);
            check_string_field(fields, "action_payload_json", "row_id", errors);
            check_number_map_field(fields, "action_payload_json", "deltas", errors);
        }
        ActionType::ClampMuscle => {
            check_number_map_field(fields, "action_payload_json", "clamps", errors);
        }
    }
}

fn check_string_field(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    errors: &mut Vec<String>,
) {
    match fields.get(field) {
        None => errors.push(format!("{path}.{field} is missing")),
        Some(Value::String(value)) => {
            if value.is_empty() {
                errors.push(format!("{path}.{field} must not be empty"));
            }
        }
        Some(other) => errors.push(format!(
            "{path}.{field} must be a string (got {})",
            json_type(other)
        )),
    }
}

fn check_number_map_field(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    errors: &mut Vec<String>,
) {
    match fields.get(field) {
        None => errors.push(format!("{path}.{field} is missing")),
        Some(Value::Object(entries)) => {
            for (key, value) in entries {
                if !value.is_number() {
                    errors.push(format!(
                        "{path}.{field}.{key} must be a number (got {})",
                        json_type(value)
                    ));
                }
            }
        }
        Some(other) => errors.push(format!(
            "{path}.{field} must be an object (got {})",
            json_type(other)
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
