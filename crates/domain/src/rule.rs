use std::collections::BTreeMap;

use derive_more::{AsRef, Deref, Display};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::validate_combo_rule;

#[derive(AsRefStr, EnumString, Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionType {
    #[strum(serialize = "SWITCH_MOTION")]
    SwitchMotion,
    #[strum(serialize = "REPLACE_DELTA")]
    ReplaceDelta,
    #[strum(serialize = "CLAMP_MUSCLE")]
    ClampMuscle,
}

#[derive(AsRefStr, EnumString, Serialize, Deserialize, Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[strum(serialize = "eq")]
    Eq,
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "not_eq")]
    NotEq,
    #[strum(serialize = "not_in")]
    NotIn,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConditionValue {
    One(String),
    Many(Vec<String>),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TriggerCondition {
    #[serde(rename = "tableKey")]
    pub table_key: String,
    pub operator: Operator,
    pub value: ConditionValue,
}

#[derive(AsRef, Deref, Debug, Default, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionID(String);

impl From<&str> for MotionID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MotionID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SwitchMotionPayload {
    pub proxy_motion_id: MotionID,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReplaceDeltaPayload {
    pub table_key: String,
    pub row_id: String,
    pub deltas: BTreeMap<String, f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClampMusclePayload {
    pub clamps: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    SwitchMotion(SwitchMotionPayload),
    ReplaceDelta(ReplaceDeltaPayload),
    ClampMuscle(ClampMusclePayload),
}

impl ActionPayload {
    #[must_use]
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionPayload::SwitchMotion(_) => ActionType::SwitchMotion,
            ActionPayload::ReplaceDelta(_) => ActionType::ReplaceDelta,
            ActionPayload::ClampMuscle(_) => ActionType::ClampMuscle,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawComboRule {
    pub action_type: String,
    pub trigger_conditions_json: serde_json::Value,
    pub action_payload_json: serde_json::Value,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComboRuleID(Uuid);

impl ComboRuleID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ComboRuleID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ComboRuleID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredComboRule {
    pub id: ComboRuleID,
    pub raw: RawComboRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboRule {
    trigger_conditions: Vec<TriggerCondition>,
    action: ActionPayload,
}

impl ComboRule {
    pub fn parse(raw: &RawComboRule) -> Result<Self, RuleError> {
        let validation = validate_combo_rule(raw);
        if !validation.valid {
            return Err(RuleError::Invalid {
                errors: validation.errors,
            });
        }

        let action_type = raw
            .action_type
            .parse::<ActionType>()
            .map_err(|err| RuleError::Invalid {
                errors: vec![format!("action_type: {err}")],
            })?;
        let trigger_conditions = parse_blob(&raw.trigger_conditions_json)?;
        let action = match action_type {
            ActionType::SwitchMotion => {
                ActionPayload::SwitchMotion(parse_blob(&raw.action_payload_json)?)
            }
            ActionType::ReplaceDelta => {
                ActionPayload::ReplaceDelta(parse_blob(&raw.action_payload_json)?)
            }
            ActionType::ClampMuscle => {
                ActionPayload::ClampMuscle(parse_blob(&raw.action_payload_json)?)
            }
        };

        Ok(Self {
            trigger_conditions,
            action,
        })
    }

    #[must_use]
    pub fn trigger_conditions(&self) -> &[TriggerCondition] {
        &self.trigger_conditions
    }

    #[must_use]
    pub fn action(&self) -> &ActionPayload {
        &self.action
    }
}

fn parse_blob<T: DeserializeOwned>(blob: &serde_json::Value) -> Result<T, RuleError> {
    serde_json::from_value(blob.clone()).map_err(|err| RuleError::Invalid {
        errors: vec![err.to_string()],
    })
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RuleError {
    #[error("invalid combo rule: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn raw(
        action_type: &str,
        trigger_conditions_json: serde_json::Value,
        action_payload_json: serde_json::Value,
    ) -> RawComboRule {
        RawComboRule {
            action_type: action_type.to_string(),
            trigger_conditions_json,
            action_payload_json,
        }
    }

    #[rstest]
    #[case("SWITCH_MOTION", Some(ActionType::SwitchMotion))]
    #[case("REPLACE_DELTA", Some(ActionType::ReplaceDelta))]
    #[case("CLAMP_MUSCLE", Some(ActionType::ClampMuscle))]
    #[case("SWAP_MOTION", None)]
    #[case("switch_motion", None)]
    fn test_action_type_from_str(#[case] token: &str, #[case] expected: Option<ActionType>) {
        assert_eq!(token.parse::<ActionType>().ok(), expected);
    }

    #[rstest]
    #[case("eq", Some(Operator::Eq))]
    #[case("in", Some(Operator::In))]
    #[case("not_eq", Some(Operator::NotEq))]
    #[case("not_in", Some(Operator::NotIn))]
    #[case("neq", None)]
    fn test_operator_from_str(#[case] token: &str, #[case] expected: Option<Operator>) {
        assert_eq!(token.parse::<Operator>().ok(), expected);
    }

    #[test]
    fn test_parse_switch_motion() {
        let rule = ComboRule::parse(&raw(
            "SWITCH_MOTION",
            json!([{"tableKey": "equipment", "operator": "eq", "value": "Barbell"}]),
            json!({"proxy_motion_id": "m_barbell_row"}),
        ))
        .unwrap();

        assert_eq!(
            rule.trigger_conditions(),
            [TriggerCondition {
                table_key: "equipment".to_string(),
                operator: Operator::Eq,
                value: ConditionValue::One("Barbell".to_string()),
            }]
        );
        assert_eq!(
            rule.action(),
            &ActionPayload::SwitchMotion(SwitchMotionPayload {
                proxy_motion_id: "m_barbell_row".into(),
            })
        );
        assert_eq!(rule.action().action_type(), ActionType::SwitchMotion);
    }

    #[test]
    fn test_parse_replace_delta() {
        let rule = ComboRule::parse(&raw(
            "REPLACE_DELTA",
            json!([{"tableKey": "grip", "operator": "in", "value": ["Wide", "Narrow"]}]),
            json!({"table_key": "motions", "row_id": "m1", "deltas": {"chest": 0.1, "back": -0.05}}),
        ))
        .unwrap();

        assert_eq!(
            rule.trigger_conditions(),
            [TriggerCondition {
                table_key: "grip".to_string(),
                operator: Operator::In,
                value: ConditionValue::Many(vec!["Wide".to_string(), "Narrow".to_string()]),
            }]
        );
        assert_eq!(
            rule.action(),
            &ActionPayload::ReplaceDelta(ReplaceDeltaPayload {
                table_key: "motions".to_string(),
                row_id: "m1".to_string(),
                deltas: BTreeMap::from([("chest".to_string(), 0.1), ("back".to_string(), -0.05)]),
            })
        );
    }

    #[test]
    fn test_parse_clamp_muscle() {
        let rule = ComboRule::parse(&raw(
            "CLAMP_MUSCLE",
            json!([{"tableKey": "equipment", "operator": "not_eq", "value": "Machine"}]),
            json!({"clamps": {"BICEPS": 0.8}}),
        ))
        .unwrap();

        assert_eq!(
            rule.action(),
            &ActionPayload::ClampMuscle(ClampMusclePayload {
                clamps: BTreeMap::from([("BICEPS".to_string(), 0.8)]),
            })
        );
    }

    #[test]
    fn test_parse_invalid() {
        let result = ComboRule::parse(&raw("SWITCH_MOTION", json!([]), json!({})));

        assert_eq!(
            result,
            Err(RuleError::Invalid {
                errors: vec![
                    "trigger_conditions_json must have at least one condition".to_string(),
                    "action_payload_json.proxy_motion_id is missing".to_string(),
                ],
            })
        );
    }

    #[test]
    fn test_rule_error_display() {
        assert_eq!(
            RuleError::Invalid {
                errors: vec!["foo".to_string(), "bar".to_string()],
            }
            .to_string(),
            "invalid combo rule: foo; bar"
        );
    }

    #[test]
    fn test_combo_rule_id_nil() {
        assert!(ComboRuleID::nil().is_nil());
        assert!(!ComboRuleID::from(1).is_nil());
    }
}
