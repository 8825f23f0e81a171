use std::collections::BTreeMap;

use log::warn;

use crate::{ActionPayload, ComboRule, ConditionValue, MotionID, Operator, TriggerCondition};

pub const MOTION_TABLE_KEY: &str = "motion";

pub trait FactSource {
    fn fact(&self, table_key: &str) -> Option<&str>;
}

impl FactSource for BTreeMap<String, String> {
    fn fact(&self, table_key: &str) -> Option<&str> {
        self.get(table_key).map(String::as_str)
    }
}

pub trait EffectSink {
    fn apply_effect(&mut self, effect: &ActionPayload);
}

impl ComboRule {
    #[must_use]
    pub fn fires(&self, facts: &impl FactSource) -> bool {
        self.trigger_conditions()
            .iter()
            .all(|condition| condition.holds(facts))
    }

    #[must_use]
    pub fn evaluate(&self, facts: &impl FactSource) -> Option<&ActionPayload> {
        self.fires(facts).then_some(self.action())
    }
}

impl TriggerCondition {
    fn holds(&self, facts: &impl FactSource) -> bool {
        let Some(fact) = facts.fact(&self.table_key) else {
            return false;
        };

        match (self.operator, &self.value) {
            (Operator::Eq | Operator::NotEq, ConditionValue::Many(_)) => {
                warn!(
                    "condition on table {} uses operator {} with a list value, treating as not matching",
                    self.table_key,
                    self.operator.as_ref()
                );
                false
            }
            (Operator::Eq, ConditionValue::One(value)) => fact == value,
            (Operator::NotEq, ConditionValue::One(value)) => fact != value,
            (Operator::In, value) => value.contains(fact),
            (Operator::NotIn, value) => !value.contains(fact),
        }
    }
}

impl ConditionValue {
    fn contains(&self, fact: &str) -> bool {
        match self {
            ConditionValue::One(value) => fact == value,
            ConditionValue::Many(values) => values.iter().any(|value| value == fact),
        }
    }
}

/// Apply `rules` to `state` in the given order.
///
/// Each fired rule's effect is applied to the state before the next rule is
/// tested, so later rules see the outcome of earlier ones. The returned list
/// contains the effects that fired, in application order.
pub fn run_pipeline<'a, S>(rules: &'a [ComboRule], state: &mut S) -> Vec<&'a ActionPayload>
where
    S: FactSource + EffectSink,
{
    let mut applied = Vec::new();

    for rule in rules {
        if let Some(effect) = rule.evaluate(state) {
            state.apply_effect(effect);
            applied.push(effect);
        }
    }

    applied
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowRef {
    pub table_key: String,
    pub row_id: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MotionRecord {
    pub motion_id: MotionID,
    pub selections: BTreeMap<String, String>,
    pub rows: BTreeMap<RowRef, BTreeMap<String, f64>>,
    pub muscle_scores: BTreeMap<String, f64>,
}

impl FactSource for MotionRecord {
    fn fact(&self, table_key: &str) -> Option<&str> {
        if table_key == MOTION_TABLE_KEY {
            return Some(self.motion_id.as_str());
        }
        self.selections.fact(table_key)
    }
}

impl EffectSink for MotionRecord {
    fn apply_effect(&mut self, effect: &ActionPayload) {
        match effect {
            ActionPayload::SwitchMotion(payload) => {
                self.motion_id = payload.proxy_motion_id.clone();
            }
            ActionPayload::ReplaceDelta(payload) => {
                // Deltas accumulate on repeated application; fields missing
                // from the row start at 0.
                let row = self
                    .rows
                    .entry(RowRef {
                        table_key: payload.table_key.clone(),
                        row_id: payload.row_id.clone(),
                    })
                    .or_default();
                for (field, delta) in &payload.deltas {
                    *row.entry(field.clone()).or_insert(0.0) += delta;
                }
            }
            ActionPayload::ClampMuscle(payload) => {
                for (muscle, bound) in &payload.clamps {
                    if let Some(score) = self.muscle_scores.get_mut(muscle) {
                        *score = score.min(*bound);
                    }
                }
            }
        }
    }
}
