use std::collections::BTreeMap;

use serde_json::{Map, Value};

const SCORE_KEY: &str = "_score";

/// Flatten a possibly nested muscle-target tree into a flat score mapping.
///
/// Containers are traversed depth first, skipping the reserved `_score` key
/// at every level. A node counts as a leaf if it has a numeric `_score` and
/// no object children; only leaves and bare numeric values produce entries.
/// On key collisions the last value in traversal order wins; traversal
/// follows the key order of the underlying JSON map at each level.
///
/// Input that is already flat is returned unchanged, so the function can
/// safely be applied again to already migrated data.
#[must_use]
pub fn flatten_muscle_targets(targets: &Value) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();

    if let Value::Object(node) = targets {
        flatten_into(node, &mut scores);
    }

    scores
}

fn flatten_into(node: &Map<String, Value>, scores: &mut BTreeMap<String, f64>) {
    for (name, child) in node {
        if name == SCORE_KEY {
            continue;
        }
        match child {
            Value::Number(number) => {
                if let Some(score) = number.as_f64() {
                    scores.insert(name.clone(), score);
                }
            }
            Value::Object(child_node) => {
                if let Some(score) = leaf_score(child_node) {
                    scores.insert(name.clone(), score);
                } else {
                    flatten_into(child_node, scores);
                }
            }
            _ => {}
        }
    }
}

fn leaf_score(node: &Map<String, Value>) -> Option<f64> {
    let score = node.get(SCORE_KEY)?.as_f64()?;

    if node.values().any(Value::is_object) {
        return None;
    }

    Some(score)
}
