#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod evaluation;
mod muscle_targets;
mod rule;
mod service;
mod validation;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use evaluation::{
    EffectSink, FactSource, MOTION_TABLE_KEY, MotionRecord, RowRef, run_pipeline,
};
pub use muscle_targets::flatten_muscle_targets;
pub use rule::{
    ActionPayload, ActionType, ClampMusclePayload, ComboRule, ComboRuleID, ConditionValue,
    MotionID, Operator, RawComboRule, ReplaceDeltaPayload, RuleError, StoredComboRule,
    SwitchMotionPayload, TriggerCondition,
};
pub use service::{ComboRuleRepository, RuleService};
pub use validation::{RuleValidation, validate_combo_rule};
