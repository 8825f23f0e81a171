use log::{debug, error};

use crate::{
    ComboRule, ComboRuleID, CreateError, DeleteError, RawComboRule, ReadError, StoredComboRule,
    UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait ComboRuleRepository {
    async fn read_rules(&self) -> Result<Vec<StoredComboRule>, ReadError>;
    async fn create_rule(&self, raw: RawComboRule) -> Result<StoredComboRule, CreateError>;
    async fn replace_rule(&self, rule: StoredComboRule) -> Result<StoredComboRule, UpdateError>;
    async fn delete_rule(&self, id: ComboRuleID) -> Result<ComboRuleID, DeleteError>;
}

pub struct RuleService<R> {
    repository: R,
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal) => {{
        let result = $func.await;
        if let Err(ref err) = result {
            match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} combo rule: {err}", $action);
                }
                _ => {
                    error!("failed to {} combo rule: {err}", $action);
                }
            }
        }
        result
    }};
}

impl<R: ComboRuleRepository> RuleService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn get_rules(&self) -> Result<Vec<(ComboRuleID, ComboRule)>, ReadError> {
        let stored = log_on_error!(self.repository.read_rules(), ReadError, "read")?;

        Ok(stored
            .into_iter()
            .filter_map(|rule| match ComboRule::parse(&rule.raw) {
                Ok(parsed) => Some((rule.id, parsed)),
                Err(err) => {
                    error!("skipping stored combo rule {}: {err}", *rule.id);
                    None
                }
            })
            .collect())
    }

    pub async fn create_rule(&self, raw: RawComboRule) -> Result<StoredComboRule, CreateError> {
        ComboRule::parse(&raw)?;
        log_on_error!(self.repository.create_rule(raw), CreateError, "create")
    }

    pub async fn replace_rule(
        &self,
        rule: StoredComboRule,
    ) -> Result<StoredComboRule, UpdateError> {
        ComboRule::parse(&rule.raw)?;
        log_on_error!(self.repository.replace_rule(rule), UpdateError, "replace")
    }

    pub async fn delete_rule(&self, id: ComboRuleID) -> Result<ComboRuleID, DeleteError> {
        log_on_error!(self.repository.delete_rule(id), DeleteError, "delete")
    }
}
