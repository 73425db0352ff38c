//! Contract creation through `submit-and-wait`.
use ledger_api_client::LedgerApi;
use ledger_api_types::error::LedgerError;
use ledger_api_types::identifier::TemplateId;
use ledger_api_types::request::submit::{Command, CommandId, SubmitAndWait};
use serde_json::Value;

pub const DEFAULT_COMMAND_PREFIX: &str = "init";

/// Who submits commands and on behalf of which parties.
#[derive(Clone, Debug)]
pub struct Submitter {
    pub user_id: String,
    pub act_as: Vec<String>,
    pub read_as: Vec<String>,
    pub command_prefix: String,
}

impl Submitter {
    pub fn new(user_id: impl Into<String>, act_as: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            act_as,
            read_as: Vec::new(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_owned(),
        }
    }

    /// Same submitter acting as `act_as` instead.
    pub fn acting_as(&self, act_as: Vec<String>) -> Self {
        Self {
            act_as,
            ..self.clone()
        }
    }

    fn request(&self, commands: Vec<Command>) -> SubmitAndWait {
        SubmitAndWait {
            user_id: self.user_id.clone(),
            act_as: self.act_as.clone(),
            read_as: self.read_as.clone(),
            command_id: CommandId::generate(&self.command_prefix),
            commands,
        }
    }

    /// Creates one contract of `template` and waits for the ledger's reply.
    ///
    /// The payload is passed through as is.
    pub async fn create(
        &self,
        api: &impl LedgerApi,
        template: TemplateId,
        payload: Value,
    ) -> Result<Value, LedgerError> {
        let request = self.request(vec![Command::create(template, payload)]);
        tracing::debug!(command_id=%request.command_id, "Submitting create command");
        api.submit_and_wait(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ledger_api_client::MockLedgerApi;
    use ledger_api_types::error::ApiError;
    use mockall::predicate::function;
    use pretty_assertions_sorted::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn create_wraps_one_command() {
        let mut api = MockLedgerApi::new();
        api.expect_submit_and_wait()
            .with(function(|r: &SubmitAndWait| {
                r.user_id == "administrator"
                    && r.act_as == ["op::1220"]
                    && r.read_as.is_empty()
                    && r.command_id.0.starts_with("init-")
                    && r.commands
                        == [Command::create(
                            TemplateId::new("pkg", "Mod", "Ent"),
                            json!({"a": 1}),
                        )]
            }))
            .times(1)
            .returning(|_| Ok(json!({"updateId": "u1"})));

        let submitter = Submitter::new("administrator", vec!["op::1220".to_owned()]);
        let reply = submitter
            .create(&api, TemplateId::new("pkg", "Mod", "Ent"), json!({"a": 1}))
            .await
            .unwrap();

        assert_eq!(reply, json!({"updateId": "u1"}));
    }

    #[tokio::test]
    async fn rejection_is_returned() {
        let mut api = MockLedgerApi::new();
        api.expect_submit_and_wait().returning(|_| {
            Err(ApiError {
                code: "INVALID_ARGUMENT".to_owned(),
                cause: "missing field".to_owned(),
            }
            .into())
        });

        let submitter = Submitter::new("administrator", vec![]);
        let error = submitter
            .create(&api, TemplateId::new("pkg", "Mod", "Ent"), json!({}))
            .await
            .unwrap_err();

        assert_matches!(error, LedgerError::ApiError(e) => assert_eq!(e.code, "INVALID_ARGUMENT"));
    }

    #[test]
    fn acting_as_keeps_the_rest() {
        let mut submitter = Submitter::new("administrator", vec!["a".to_owned()]);
        submitter.command_prefix = "bootstrap".to_owned();

        let other = submitter.acting_as(vec!["b".to_owned()]);
        assert_eq!(other.act_as, vec!["b".to_owned()]);
        assert_eq!(other.command_prefix, "bootstrap");
    }
}
