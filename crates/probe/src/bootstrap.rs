//! Creates the protocol's bridge and liquidity pool contracts.
use crate::submit::Submitter;
use ledger_api_client::LedgerApi;
use ledger_api_types::error::LedgerError;
use ledger_api_types::identifier::TemplateId;
use serde_json::{json, Value};
use std::fmt;

pub const PROTOCOL_MODULE: &str = "Minted.Protocol.V3";

/// Errors are cut to this many characters when reported.
const ERROR_EXCERPT: usize = 200;

/// Parties and package of the deployment to bootstrap.
#[derive(Clone, Debug)]
pub struct Deployment {
    pub package_id: String,
    pub operator: String,
    pub governance: String,
    pub validator: String,
}

/// A contract to create.
pub struct Step {
    pub entity: &'static str,
    pub act_as: Vec<String>,
    pub payload: Value,
}

impl Deployment {
    pub fn steps(&self) -> Vec<Step> {
        vec![
            Step {
                entity: "BridgeService",
                act_as: vec![self.operator.clone(), self.governance.clone()],
                payload: json!({
                    "operator": self.operator,
                    "governance": self.governance,
                    "validators": [self.validator],
                    "requiredSignatures": 1,
                    "totalBridgedIn": "0.0",
                    "totalBridgedOut": "0.0",
                    "lastBridgeOutNonce": 0,
                    "lastBridgeInNonce": 0,
                    "paused": false,
                    "observers": [self.validator],
                    "minValidators": {"Some": 1},
                }),
            },
            Step {
                entity: "LiquidityPool",
                act_as: vec![self.operator.clone()],
                payload: json!({
                    "operator": self.operator,
                    "baseSymbol": "mUSD",
                    "quoteSymbol": "ETH",
                    "baseReserve": "1000000.0",
                    "quoteReserve": "333.33",
                    "exchangeRate": "3000.0",
                    "oracleCid": null,
                    "spreadBps": {"Some": 30},
                }),
            },
        ]
    }

    fn template(&self, entity: &str) -> TemplateId {
        TemplateId::new(&self.package_id, PROTOCOL_MODULE, entity)
    }
}

/// Result of one bootstrap step.
pub struct Outcome {
    pub entity: &'static str,
    pub result: Result<Value, LedgerError>,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(_) => write!(f, "  ✓ {} created", self.entity),
            Err(e) => write!(
                f,
                "  ✗ {} failed: {}",
                self.entity,
                e.truncated(ERROR_EXCERPT)
            ),
        }
    }
}

/// Runs every step in order. A failed step is logged and does not stop the
/// following ones.
pub async fn run(
    api: &impl LedgerApi,
    submitter: &Submitter,
    deployment: &Deployment,
) -> Vec<Outcome> {
    let mut outcomes = Vec::new();

    for step in deployment.steps() {
        tracing::info!(entity = step.entity, "Creating contract");
        let result = submitter
            .acting_as(step.act_as)
            .create(api, deployment.template(step.entity), step.payload)
            .await;

        if let Err(e) = &result {
            tracing::warn!(entity = step.entity, error = %e, "Contract creation failed");
        }

        outcomes.push(Outcome {
            entity: step.entity,
            result,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_api_client::MockLedgerApi;
    use ledger_api_types::request::submit::{Command, SubmitAndWait};
    use pretty_assertions_sorted::assert_eq;

    fn deployment() -> Deployment {
        Deployment {
            package_id: "eff3bf30".to_owned(),
            operator: "minted-operator::1220".to_owned(),
            governance: "minted-governance::1220".to_owned(),
            validator: "validator-1::1220".to_owned(),
        }
    }

    fn entity(request: &SubmitAndWait) -> String {
        match &request.commands[..] {
            [Command::CreateCommand(c)] => c.template_id.entity_name.clone(),
            _ => String::new(),
        }
    }

    #[test]
    fn payload_optionals() {
        let steps = deployment().steps();

        assert_eq!(steps[0].payload["minValidators"], json!({"Some": 1}));
        assert_eq!(steps[0].act_as.len(), 2);
        assert_eq!(steps[1].payload["spreadBps"], json!({"Some": 30}));
        assert_eq!(steps[1].payload["oracleCid"], Value::Null);
    }

    #[test_log::test(tokio::test)]
    async fn failure_does_not_stop_the_run() {
        let mut api = MockLedgerApi::new();
        api.expect_submit_and_wait().times(2).returning(|request| {
            if entity(request) == "BridgeService" {
                Err(LedgerError::Status {
                    status: 400,
                    body: "x".repeat(500),
                })
            } else {
                Ok(json!({"updateId": "u2"}))
            }
        });

        let submitter = Submitter::new("administrator", vec![]);
        let outcomes = run(&api, &submitter, &deployment()).await;

        let lines = outcomes.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  ✗ BridgeService failed: HTTP 400: xxx"));
        assert_eq!(lines[0].chars().count(), "  ✗ BridgeService failed: ".chars().count() + 200);
        assert_eq!(lines[1], "  ✓ LiquidityPool created");
    }

    #[tokio::test]
    async fn templates_live_in_the_protocol_module() {
        let mut api = MockLedgerApi::new();
        api.expect_submit_and_wait()
            .withf(|r: &SubmitAndWait| match &r.commands[..] {
                [Command::CreateCommand(c)] => {
                    c.template_id.package_id == "eff3bf30"
                        && c.template_id.module_name == PROTOCOL_MODULE
                }
                _ => false,
            })
            .times(2)
            .returning(|_| Ok(json!({})));

        let submitter = Submitter::new("administrator", vec![]);
        let outcomes = run(&api, &submitter, &deployment()).await;
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }
}
