//! Structures used for deserializing replies from the JSON Ledger API.
use crate::envelope::{self, EnvelopePolicy, EnvelopeShape};
use crate::error::{ApiError, LedgerError};
use crate::identifier::{Offset, TemplateRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reply of `GET /v2/state/ledger-end`.
#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LedgerEnd {
    #[serde(default)]
    pub offset: Offset,
}

/// The `createdEvent` of an active contract entry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    #[serde(default)]
    pub template_id: TemplateRef,
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub create_argument: Option<Value>,
    /// Spelling used by some API versions.
    #[serde(default)]
    pub create_arguments: Option<Value>,
}

impl CreatedEvent {
    /// The contract payload, preferring `createArgument` when it is non-empty.
    pub fn payload(&self) -> Value {
        [&self.create_argument, &self.create_arguments]
            .into_iter()
            .flatten()
            .find(|v| !is_empty(v))
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// One live contract extracted from an ACS reply.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveContract {
    pub envelope: EnvelopeShape,
    pub template_id: TemplateRef,
    pub contract_id: String,
    pub package_name: Option<String>,
    pub payload: Value,
}

impl ActiveContract {
    /// Payload field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    pub fn payload_keys(&self) -> Vec<&str> {
        match &self.payload {
            Value::Object(o) => o.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// What a single ACS reply entry turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum AcsEntry {
    Contract(ActiveContract),
    /// Has a `contractEntry` whose envelope we do not know; carries its keys.
    Unrecognized(Vec<String>),
    /// Not a contract entry at all, e.g. an offset checkpoint.
    Other,
}

impl AcsEntry {
    pub fn from_json(entry: &Value, policy: EnvelopePolicy) -> Self {
        let Some(contract_entry) = entry.get("contractEntry") else {
            return AcsEntry::Other;
        };
        let Some(contract_entry) = contract_entry.as_object() else {
            tracing::debug!(?contract_entry, "contractEntry is not an object");
            return AcsEntry::Unrecognized(Vec::new());
        };
        let unrecognized = || AcsEntry::Unrecognized(contract_entry.keys().cloned().collect());

        let Some((shape, event)) = envelope::locate(contract_entry, policy) else {
            return unrecognized();
        };

        match CreatedEvent::deserialize(event) {
            Ok(event) => AcsEntry::Contract(ActiveContract {
                envelope: shape,
                payload: event.payload(),
                template_id: event.template_id,
                contract_id: event.contract_id,
                package_name: event.package_name,
            }),
            Err(e) => {
                tracing::debug!(reason=%e, ?shape, "Failed to decode createdEvent");
                unrecognized()
            }
        }
    }
}

/// The active contract set of one party at one offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AcsSnapshot {
    pub offset: Offset,
    pub contracts: Vec<ActiveContract>,
    /// Key lists of contract entries with an unknown envelope.
    pub unrecognized: Vec<Vec<String>>,
}

impl AcsSnapshot {
    pub fn from_entries(offset: Offset, entries: &[Value], policy: EnvelopePolicy) -> Self {
        let mut snapshot = AcsSnapshot {
            offset,
            ..Default::default()
        };

        for entry in entries {
            match AcsEntry::from_json(entry, policy) {
                AcsEntry::Contract(contract) => snapshot.contracts.push(contract),
                AcsEntry::Unrecognized(keys) => snapshot.unrecognized.push(keys),
                AcsEntry::Other => {}
            }
        }

        snapshot
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// Splits the body of an active contracts reply into its entries.
///
/// The ledger has been observed to answer with
///
/// - a JSON array of entries,
/// - newline delimited JSON,
/// - an object with a `result` array,
/// - a single entry object,
/// - an error object with a `code`.
///
/// Undecodable lines of newline delimited JSON are skipped.
pub fn parse_acs_body(body: &str) -> Result<Vec<Value>, LedgerError> {
    let error = match serde_json::from_str::<Value>(body) {
        Ok(document) => return entries_of(document),
        Err(e) => e,
    };

    let mut entries = Vec::new();
    let mut decoded_any = false;
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Array(items)) => {
                decoded_any = true;
                entries.extend(items);
            }
            Ok(item) => {
                decoded_any = true;
                entries.push(item);
            }
            Err(e) => tracing::debug!(reason=%e, "Skipping undecodable line"),
        }
    }

    if !decoded_any && !body.trim().is_empty() {
        return Err(LedgerError::Decode(error));
    }

    Ok(entries)
}

fn entries_of(document: Value) -> Result<Vec<Value>, LedgerError> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => {
            if object.contains_key("code") {
                let error = ApiError::deserialize(Value::Object(object))?;
                return Err(error.into());
            }
            if matches!(object.get("result"), Some(Value::Array(_))) {
                if let Some(Value::Array(entries)) = object.remove("result") {
                    return Ok(entries);
                }
            }
            if object.contains_key("contractEntry") {
                return Ok(vec![Value::Object(object)]);
            }
            let keys = object.keys().cloned().collect::<Vec<_>>();
            Err(LedgerError::UnexpectedShape(format!(
                "object with keys {keys:?}"
            )))
        }
        other => Err(LedgerError::UnexpectedShape(format!(
            "top-level {}",
            json_type(&other)
        ))),
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

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ledger_api_test_fixtures::acs;
    use pretty_assertions_sorted::assert_eq;
    use serde_json::json;

    mod body {
        use super::*;
        use pretty_assertions_sorted::assert_eq;

        #[test]
        fn array() {
            let entries = parse_acs_body(acs::MIXED_ENVELOPES).unwrap();
            assert_eq!(entries.len(), 2);
        }

        #[test]
        fn newline_delimited() {
            let entries = parse_acs_body(acs::NEWLINE_DELIMITED).unwrap();
            assert_eq!(entries.len(), 3);
        }

        #[test]
        fn newline_delimited_skips_garbage_lines() {
            let body = "{\"contractEntry\":{}}\nnot json\n\n{\"offsetCheckpoint\":{}}\n";
            let entries = parse_acs_body(body).unwrap();
            assert_eq!(entries.len(), 2);
        }

        #[test]
        fn result_envelope() {
            let body = json!({"result": [{"contractEntry": {}}]}).to_string();
            let entries = parse_acs_body(&body).unwrap();
            assert_eq!(entries, vec![json!({"contractEntry": {}})]);
        }

        #[test]
        fn error_object() {
            let error = parse_acs_body(acs::ERROR).unwrap_err();
            assert_matches!(error, LedgerError::ApiError(e) => {
                assert_eq!(e.code, "PERMISSION_DENIED");
            });
        }

        #[test]
        fn single_entry() {
            let entries = parse_acs_body(r#"{"contractEntry":{"createdEvent":{}}}"#).unwrap();
            assert_eq!(entries, vec![json!({"contractEntry": {"createdEvent": {}}})]);
        }

        #[test]
        fn unknown_object() {
            let error = parse_acs_body(r#"{"foo": 1}"#).unwrap_err();
            assert_matches!(error, LedgerError::UnexpectedShape(_));
        }

        #[test]
        fn scalar() {
            let error = parse_acs_body("42").unwrap_err();
            assert_matches!(error, LedgerError::UnexpectedShape(s) => assert_eq!(s, "top-level number"));
        }

        #[test]
        fn garbage() {
            let error = parse_acs_body("<html>").unwrap_err();
            assert_matches!(error, LedgerError::Decode(_));
        }

        #[test]
        fn empty() {
            assert_eq!(parse_acs_body("  \n").unwrap(), Vec::<Value>::new());
        }
    }

    mod snapshot {
        use super::*;
        use pretty_assertions_sorted::assert_eq;

        #[test]
        fn mixed_envelopes() {
            let entries = parse_acs_body(acs::MIXED_ENVELOPES).unwrap();
            let snapshot = AcsSnapshot::from_entries(Offset(42), &entries, EnvelopePolicy::Auto);

            assert_eq!(snapshot.len(), 2);
            assert!(snapshot.unrecognized.is_empty());

            let bridge = &snapshot.contracts[0];
            assert_eq!(bridge.envelope, EnvelopeShape::JsActiveContract);
            assert_eq!(bridge.template_id.short_name(), "Mod:BridgeService");
            assert_eq!(bridge.contract_id, "c1");
            assert_eq!(bridge.field("paused"), Some(&json!(false)));

            let token = &snapshot.contracts[1];
            assert_eq!(token.envelope, EnvelopeShape::Flat);
            assert_eq!(token.template_id.short_name(), "Mod:Token");
            assert_eq!(token.field("amount"), Some(&json!("5.0")));
        }

        #[test]
        fn unknown_envelope_keeps_its_keys() {
            let entries = vec![
                json!({"contractEntry": {"JsIncompleteAssigned": {"assignedEvent": {}}}}),
                json!({"offsetCheckpoint": {"offset": 3}}),
            ];
            let snapshot = AcsSnapshot::from_entries(Offset(3), &entries, EnvelopePolicy::Auto);

            assert!(snapshot.is_empty());
            assert_eq!(
                snapshot.unrecognized,
                vec![vec!["JsIncompleteAssigned".to_owned()]]
            );
        }

        #[test]
        fn created_arguments_fallback() {
            let entry = json!({"contractEntry": {"createdEvent": {
                "templateId": "pkg:Mod:Token",
                "contractId": "c9",
                "createArgument": {},
                "createArguments": {"amount": "1.0"},
            }}});
            let contract = assert_matches!(
                AcsEntry::from_json(&entry, EnvelopePolicy::Auto),
                AcsEntry::Contract(c) => c
            );
            assert_eq!(contract.payload, json!({"amount": "1.0"}));
        }

        #[test]
        fn payload_keys_keep_reply_order() {
            let entry: Value = serde_json::from_str(
                r#"{"contractEntry": {"createdEvent": {"createArgument": {"zeta": 1, "alpha": 2, "mid": 3}}}}"#,
            )
            .unwrap();
            let contract = assert_matches!(
                AcsEntry::from_json(&entry, EnvelopePolicy::Auto),
                AcsEntry::Contract(c) => c
            );
            assert_eq!(contract.payload_keys(), vec!["zeta", "alpha", "mid"]);
        }

        #[test]
        fn missing_fields_use_defaults() {
            let entry = json!({"contractEntry": {"createdEvent": {}}});
            let contract = assert_matches!(
                AcsEntry::from_json(&entry, EnvelopePolicy::Auto),
                AcsEntry::Contract(c) => c
            );
            assert_eq!(contract.template_id.to_string(), "unknown");
            assert_eq!(contract.contract_id, "");
            assert_eq!(contract.payload, json!({}));
        }
    }

    #[test]
    fn ledger_end_without_offset() {
        let end: LedgerEnd = serde_json::from_str("{}").unwrap();
        assert_eq!(end.offset, Offset(0));
    }

    #[test]
    fn ledger_end_with_string_offset() {
        let end: LedgerEnd = serde_json::from_str(r#"{"offset":"000000000000000042"}"#).unwrap();
        assert_eq!(end.offset, Offset(42));
    }
}
