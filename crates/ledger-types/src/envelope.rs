//! Locating the `createdEvent` inside an active contract entry.
//!
//! Different versions of the JSON Ledger API wrap the created event of an
//! entry's `contractEntry` differently:
//!
//! - `contractEntry.createdEvent`
//! - `contractEntry.JsActiveContract.createdEvent`
//! - `contractEntry.<any key>.createdEvent`, e.g. a per-party wrapper
//!
//! The wrapper is modeled as the closed set [EnvelopeShape]. Which shapes are
//! accepted is configuration ([EnvelopePolicy]) since the API version in use
//! determines it.
use serde_json::{Map, Value};

pub const CREATED_EVENT: &str = "createdEvent";
pub const JS_ACTIVE_CONTRACT: &str = "JsActiveContract";

/// Where the `createdEvent` was found.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeShape {
    /// `contractEntry.createdEvent`
    Flat,
    /// `contractEntry.JsActiveContract.createdEvent`
    JsActiveContract,
    /// `contractEntry.<key>.createdEvent`
    Keyed(String),
}

impl EnvelopeShape {
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            EnvelopeShape::Flat => EnvelopeKind::Flat,
            EnvelopeShape::JsActiveContract => EnvelopeKind::JsActiveContract,
            EnvelopeShape::Keyed(_) => EnvelopeKind::Keyed,
        }
    }
}

/// [EnvelopeShape] without the wrapper key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeKind {
    Flat,
    JsActiveContract,
    Keyed,
}

/// Which envelope shapes are accepted when reading an entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EnvelopePolicy {
    /// Any known shape.
    #[default]
    Auto,
    /// Exactly one shape; entries wrapped differently are unrecognized.
    Only(EnvelopeKind),
}

impl EnvelopePolicy {
    pub fn accepts(&self, shape: &EnvelopeShape) -> bool {
        match self {
            EnvelopePolicy::Auto => true,
            EnvelopePolicy::Only(kind) => shape.kind() == *kind,
        }
    }
}

/// Finds the `createdEvent` in the object under `contractEntry`.
///
/// The named wrapper and the flat shape are tried before arbitrary keys so
/// the outcome does not depend on key order.
pub fn locate<'a>(
    contract_entry: &'a Map<String, Value>,
    policy: EnvelopePolicy,
) -> Option<(EnvelopeShape, &'a Value)> {
    candidates(contract_entry).find(|(shape, _)| policy.accepts(shape))
}

fn candidates(
    contract_entry: &Map<String, Value>,
) -> impl Iterator<Item = (EnvelopeShape, &Value)> {
    let named = contract_entry
        .get(JS_ACTIVE_CONTRACT)
        .and_then(wrapped)
        .map(|event| (EnvelopeShape::JsActiveContract, event));

    let flat = contract_entry
        .get(CREATED_EVENT)
        .map(|event| (EnvelopeShape::Flat, event));

    let keyed = contract_entry
        .iter()
        .filter(|(key, _)| key.as_str() != JS_ACTIVE_CONTRACT && key.as_str() != CREATED_EVENT)
        .filter_map(|(key, value)| {
            wrapped(value).map(|event| (EnvelopeShape::Keyed(key.clone()), event))
        });

    named.into_iter().chain(flat).chain(keyed)
}

fn wrapped(value: &Value) -> Option<&Value> {
    value.as_object().and_then(|o| o.get(CREATED_EVENT))
}
