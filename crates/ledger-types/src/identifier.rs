//! Identifiers the ledger hands out: offsets and template identifiers.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger offset, an opaque and monotonically increasing cursor.
///
/// Pins an active contract query to a point-in-time snapshot. Replies may
/// carry it as a number or as a zero-padded decimal string; requests always
/// send the number.
#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "WireOffset", into = "i64")]
pub struct Offset(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum WireOffset {
    Number(i64),
    Text(String),
}

impl TryFrom<WireOffset> for Offset {
    type Error = std::num::ParseIntError;

    fn try_from(value: WireOffset) -> Result<Self, Self::Error> {
        match value {
            WireOffset::Number(n) => Ok(Offset(n)),
            WireOffset::Text(text) => text.trim().parse().map(Offset),
        }
    }
}

impl From<Offset> for i64 {
    fn from(value: Offset) -> Self {
        value.0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully qualified template identifier.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TemplateId {
    pub package_id: String,
    pub module_name: String,
    pub entity_name: String,
}

impl TemplateId {
    pub fn new(
        package_id: impl Into<String>,
        module_name: impl Into<String>,
        entity_name: impl Into<String>,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            module_name: module_name.into(),
            entity_name: entity_name.into(),
        }
    }

    /// `Module:Entity`
    pub fn short_name(&self) -> String {
        format!("{}:{}", self.module_name, self.entity_name)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.package_id, self.module_name, self.entity_name
        )
    }
}

/// A template identifier as it appears in a reply.
///
/// Depending on the API version the ledger sends either the colon-joined
/// string `pkg:Module:Entity` or the structured object.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(untagged)]
pub enum TemplateRef {
    Text(String),
    Structured(TemplateId),
}

impl Default for TemplateRef {
    fn default() -> Self {
        Self::Text("unknown".to_owned())
    }
}

impl TemplateRef {
    /// Resolves the identifier into its parts.
    ///
    /// The package is the first segment, the module the second to last and
    /// the entity the last one. Strings with fewer than three segments do not
    /// resolve.
    pub fn resolve(&self) -> Option<TemplateId> {
        match self {
            TemplateRef::Structured(id) => Some(id.clone()),
            TemplateRef::Text(text) => {
                let parts = text.split(':').collect::<Vec<_>>();
                if parts.len() < 3 {
                    return None;
                }
                Some(TemplateId::new(
                    parts[0],
                    parts[parts.len() - 2],
                    parts[parts.len() - 1],
                ))
            }
        }
    }

    /// `Module:Entity`, or the identifier verbatim if it does not resolve.
    pub fn short_name(&self) -> String {
        match self.resolve() {
            Some(id) => id.short_name(),
            None => self.to_string(),
        }
    }

    pub fn package_id(&self) -> Option<String> {
        self.resolve().map(|id| id.package_id)
    }

    /// Substring match against the rendered identifier.
    pub fn contains(&self, pattern: &str) -> bool {
        self.to_string().contains(pattern)
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateRef::Text(text) => f.write_str(text),
            TemplateRef::Structured(id) => id.fmt(f),
        }
    }
}

impl From<TemplateId> for TemplateRef {
    fn from(id: TemplateId) -> Self {
        Self::Structured(id)
    }
}
