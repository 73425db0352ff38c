//! Aggregation and formatting helpers shared by the reports.
use ledger_api_types::reply::ActiveContract;
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of contracts per template, ordered by template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateCounts(BTreeMap<String, usize>);

impl TemplateCounts {
    pub fn tally<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = BTreeMap::new();
        for key in keys {
            *counts.entry(key.into()).or_default() += 1;
        }
        Self(counts)
    }

    /// Keyed by the full template identifier.
    pub fn by_template(contracts: &[ActiveContract]) -> Self {
        Self::tally(contracts.iter().map(|c| c.template_id.to_string()))
    }

    /// Keyed by `Module:Entity`.
    pub fn by_short_name(contracts: &[ActiveContract]) -> Self {
        Self::tally(contracts.iter().map(|c| c.template_id.short_name()))
    }

    pub fn get(&self, template: &str) -> usize {
        self.0.get(template).copied().unwrap_or_default()
    }

    /// Sum over all templates.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of distinct templates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Contracts grouped by `Module:Entity`, in input order within a group.
pub fn group_by_short_name(contracts: &[ActiveContract]) -> BTreeMap<String, Vec<&ActiveContract>> {
    let mut groups: BTreeMap<String, Vec<&ActiveContract>> = BTreeMap::new();
    for contract in contracts {
        groups
            .entry(contract.template_id.short_name())
            .or_default()
            .push(contract);
    }
    groups
}

/// The first `n` characters of `s`.
pub fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Shortens strings longer than 40 characters to `first 20...last 10`.
pub fn abbreviate(s: &str) -> String {
    let len = s.chars().count();
    if len <= 40 {
        return s.to_owned();
    }
    let tail = s.chars().skip(len - 10).collect::<String>();
    format!("{}...{tail}", prefix(s, 20))
}

/// Strings without quotes, everything else as compact JSON, `-` if missing.
pub fn render(value: Option<&Value>) -> String {
    match value {
        None => "-".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Payload fields worth showing for a contract in listings.
pub const SUMMARY_FIELDS: &[&str] = &[
    "nonce",
    "amount",
    "user",
    "operator",
    "owner",
    "status",
    "ethAddress",
    "cantonRecipient",
    "ethTxHash",
];

/// `key=value` pairs of the [SUMMARY_FIELDS] present in the payload, or
/// `None` if there are none.
pub fn summary_fields(contract: &ActiveContract) -> Option<String> {
    let fields = SUMMARY_FIELDS
        .iter()
        .filter_map(|&key| {
            contract.field(key).map(|value| {
                let value = match value {
                    Value::String(s) => abbreviate(s),
                    other => other.to_string(),
                };
                format!("{key}={value}")
            })
        })
        .collect::<Vec<_>>();

    (!fields.is_empty()).then(|| fields.join(", "))
}
