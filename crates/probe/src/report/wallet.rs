//! Token holdings of a party, restricted to one package.
use crate::summary::{self, render};
use ledger_api_types::reply::{AcsSnapshot, ActiveContract};
use std::collections::BTreeMap;
use std::fmt;

/// Fields shown for contracts without an `amount`.
const SERVICE_FIELDS: &[&str] = &["totalShares", "poolCap", "paused", "totalMusdStaked"];

pub struct WalletReport<'a> {
    snapshot: &'a AcsSnapshot,
    party: &'a str,
    by_type: BTreeMap<String, Vec<&'a ActiveContract>>,
}

impl<'a> WalletReport<'a> {
    /// Keeps the contracts of `package_id`, or all resolvable ones if `None`.
    pub fn new(snapshot: &'a AcsSnapshot, party: &'a str, package_id: Option<&str>) -> Self {
        let mut by_type: BTreeMap<String, Vec<&ActiveContract>> = BTreeMap::new();

        for contract in &snapshot.contracts {
            let Some(id) = contract.template_id.resolve() else {
                continue;
            };
            if package_id.is_some_and(|pkg| pkg != id.package_id) {
                continue;
            }
            by_type.entry(id.short_name()).or_default().push(contract);
        }

        Self {
            snapshot,
            party,
            by_type,
        }
    }

    pub fn total(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }
}

fn describe(contract: &ActiveContract) -> String {
    if let Some(amount) = contract.field("amount").filter(|v| !v.is_null()) {
        return format!("Amount: {}", render(Some(amount)));
    }

    let fields = SERVICE_FIELDS
        .iter()
        .filter_map(|&key| contract.field(key).map(|v| format!("{key}={}", render(Some(v)))))
        .collect::<Vec<_>>();

    if fields.is_empty() {
        "service".to_owned()
    } else {
        fields.join(", ")
    }
}

impl fmt::Display for WalletReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ledger offset: {}", self.snapshot.offset)?;
        writeln!(f, "Party: {}...\n", summary::prefix(self.party, 40))?;

        for (template, contracts) in &self.by_type {
            writeln!(f, "=== {template} ({} contracts) ===", contracts.len())?;
            for contract in contracts {
                writeln!(
                    f,
                    "  {}  (cid: {}...)",
                    describe(contract),
                    summary::prefix(&contract.contract_id, 20)
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Total: {} contracts in wallet", self.total())
    }
}
