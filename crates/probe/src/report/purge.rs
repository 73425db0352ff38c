//! Lists contracts of several parties and collects the protocol's own
//! contract ids.
use crate::summary;
use ledger_api_types::identifier::TemplateRef;
use ledger_api_types::reply::{AcsSnapshot, ActiveContract};
use std::fmt;

/// Markers for protocol modules in structured template ids.
const PROTOCOL_MODULES: &[&str] = &["Minted", "Compliance", "CantonDirect", "CantonCoin"];

/// Whether the contract belongs to the protocol deployment.
///
/// Text template ids only count if they mention `Minted`; structured ids are
/// matched on the module name.
pub fn is_protocol_contract(contract: &ActiveContract) -> bool {
    match &contract.template_id {
        TemplateRef::Text(text) => text.contains("Minted"),
        TemplateRef::Structured(id) => PROTOCOL_MODULES
            .iter()
            .any(|marker| id.module_name.contains(marker)),
    }
}

/// The active contract set of one party.
pub struct PartyListing<'a> {
    pub party: &'a str,
    pub snapshot: AcsSnapshot,
}

impl fmt::Display for PartyListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== ACS for {}... ===", summary::prefix(self.party, 30))?;
        writeln!(f, "Ledger offset: {}", self.snapshot.offset)?;

        if self.snapshot.is_empty() {
            return writeln!(f, "  (no contracts found)");
        }
        for contract in &self.snapshot.contracts {
            writeln!(
                f,
                "  {}  pkg={}  CID={}...",
                contract.template_id,
                contract.package_name.as_deref().unwrap_or("?"),
                summary::prefix(&contract.contract_id, 50)
            )?;
        }
        Ok(())
    }
}

/// Protocol contract ids across all listed parties, in listing order.
pub struct PurgeList(pub Vec<String>);

impl PurgeList {
    pub fn collect<'a>(listings: impl IntoIterator<Item = &'a PartyListing<'a>>) -> Self {
        let ids = listings
            .into_iter()
            .flat_map(|listing| &listing.snapshot.contracts)
            .filter(|contract| is_protocol_contract(contract))
            .map(|contract| contract.contract_id.clone())
            .collect();
        Self(ids)
    }
}

impl fmt::Display for PurgeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "\nNo protocol contracts found.");
        }
        writeln!(f, "\n=== Protocol Contracts to Purge: {} ===", self.0.len())?;
        for id in &self.0 {
            writeln!(f, "  {id}")?;
        }
        Ok(())
    }
}
