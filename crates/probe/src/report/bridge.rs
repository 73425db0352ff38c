//! Bridge-in requests and mUSD tokens held by a party.
use super::LISTING_LIMIT;
use crate::summary::{self, render, TemplateCounts};
use ledger_api_types::reply::{AcsSnapshot, ActiveContract};
use std::fmt;

const BRIDGE_IN_REQUEST: &str = "BridgeInRequest";
const MUSD: &str = "MUSD";

pub struct BridgeReport<'a> {
    snapshot: &'a AcsSnapshot,
    bridge_ins: Vec<&'a ActiveContract>,
    tokens: Vec<&'a ActiveContract>,
}

impl<'a> BridgeReport<'a> {
    pub fn new(snapshot: &'a AcsSnapshot) -> Self {
        let mut bridge_ins = Vec::new();
        let mut tokens = Vec::new();

        for contract in &snapshot.contracts {
            if contract.template_id.contains(BRIDGE_IN_REQUEST) {
                bridge_ins.push(contract);
            } else if contract.template_id.contains(MUSD) {
                tokens.push(contract);
            }
        }

        Self {
            snapshot,
            bridge_ins,
            tokens,
        }
    }

    pub fn bridge_ins(&self) -> &[&'a ActiveContract] {
        &self.bridge_ins
    }

    pub fn tokens(&self) -> &[&'a ActiveContract] {
        &self.tokens
    }
}

impl fmt::Display for BridgeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ledger end offset: {}", self.snapshot.offset)?;
        writeln!(f, "Total contracts: {}", self.snapshot.len())?;

        writeln!(f, "\n=== All Template Types ===")?;
        for (template, count) in TemplateCounts::by_short_name(&self.snapshot.contracts).iter() {
            writeln!(f, "  {template}: {count}")?;
        }

        writeln!(f, "\n=== BridgeInRequests: {} ===", self.bridge_ins.len())?;
        for request in self.bridge_ins.iter().take(LISTING_LIMIT) {
            writeln!(f, "  template: {}", request.template_id.short_name())?;
            writeln!(f, "  contractId: {}...", summary::prefix(&request.contract_id, 50))?;
            writeln!(
                f,
                "  nonce: {}, status: {}",
                render(request.field("nonce")),
                render(request.field("status"))
            )?;
            writeln!(
                f,
                "  validators: {}, reqSigs: {}",
                render(request.field("validators")),
                render(request.field("requiredSignatures"))
            )?;
            writeln!(f, "  amount: {}\n", render(request.field("amount")))?;
        }
        if self.bridge_ins.len() > LISTING_LIMIT {
            writeln!(f, "  ... and {} more", self.bridge_ins.len() - LISTING_LIMIT)?;
        }

        writeln!(f, "\n=== mUSD Tokens: {} ===", self.tokens.len())?;
        for token in &self.tokens {
            let owner = render(token.field("owner"));
            writeln!(f, "  template: {}", token.template_id.short_name())?;
            writeln!(f, "  contractId: {}...", summary::prefix(&token.contract_id, 50))?;
            writeln!(
                f,
                "  amount: {}, owner: {}...\n",
                render(token.field("amount")),
                summary::prefix(&owner, 50)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_api_test_fixtures::acs;
    use ledger_api_types::envelope::EnvelopePolicy;
    use ledger_api_types::identifier::Offset;
    use ledger_api_types::reply::parse_acs_body;
    use pretty_assertions_sorted::assert_eq;
    use serde_json::json;

    fn protocol() -> AcsSnapshot {
        let entries = parse_acs_body(acs::PROTOCOL).unwrap();
        AcsSnapshot::from_entries(Offset(42), &entries, EnvelopePolicy::Auto)
    }

    #[test]
    fn tokens_match_anywhere_in_the_template_id() {
        let snapshot = protocol();
        let report = BridgeReport::new(&snapshot);

        assert_eq!(report.bridge_ins().len(), 2);
        let tokens = report
            .tokens()
            .iter()
            .map(|t| (t.template_id.short_name(), t.field("amount").cloned()))
            .collect::<Vec<_>>();
        assert_eq!(
            tokens,
            vec![
                ("CantonDirectMint:CantonMUSD".to_owned(), Some(json!("1000.0"))),
                ("CantonDirectMint:CantonMUSD".to_owned(), Some(json!("42.0"))),
                ("CantonSMUSD:CantonStakingService".to_owned(), None),
            ]
        );
    }

    #[test]
    fn staking_module_templates_are_tokens() {
        let entries = ["CantonSMUSDShare", "CantonStakingService"]
            .map(|entity| {
                json!({"contractEntry": {"createdEvent": {
                    "templateId": format!("pkg:CantonSMUSD:{entity}"),
                }}})
            });
        let snapshot = AcsSnapshot::from_entries(Offset(1), &entries, EnvelopePolicy::Auto);
        assert_eq!(BridgeReport::new(&snapshot).tokens().len(), 2);
    }

    #[test]
    fn listing() {
        let snapshot = protocol();
        let text = BridgeReport::new(&snapshot).to_string();

        assert!(text.starts_with("Ledger end offset: 42\nTotal contracts: 11\n"));
        assert!(text.contains("  Minted.Protocol.V3:BridgeInRequest: 2\n"));
        assert!(text.contains("=== BridgeInRequests: 2 ==="));
        assert!(text.contains("  nonce: 2, status: Completed\n"));
        assert!(text.contains("  validators: [\"minted-validator-1::12203f16a8f4b26778d5c8c6847dc055acf5db91e0c5b0846de29ba5ea272ab2a0e4\"], reqSigs: 1\n"));
        assert!(text.contains("  amount: 250.5\n"));
        assert!(text.contains("=== mUSD Tokens: 3 ==="));
        assert!(text.contains(
            "  amount: 42.0, owner: minted-validator-1::12203f16a8f4b26778d5c8c6847dc0...\n"
        ));
        assert!(!text.contains("... and"));
    }

    #[test]
    fn long_listings_are_cut() {
        let entries = (0..7)
            .map(|nonce| {
                json!({"contractEntry": {"createdEvent": {
                    "templateId": "p:Minted.Protocol.V3:BridgeInRequest",
                    "contractId": format!("c{nonce}"),
                    "createArgument": {"nonce": nonce},
                }}})
            })
            .collect::<Vec<_>>();
        let snapshot = AcsSnapshot::from_entries(Offset(1), &entries, EnvelopePolicy::Auto);
        let text = BridgeReport::new(&snapshot).to_string();

        assert!(text.contains("  nonce: 4, status: -\n"));
        assert!(!text.contains("  nonce: 5,"));
        assert!(text.contains("  ... and 2 more\n"));
    }
}
