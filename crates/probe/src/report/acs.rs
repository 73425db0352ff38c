//! Active contract counts, optionally with a per-template listing.
use super::LISTING_LIMIT;
use crate::summary::{self, TemplateCounts};
use ledger_api_types::reply::AcsSnapshot;
use std::fmt;

pub struct AcsReport<'a> {
    snapshot: &'a AcsSnapshot,
    detail: bool,
}

impl<'a> AcsReport<'a> {
    pub fn new(snapshot: &'a AcsSnapshot, detail: bool) -> Self {
        Self { snapshot, detail }
    }

    /// Counts keyed by full template id, or by `Module:Entity` in detail mode.
    pub fn counts(&self) -> TemplateCounts {
        if self.detail {
            TemplateCounts::by_short_name(&self.snapshot.contracts)
        } else {
            TemplateCounts::by_template(&self.snapshot.contracts)
        }
    }

    fn fmt_counts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (template, count) in self.counts().iter() {
            writeln!(f, "  [{count}x] {template}")?;
        }
        Ok(())
    }

    fn fmt_detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = summary::group_by_short_name(&self.snapshot.contracts);
        writeln!(f, "\nTemplates found: {}", groups.len())?;

        for (template, contracts) in &groups {
            writeln!(f, "\n  [{template}] - {} contract(s)", contracts.len())?;
            for contract in contracts.iter().take(LISTING_LIMIT) {
                let cid = summary::prefix(&contract.contract_id, 20);
                match summary::summary_fields(contract) {
                    Some(fields) => writeln!(f, "    {cid}...  {fields}")?,
                    None => {
                        let keys = contract.payload_keys();
                        let keys = &keys[..keys.len().min(8)];
                        writeln!(f, "    {cid}...  keys={keys:?}")?;
                    }
                }
            }
            if contracts.len() > LISTING_LIMIT {
                writeln!(f, "    ... and {} more", contracts.len() - LISTING_LIMIT)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for AcsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ledger offset: {}", self.snapshot.offset)?;
        writeln!(f, "Total active contracts: {}", self.snapshot.len())?;

        if self.detail {
            self.fmt_detail(f)?;
        } else {
            self.fmt_counts(f)?;
        }

        if !self.snapshot.unrecognized.is_empty() {
            writeln!(f, "\nUnrecognized contract entries:")?;
            let keys = TemplateCounts::tally(
                self.snapshot
                    .unrecognized
                    .iter()
                    .map(|keys| format!("{keys:?}")),
            );
            for (keys, count) in keys.iter() {
                writeln!(f, "  [{count}x] {keys}")?;
            }
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

    fn snapshot(body: &str) -> AcsSnapshot {
        let entries = parse_acs_body(body).unwrap();
        AcsSnapshot::from_entries(Offset(42), &entries, EnvelopePolicy::Auto)
    }

    #[test]
    fn counts_by_full_template() {
        let snapshot = snapshot(acs::MIXED_ENVELOPES);
        let report = AcsReport::new(&snapshot, false).to_string();

        assert_eq!(
            report,
            "Ledger offset: 42\n\
             Total active contracts: 2\n  \
             [1x] pkg:Mod:BridgeService\n  \
             [1x] pkg:Mod:Token\n"
        );
    }

    #[test]
    fn detail_lists_contracts_per_template() {
        let snapshot = snapshot(acs::PROTOCOL);
        let report = AcsReport::new(&snapshot, true);

        let counts = report.counts();
        assert_eq!(counts.get("Minted.Protocol.V3:BridgeInRequest"), 2);
        assert_eq!(counts.get("CantonDirectMint:CantonMUSD"), 2);
        assert_eq!(counts.total(), 11);

        let text = report.to_string();
        assert!(text.contains("Templates found: 9"));
        assert!(text.contains("  [Minted.Protocol.V3:BridgeInRequest] - 2 contract(s)"));
        assert!(text.contains("    00c11111111111111111...  nonce=1, amount=100.0, operator=minted-operator::122...272ab2a0e4, status=Pending"));
        assert!(text.contains("    00e48888888888888888...  operator="));
        assert!(text.contains("Unrecognized contract entries:\n  [1x] [\"JsIncompleteUnassigned\"]"));
    }

    #[test]
    fn payload_without_summary_fields_shows_keys() {
        let snapshot = snapshot(
            r#"[{"contractEntry": {"createdEvent": {"templateId": "p:M:E", "contractId": "abc", "createArgument": {"b": 1, "a": 2}}}}]"#,
        );
        let text = AcsReport::new(&snapshot, true).to_string();
        assert!(text.contains("    abc...  keys=[\"b\", \"a\"]"));
    }
}
