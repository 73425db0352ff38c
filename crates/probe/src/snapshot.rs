//! Point-in-time queries of a party's active contract set.
use ledger_api_client::LedgerApi;
use ledger_api_types::envelope::EnvelopePolicy;
use ledger_api_types::error::LedgerError;
use ledger_api_types::reply::AcsSnapshot;
use ledger_api_types::request::active_contracts::{ActiveContractsRequest, IdentifierFilter};

/// Fetches the ledger end and then every contract visible to `party` as of
/// that offset.
pub async fn fetch(
    api: &impl LedgerApi,
    party: &str,
    filter: IdentifierFilter,
    policy: EnvelopePolicy,
) -> Result<AcsSnapshot, LedgerError> {
    let offset = api.ledger_end().await?.offset;
    tracing::debug!(%offset, %party, "Querying active contracts");

    let request = ActiveContractsRequest::for_party(party, filter, offset);
    let entries = api.active_contracts(&request).await?;
    let snapshot = AcsSnapshot::from_entries(offset, &entries, policy);

    if !snapshot.unrecognized.is_empty() {
        tracing::debug!(
            count = snapshot.unrecognized.len(),
            "Contract entries with an unknown envelope"
        );
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ledger_api_client::MockLedgerApi;
    use ledger_api_test_fixtures::acs;
    use ledger_api_types::identifier::Offset;
    use ledger_api_types::reply::{parse_acs_body, LedgerEnd};
    use mockall::predicate::function;
    use pretty_assertions_sorted::assert_eq;

    #[tokio::test]
    async fn queries_at_the_ledger_end() {
        let mut api = MockLedgerApi::new();
        api.expect_ledger_end()
            .times(1)
            .returning(|| Ok(LedgerEnd { offset: Offset(42) }));
        api.expect_active_contracts()
            .with(function(|r: &ActiveContractsRequest| {
                r.active_at_offset == Offset(42)
                    && r.filter.filters_by_party.contains_key("alice::1220")
            }))
            .times(1)
            .returning(|_| parse_acs_body(acs::MIXED_ENVELOPES));

        let snapshot = fetch(
            &api,
            "alice::1220",
            IdentifierFilter::WildcardFilter {},
            EnvelopePolicy::Auto,
        )
        .await
        .unwrap();

        assert_eq!(snapshot.offset, Offset(42));
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn stops_when_ledger_end_fails() {
        let mut api = MockLedgerApi::new();
        api.expect_ledger_end().returning(|| {
            Err(LedgerError::Status {
                status: 502,
                body: String::new(),
            })
        });
        api.expect_active_contracts().never();

        let error = fetch(
            &api,
            "alice::1220",
            IdentifierFilter::NoFilter {},
            EnvelopePolicy::Auto,
        )
        .await
        .unwrap_err();

        assert_matches!(error, LedgerError::Status { status: 502, .. });
    }
}
