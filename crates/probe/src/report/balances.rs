//! Summary of the frontend's derived balances API.
use anyhow::Context;
use reqwest::Url;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// `<frontend>/api/canton-balances`, with or without a trailing slash on the
/// frontend's path.
fn balances_url(frontend: &Url) -> anyhow::Result<Url> {
    let mut url = frontend.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Frontend URL {frontend} cannot have a path"))?
        .pop_if_empty()
        .extend(["api", "canton-balances"]);
    Ok(url)
}

/// Fetches `GET <frontend>/api/canton-balances`.
pub async fn fetch(frontend: &Url, timeout: Duration) -> anyhow::Result<Value> {
    let url = balances_url(frontend)?;
    tracing::debug!(%url, "Fetching balances");

    let json: Value = reqwest::ClientBuilder::new()
        .timeout(timeout)
        .build()?
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("Decoding balances reply")?;

    Ok(json)
}

pub struct BalancesReport<'a>(pub &'a Value);

/// Absent, `null`, `false`, zero and empty values count as not present.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

fn field(service: &Value, key: &str) -> String {
    crate::summary::render(service.get(key))
}

impl fmt::Display for BalancesReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        writeln!(f, "=== Balances API Response ===")?;
        let tokens = d.get("tokens").and_then(Value::as_array).map_or(0, Vec::len);
        writeln!(f, "Tokens: {tokens}")?;

        if let Some(s) = present(d.get("bridgeService")) {
            writeln!(f, "BridgeService: paused={}", field(s, "paused"))?;
        }
        if let Some(s) = present(d.get("stakingService")) {
            writeln!(
                f,
                "StakingService: totalShares={}, pooledMusd={}",
                field(s, "totalShares"),
                field(s, "pooledMusd")
            )?;
        }
        if let Some(s) = present(d.get("ethPoolService")) {
            writeln!(
                f,
                "ETHPoolService: poolCap={}, paused={}",
                field(s, "poolCap"),
                field(s, "paused")
            )?;
        }
        if let Some(s) = present(d.get("boostPoolService")) {
            writeln!(f, "BoostPoolService: totalLP={}", field(s, "totalLPShares"))?;
        }
        for (key, name) in [
            ("lendingService", "LendingService"),
            ("directMintService", "DirectMintService"),
            ("complianceRegistry", "ComplianceRegistry"),
        ] {
            if present(d.get(key)).is_some() {
                writeln!(f, "{name}: present")?;
            }
        }
        if let Some(s) = present(d.get("supplyService")) {
            writeln!(
                f,
                "SupplyService: currentSupply={}, cap={}",
                field(s, "currentSupply"),
                field(s, "supplyCap")
            )?;
        }
        Ok(())
    }
}
