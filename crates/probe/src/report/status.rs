//! Which protocol services are live on the ledger.
use crate::summary::{self, render};
use ledger_api_types::reply::{AcsSnapshot, ActiveContract};
use std::fmt;

/// Protocol contract kinds, matched against the rendered template id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Service {
    Token,
    Bridge,
    Staking,
    EthPool,
    BoostPool,
    Lending,
    DirectMint,
}

impl Service {
    const PATTERNS: [(&'static str, Service); 7] = [
        ("CantonDirectMint:CantonMUSD", Service::Token),
        ("V3:BridgeService", Service::Bridge),
        ("CantonSMUSD:CantonStakingService", Service::Staking),
        ("CantonETHPool:CantonETHPoolService", Service::EthPool),
        ("CantonBoostPool:CantonBoostPoolService", Service::BoostPool),
        ("CantonLending:CantonLendingService", Service::Lending),
        ("CantonDirectMint:CantonDirectMintService", Service::DirectMint),
    ];

    pub fn classify(contract: &ActiveContract) -> Option<Self> {
        let template = contract.template_id.to_string();
        Self::PATTERNS
            .iter()
            .find(|(pattern, _)| template.contains(*pattern))
            .map(|&(_, service)| service)
    }
}

#[derive(Default)]
pub struct StatusReport<'a> {
    pub tokens: Vec<&'a ActiveContract>,
    pub bridge: Option<&'a ActiveContract>,
    pub staking: Option<&'a ActiveContract>,
    pub eth_pool: Option<&'a ActiveContract>,
    pub boost_pool: Option<&'a ActiveContract>,
    pub lending: Option<&'a ActiveContract>,
    pub direct_mint: Vec<&'a ActiveContract>,
}

impl<'a> StatusReport<'a> {
    /// For singleton services the last contract seen wins.
    pub fn new(snapshot: &'a AcsSnapshot) -> Self {
        let mut report = Self::default();
        for contract in &snapshot.contracts {
            match Service::classify(contract) {
                Some(Service::Token) => report.tokens.push(contract),
                Some(Service::Bridge) => report.bridge = Some(contract),
                Some(Service::Staking) => report.staking = Some(contract),
                Some(Service::EthPool) => report.eth_pool = Some(contract),
                Some(Service::BoostPool) => report.boost_pool = Some(contract),
                Some(Service::Lending) => report.lending = Some(contract),
                Some(Service::DirectMint) => report.direct_mint.push(contract),
                None => {}
            }
        }
        report
    }
}

/// `key=value` for each of `keys`, or `-` if the service is absent.
fn service_line(contract: Option<&ActiveContract>, keys: &[&str]) -> String {
    let Some(contract) = contract else {
        return "-".to_owned();
    };
    keys.iter()
        .map(|&key| {
            let value = render(contract.field(key));
            format!("{key}={}", summary::prefix(&value, 40))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for StatusReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Protocol Status ===")?;
        writeln!(f, "mUSD tokens:          {}", self.tokens.len())?;
        for token in self.tokens.iter().take(3) {
            let owner = render(token.field("owner"));
            writeln!(
                f,
                "  owner: {}..., amount: {}",
                summary::prefix(&owner, 40),
                render(token.field("amount"))
            )?;
        }
        writeln!(
            f,
            "BridgeService:        {}",
            service_line(self.bridge, &["operator", "paused"])
        )?;
        writeln!(
            f,
            "StakingService:       {}",
            service_line(self.staking, &["totalShares"])
        )?;
        writeln!(
            f,
            "ETHPoolService:       {}",
            service_line(self.eth_pool, &["poolCap"])
        )?;
        writeln!(
            f,
            "BoostPoolService:     {}",
            service_line(self.boost_pool, &["totalLPShares"])
        )?;
        writeln!(
            f,
            "LendingService:       {}",
            if self.lending.is_some() { "present" } else { "-" }
        )?;
        writeln!(f, "DirectMintService:    {} contracts", self.direct_mint.len())
    }
}
