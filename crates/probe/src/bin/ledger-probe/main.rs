#![deny(rust_2018_idioms)]

use anyhow::Context;
use ledger_api_client::Client;
use ledger_api_types::request::active_contracts::IdentifierFilter;
use ledger_probe_lib::coverage::CoverageReport;
use ledger_probe_lib::report::{acs, balances, bridge, purge, status, wallet};
use ledger_probe_lib::submit::Submitter;
use ledger_probe_lib::{bootstrap, snapshot};

mod config;

use config::{Command, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }

    setup_tracing();

    let Config { ledger, command } = Config::parse();

    let client = Client::with_timeout(ledger.url.clone(), ledger.request_timeout)
        .context("Creating ledger client")?
        .with_token(ledger.token);
    let policy = ledger.envelope;

    match command {
        Command::Acs { party, detail } => {
            let snapshot = snapshot::fetch(&client, &party, IdentifierFilter::WildcardFilter {}, policy)
                .await
                .context("Fetching active contracts")?;
            print!("{}", acs::AcsReport::new(&snapshot, detail));
        }
        Command::Bridge { party } => {
            let snapshot = snapshot::fetch(&client, &party, IdentifierFilter::WildcardFilter {}, policy)
                .await
                .context("Fetching active contracts")?;
            print!("{}", bridge::BridgeReport::new(&snapshot));
        }
        Command::Wallet {
            party,
            package_id,
            filter,
        } => {
            let snapshot = snapshot::fetch(&client, &party, filter, policy)
                .await
                .context("Fetching active contracts")?;
            print!(
                "{}",
                wallet::WalletReport::new(&snapshot, &party, package_id.as_deref())
            );
        }
        Command::Status { party } => {
            let snapshot = snapshot::fetch(&client, &party, IdentifierFilter::WildcardFilter {}, policy)
                .await
                .context("Fetching active contracts")?;
            print!("{}", status::StatusReport::new(&snapshot));
        }
        Command::PurgeList { parties } => {
            let mut listings = Vec::with_capacity(parties.len());
            for party in &parties {
                let snapshot = snapshot::fetch(&client, party, IdentifierFilter::WildcardFilter {}, policy)
                    .await
                    .with_context(|| format!("Fetching active contracts of {party}"))?;
                let listing = purge::PartyListing {
                    party: party.as_str(),
                    snapshot,
                };
                print!("{listing}");
                listings.push(listing);
            }
            print!("{}", purge::PurgeList::collect(&listings));
        }
        Command::Bootstrap {
            user_id,
            deployment,
        } => {
            println!("=== Protocol Bootstrap ===\n");
            let submitter = Submitter::new(user_id, Vec::new());
            for outcome in bootstrap::run(&client, &submitter, &deployment).await {
                println!("{outcome}");
            }
            println!("\n=== Done ===");
        }
        Command::Balances { frontend_url } => {
            let reply = balances::fetch(&frontend_url, ledger.request_timeout)
                .await
                .context("Fetching balances")?;
            print!("{}", balances::BalancesReport(&reply));
        }
        Command::Coverage { path } => {
            let report = CoverageReport::from_path(&path)
                .with_context(|| format!("Summarizing {}", path.display()))?;
            print!("{report}");
        }
    }

    Ok(())
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
