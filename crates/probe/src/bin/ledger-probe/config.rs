use clap::{Args, Parser, Subcommand};
use ledger_api_types::envelope::{EnvelopeKind, EnvelopePolicy};
use ledger_api_types::request::active_contracts::IdentifierFilter;
use ledger_probe_lib::bootstrap::Deployment;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ledger-probe")]
#[command(version)]
#[command(
    about = "Inspects the active contract set of a ledger's JSON API and bootstraps protocol contracts."
)]
struct Cli {
    #[arg(
        long = "ledger-url",
        long_help = "Base URL of the participant's JSON Ledger API",
        value_name = "URL",
        value_hint = clap::ValueHint::Url,
        default_value = "http://localhost:7575",
        env = "LEDGER_API_URL",
        global = true
    )]
    ledger_url: Url,

    #[arg(
        long,
        long_help = "Bearer token sent with every ledger request",
        value_name = "TOKEN",
        env = "LEDGER_API_TOKEN",
        hide_env_values = true,
        global = true
    )]
    token: Option<String>,

    #[arg(
        long = "request-timeout",
        long_help = "Timeout of a single HTTP request in seconds",
        value_name = "SECONDS",
        default_value = "30",
        env = "LEDGER_PROBE_REQUEST_TIMEOUT",
        global = true
    )]
    request_timeout: u64,

    #[arg(
        long,
        long_help = r"Which wrapping of active contract entries to accept.

'auto' accepts every known shape. Any other value pins one API version and
reports entries of other shapes as unrecognized.",
        value_enum,
        default_value = "auto",
        env = "LEDGER_PROBE_ENVELOPE",
        global = true
    )]
    envelope: Envelope,

    #[command(subcommand)]
    command: CommandCli,
}

#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Envelope {
    Auto,
    Flat,
    JsActiveContract,
    Keyed,
}

impl From<Envelope> for EnvelopePolicy {
    fn from(value: Envelope) -> Self {
        match value {
            Envelope::Auto => EnvelopePolicy::Auto,
            Envelope::Flat => EnvelopePolicy::Only(EnvelopeKind::Flat),
            Envelope::JsActiveContract => EnvelopePolicy::Only(EnvelopeKind::JsActiveContract),
            Envelope::Keyed => EnvelopePolicy::Only(EnvelopeKind::Keyed),
        }
    }
}

#[derive(Args)]
struct PartyCli {
    #[arg(
        long,
        long_help = "Party whose active contracts are queried",
        value_name = "PARTY",
        env = "LEDGER_PROBE_PARTY"
    )]
    party: String,
}

#[derive(Subcommand)]
enum CommandCli {
    /// Count active contracts per template.
    Acs {
        #[command(flatten)]
        party: PartyCli,

        #[arg(
            long,
            long_help = "Group by Module:Entity and list contracts with their key payload fields"
        )]
        detail: bool,
    },
    /// List bridge-in requests and mUSD tokens.
    Bridge {
        #[command(flatten)]
        party: PartyCli,
    },
    /// List token holdings and service contracts of one package.
    Wallet {
        #[command(flatten)]
        party: PartyCli,

        #[arg(
            long = "package-id",
            long_help = "Only show contracts of this package",
            value_name = "PACKAGE ID",
            env = "LEDGER_PROBE_PACKAGE_ID"
        )]
        package_id: Option<String>,
    },
    /// Show which protocol services are live.
    Status {
        #[command(flatten)]
        party: PartyCli,
    },
    /// List contracts of several parties and collect the protocol contract ids.
    PurgeList {
        #[arg(
            long = "party",
            long_help = "Parties to list, repeat or separate with commas",
            value_name = "PARTY",
            value_delimiter = ',',
            required = true,
            env = "LEDGER_PROBE_PARTIES"
        )]
        parties: Vec<String>,
    },
    /// Create the protocol's BridgeService and LiquidityPool contracts.
    Bootstrap {
        #[arg(
            long = "package-id",
            long_help = "Package containing the protocol templates",
            value_name = "PACKAGE ID",
            env = "LEDGER_PROBE_PACKAGE_ID"
        )]
        package_id: String,

        #[arg(
            long,
            long_help = "Operator party",
            value_name = "PARTY",
            env = "LEDGER_PROBE_OPERATOR"
        )]
        operator: String,

        #[arg(
            long,
            long_help = "Governance party, co-signs the bridge service",
            value_name = "PARTY",
            env = "LEDGER_PROBE_GOVERNANCE"
        )]
        governance: String,

        #[arg(
            long,
            long_help = "Validator party of the bridge service",
            value_name = "PARTY",
            env = "LEDGER_PROBE_VALIDATOR"
        )]
        validator: String,

        #[arg(
            long = "user-id",
            long_help = "Ledger user submitting the commands",
            value_name = "USER",
            default_value = "administrator",
            env = "LEDGER_PROBE_USER_ID"
        )]
        user_id: String,
    },
    /// Summarize the frontend's balances API.
    Balances {
        #[arg(
            long = "frontend-url",
            long_help = "Base URL of the frontend serving /api/canton-balances",
            value_name = "URL",
            value_hint = clap::ValueHint::Url,
            default_value = "http://localhost:3000",
            env = "LEDGER_PROBE_FRONTEND_URL"
        )]
        frontend_url: Url,
    },
    /// Summarize an istanbul-style coverage report.
    Coverage {
        #[arg(
            long_help = "Path of the coverage JSON",
            value_name = "FILE",
            value_hint = clap::ValueHint::FilePath,
            default_value = "coverage.json"
        )]
        path: PathBuf,
    },
}

pub struct Config {
    pub ledger: Ledger,
    pub command: Command,
}

pub struct Ledger {
    pub url: Url,
    pub token: Option<String>,
    pub request_timeout: Duration,
    pub envelope: EnvelopePolicy,
}

#[derive(Debug)]
pub enum Command {
    Acs { party: String, detail: bool },
    Bridge { party: String },
    Wallet {
        party: String,
        package_id: Option<String>,
        filter: IdentifierFilter,
    },
    Status { party: String },
    PurgeList { parties: Vec<String> },
    Bootstrap { user_id: String, deployment: Deployment },
    Balances { frontend_url: Url },
    Coverage { path: PathBuf },
}

impl Command {
    fn from_cli(value: CommandCli) -> Self {
        match value {
            CommandCli::Acs { party, detail } => Command::Acs {
                party: party.party,
                detail,
            },
            CommandCli::Bridge { party } => Command::Bridge { party: party.party },
            // The ledger does not filter by package reliably, so everything is
            // fetched and filtered locally.
            CommandCli::Wallet { party, package_id } => Command::Wallet {
                party: party.party,
                package_id,
                filter: IdentifierFilter::NoFilter {},
            },
            CommandCli::Status { party } => Command::Status { party: party.party },
            CommandCli::PurgeList { parties } => Command::PurgeList { parties },
            CommandCli::Bootstrap {
                package_id,
                operator,
                governance,
                validator,
                user_id,
            } => Command::Bootstrap {
                user_id,
                deployment: Deployment {
                    package_id,
                    operator,
                    governance,
                    validator,
                },
            },
            CommandCli::Balances { frontend_url } => Command::Balances { frontend_url },
            CommandCli::Coverage { path } => Command::Coverage { path },
        }
    }
}

impl Config {
    pub fn parse() -> Self {
        Self::from_cli(Cli::parse())
    }

    fn from_cli(cli: Cli) -> Self {
        Config {
            ledger: Ledger {
                url: cli.ledger_url,
                token: cli.token,
                request_timeout: Duration::from_secs(cli.request_timeout),
                envelope: cli.envelope.into(),
            },
            command: Command::from_cli(cli.command),
        }
    }
}
