//! JSON Ledger API client.
use ledger_api_types::error::LedgerError;
use ledger_api_types::reply::{self, LedgerEnd};
use ledger_api_types::request::active_contracts::ActiveContractsRequest;
use ledger_api_types::request::submit::SubmitAndWait;
use reqwest::Url;
use std::time::Duration;

mod builder;

pub const USER_AGENT: &str = concat!("ledger-probe/", env!("CARGO_PKG_VERSION"));

#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait::async_trait]
pub trait LedgerApi {
    /// Current end of the ledger.
    async fn ledger_end(&self) -> Result<LedgerEnd, LedgerError>;

    /// Raw entries of the active contract set selected by `request`.
    async fn active_contracts(
        &self,
        request: &ActiveContractsRequest,
    ) -> Result<Vec<serde_json::Value>, LedgerError>;

    /// Submits a command and waits for the ledger to complete it.
    async fn submit_and_wait(
        &self,
        request: &SubmitAndWait,
    ) -> Result<serde_json::Value, LedgerError>;
}

/// JSON Ledger API client.
///
/// Requests are never retried. When a bearer token is configured it is sent
/// with every request.
#[derive(Debug, Clone)]
pub struct Client {
    /// This client is internally refcounted
    inner: reqwest::Client,
    /// Base url of the participant's JSON API, e.g. `http://localhost:7575`.
    base: Url,
    token: Option<String>,
}

impl Client {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a [Client] for the JSON API at `base`.
    pub fn new(base: Url) -> anyhow::Result<Self> {
        Self::with_timeout(base, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: Url, timeout: Duration) -> anyhow::Result<Self> {
        anyhow::ensure!(!base.cannot_be_a_base(), "Not a base URL: {base}");

        Ok(Self {
            inner: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
            base,
            token: None,
        })
    }

    /// Use this bearer token for all requests.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self) -> builder::Request<'_, builder::stage::Endpoint> {
        builder::Request::builder(&self.inner, self.base.clone(), self.token.clone())
    }
}

#[async_trait::async_trait]
impl LedgerApi for Client {
    #[tracing::instrument(skip(self))]
    async fn ledger_end(&self) -> Result<LedgerEnd, LedgerError> {
        self.request().ledger_end().get().await
    }

    /// The reply body is split by [reply::parse_acs_body] which accepts every
    /// top-level shape the ledger is known to send.
    #[tracing::instrument(skip(self))]
    async fn active_contracts(
        &self,
        request: &ActiveContractsRequest,
    ) -> Result<Vec<serde_json::Value>, LedgerError> {
        let body = self
            .request()
            .active_contracts()
            .post_with_json_as_text(request)
            .await?;
        reply::parse_acs_body(&body)
    }

    #[tracing::instrument(skip(self, request), fields(command_id = %request.command_id))]
    async fn submit_and_wait(
        &self,
        request: &SubmitAndWait,
    ) -> Result<serde_json::Value, LedgerError> {
        self.request()
            .submit_and_wait()
            .post_with_json(request)
            .await
    }
}
