//! Provides a builder API for creating and sending JSON Ledger API requests.
//!
//! This builder utilises a type state builder pattern with generics to only
//! allow valid operations at each stage of the build process. Each stage is
//! consumed to generate the next stage and the final stage executes the query.
//!
//! Here is an overview of the three builder stages.
//!
//!   1. [Init](stage::Init) which provides the entry point of the
//!      [builder](Request).
//!   2. [Endpoint](stage::Endpoint) where you select the API endpoint.
//!   3. [Final](stage::Final) where you select the REST operation type, which
//!      is then executed.
use ledger_api_types::error::{ApiError, LedgerError};

/// A Ledger API request builder.
pub struct Request<'a, S: RequestState> {
    state: S,
    url: reqwest::Url,
    token: Option<String>,
    client: &'a reqwest::Client,
}

pub mod stage {
    /// Provides the [builder](super::Request::builder) entry-point.
    #[allow(dead_code)]
    pub struct Init;

    /// Select the API endpoint to call:
    /// - [ledger_end](super::Request::ledger_end)
    /// - [active_contracts](super::Request::active_contracts)
    /// - [submit_and_wait](super::Request::submit_and_wait)
    pub struct Endpoint;

    /// Specify the REST operation send the request:
    /// - [get](super::Request::get)
    /// - [post_with_json](super::Request::post_with_json)
    /// - [post_with_json_as_text](super::Request::post_with_json_as_text)
    pub struct Final {
        pub endpoint: &'static str,
    }

    impl super::RequestState for Init {}
    impl super::RequestState for Endpoint {}
    impl super::RequestState for Final {}
}

impl<'a> Request<'a, stage::Init> {
    /// Initialize a [Request] builder.
    ///
    /// `url` must be a base URL, i.e. not `cannot-be-a-base`.
    pub fn builder(
        client: &'a reqwest::Client,
        url: reqwest::Url,
        token: Option<String>,
    ) -> Request<'a, stage::Endpoint> {
        Request {
            url,
            client,
            token,
            state: stage::Endpoint,
        }
    }
}

/// Generates one method per endpoint, each appending the endpoint's path to
/// the base url.
macro_rules! endpoints {
    ($($name:ident => $path:literal),+ $(,)?) => {
        $(
            pub fn $name(self) -> Request<'a, stage::Final> {
                self.endpoint($path)
            }
        )+
    };
}

impl<'a> Request<'a, stage::Endpoint> {
    endpoints!(
        ledger_end => "v2/state/ledger-end",
        active_contracts => "v2/state/active-contracts",
        submit_and_wait => "v2/commands/submit-and-wait",
    );

    fn endpoint(mut self, path: &'static str) -> Request<'a, stage::Final> {
        self.url
            .path_segments_mut()
            .expect("Base URL is valid")
            .pop_if_empty()
            .extend(path.split('/'));

        Request {
            url: self.url,
            client: self.client,
            token: self.token,
            state: stage::Final { endpoint: path },
        }
    }
}

impl Request<'_, stage::Final> {
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request as a REST `GET` operation and parses the response
    /// into `T`.
    pub async fn get<T>(self) -> Result<T, LedgerError>
    where
        T: serde::de::DeserializeOwned,
    {
        tracing::trace!(url=%self.url, "Fetching data from ledger");
        let request = self.authorized(self.client.get(self.url.clone()));
        let response = request.send().await?;
        parse::<T>(response).await
    }

    /// Sends the request as a REST `POST` operation with the specified JSON
    /// body. The response is parsed as type `T`.
    pub async fn post_with_json<T, J>(self, json: &J) -> Result<T, LedgerError>
    where
        T: serde::de::DeserializeOwned,
        J: serde::Serialize + ?Sized,
    {
        let response = self.post(json).await?;
        parse::<T>(response).await
    }

    /// Sends the request as a REST `POST` operation with the specified JSON
    /// body and returns the response body as text.
    ///
    /// For replies which are not necessarily a single JSON document.
    pub async fn post_with_json_as_text<J>(self, json: &J) -> Result<String, LedgerError>
    where
        J: serde::Serialize + ?Sized,
    {
        let response = self.post(json).await?;
        let response = parse_raw(response).await?;
        Ok(response.text().await?)
    }

    async fn post<J>(self, json: &J) -> Result<reqwest::Response, LedgerError>
    where
        J: serde::Serialize + ?Sized,
    {
        tracing::trace!(url=%self.url, endpoint=%self.state.endpoint, "Posting data to ledger");
        let request = self.authorized(self.client.post(self.url.clone()));
        Ok(request.json(json).send().await?)
    }
}

pub(crate) async fn parse<T>(response: reqwest::Response) -> Result<T, LedgerError>
where
    T: serde::de::DeserializeOwned,
{
    let response = parse_raw(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice::<T>(&bytes)?)
}

/// Maps non-success statuses to errors.
///
/// The ledger describes failures with a JSON error object; any other body is
/// kept verbatim.
async fn parse_raw(response: reqwest::Response) -> Result<reqwest::Response, LedgerError> {
    let status = response.status();
    tracing::trace!(%status, "Parsing response from ledger");

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::trace!(%body, "Parsing error response from ledger");

    match serde_json::from_str::<ApiError>(&body) {
        Ok(e) => Err(LedgerError::ApiError(e)),
        Err(_) => Err(LedgerError::Status {
            status: status.as_u16(),
            body,
        }),
    }
}

pub trait RequestState {}
