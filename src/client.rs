use std::fmt;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{
    page, ClientOptions, CreateSessionRequest, JulesError, ListActivitiesResponse,
    ListSessionsResponse, ListSourcesResponse, PageRequest, RequestDescriptor, Result,
    SendMessageRequest, Session, Source, TimeoutPolicy,
};

/// Production endpoint of the Jules API.
pub const DEFAULT_BASE_URL: &str = "https://jules.googleapis.com/v1alpha";

/// Environment variable read when no API key is given explicitly.
pub const API_KEY_ENV: &str = "JULES_API_KEY";

#[derive(Clone)]
/// HTTP client for the Jules agent session API.
///
/// Configuration is fixed once built. The `with_*` methods consume the client
/// and return a reconfigured one; clone first to override settings for a
/// single call:
///
/// ```no_run
/// # async fn run(client: &jules_http::JulesClient) -> jules_http::Result<()> {
/// use jules_http::{CancellationToken, TimeoutPolicy};
///
/// let stop = CancellationToken::new();
/// let _session = client
///     .clone()
///     .with_timeout(TimeoutPolicy::Unbounded)
///     .with_cancellation(stop.clone())
///     .get_session("12345")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct JulesClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) options: ClientOptions,
    pub(crate) cancel: CancellationToken,
}

impl fmt::Debug for JulesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JulesClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl JulesClient {
    /// Creates a client with an explicit API key.
    ///
    /// Returns [`JulesError::MissingApiKey`] if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_parts(resolve_api_key(Some(api_key.into()), None)?))
    }

    /// Creates a client from the `JULES_API_KEY` environment variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use jules_http::JulesClient;
    ///
    /// let client = JulesClient::from_env().expect("missing JULES_API_KEY");
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::resolve(None)
    }

    /// Uses `api_key` when given and non-blank, otherwise `JULES_API_KEY`.
    pub fn resolve(api_key: Option<String>) -> Result<Self> {
        let env_value = std::env::var(API_KEY_ENV).ok();
        Ok(Self::from_parts(resolve_api_key(api_key, env_value)?))
    }

    fn from_parts(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key,
            options: ClientOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Points the client at another endpoint, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim().trim_end_matches('/').to_owned();
        self
    }

    /// Applies timeout and retry options.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces only the timeout policy.
    pub fn with_timeout(mut self, timeout: TimeoutPolicy) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Calls made through the returned client stop with
    /// [`JulesError::Cancelled`] once `token` is cancelled, whether a request
    /// is in flight or the client is waiting to retry.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists sources connected to the account.
    pub async fn list_sources(&self, page_token: Option<&str>) -> Result<ListSourcesResponse> {
        let request = RequestDescriptor::get("/sources").with_query(page::token_pair(page_token));
        Ok(self.execute(&request).await?.unwrap_or_default())
    }

    pub async fn get_source(&self, source_id: &str) -> Result<Source> {
        let request = RequestDescriptor::get(format!("/sources/{source_id}"));
        self.fetch_one(&request).await
    }

    /// Starts a new session. The returned record reflects the server's view,
    /// including the assigned `id`.
    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        let request = RequestDescriptor::post("/sessions").with_json(request)?;
        self.fetch_one(&request).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let request = RequestDescriptor::get(format!("/sessions/{session_id}"));
        self.fetch_one(&request).await
    }

    pub async fn list_sessions(&self, page: &PageRequest) -> Result<ListSessionsResponse> {
        let request = RequestDescriptor::get("/sessions").with_query(page.query_pairs());
        Ok(self.execute(&request).await?.unwrap_or_default())
    }

    /// Approves the latest plan of a session created with plan approval.
    pub async fn approve_plan(&self, session_id: &str) -> Result<()> {
        let request = RequestDescriptor::post(format!("/sessions/{session_id}:approvePlan"));
        self.execute_empty(&request).await
    }

    pub async fn list_activities(
        &self,
        session_id: &str,
        page: &PageRequest,
    ) -> Result<ListActivitiesResponse> {
        let request = RequestDescriptor::get(format!("/sessions/{session_id}/activities"))
            .with_query(page.query_pairs());
        Ok(self.execute(&request).await?.unwrap_or_default())
    }

    /// Sends a follow-up message to the agent working on a session. Replies
    /// show up as new activities.
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &SendMessageRequest,
    ) -> Result<()> {
        let request = RequestDescriptor::post(format!("/sessions/{session_id}:sendMessage"))
            .with_json(message)?;
        self.execute_empty(&request).await
    }

    async fn fetch_one<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        self.execute(request).await?.ok_or_else(|| {
            JulesError::Decode(format!("empty response body for {}", request.path()))
        })
    }
}

fn resolve_api_key(explicit: Option<String>, env_value: Option<String>) -> Result<String> {
    explicit
        .into_iter()
        .chain(env_value)
        .map(|key| key.trim().to_owned())
        .find(|key| !key.is_empty())
        .ok_or(JulesError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use super::{resolve_api_key, JulesClient, DEFAULT_BASE_URL};
    use crate::JulesError;

    #[test]
    fn explicit_key_wins_over_environment() {
        let key = resolve_api_key(Some("explicit".to_owned()), Some("env".to_owned()))
            .expect("key must resolve");
        assert_eq!(key, "explicit");
    }

    #[test]
    fn blank_explicit_key_falls_back_to_environment() {
        let key = resolve_api_key(Some("  ".to_owned()), Some("env".to_owned()))
            .expect("key must resolve");
        assert_eq!(key, "env");
    }

    #[test]
    fn missing_key_is_a_construction_error() {
        assert!(matches!(
            resolve_api_key(None, None),
            Err(JulesError::MissingApiKey)
        ));
        assert!(matches!(
            resolve_api_key(None, Some(String::new())),
            Err(JulesError::MissingApiKey)
        ));
        assert!(matches!(JulesClient::new(""), Err(JulesError::MissingApiKey)));
    }

    #[test]
    fn base_url_defaults_and_trims_trailing_slash() {
        let client = JulesClient::new("key").expect("client must build");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);

        let client = client.with_base_url("http://127.0.0.1:8080/v1/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = JulesClient::new("secret-key").expect("client must build");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-key"));
    }
}
