use std::time::Duration;

use reqwest::{header, Method};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;

use crate::{
    classify::{self, AttemptOutcome},
    retry::{RetryDecision, RetryPolicy},
    JulesClient, JulesError, Result,
};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// A fully described API call: method, path below the base URL, query pairs
/// and an already-serialized JSON body.
///
/// The body is encoded once here and sent verbatim on every attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Appends query pairs, keeping their order.
    pub fn with_query<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        self.query.extend(pairs);
        self
    }

    /// Serializes `body` as the JSON payload.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|err| JulesError::Encode(err.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl JulesClient {
    /// Executes a request and decodes the JSON response into `T`.
    ///
    /// Returns `Ok(None)` when the service answered 2xx with an empty body.
    /// Retry and timeout behavior follow the client's [`crate::TimeoutPolicy`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<Option<T>> {
        self.run(request, classify::decode::<T>).await
    }

    /// Executes a request whose response body is not needed.
    pub(crate) async fn execute_empty(&self, request: &RequestDescriptor) -> Result<()> {
        self.run::<()>(request, |_| Ok(None)).await.map(|_| ())
    }

    async fn run<T>(
        &self,
        request: &RequestDescriptor,
        decode: fn(&[u8]) -> AttemptOutcome<T>,
    ) -> Result<Option<T>> {
        let policy = RetryPolicy::new(&self.options);
        let url = format!("{}{}", self.base_url, request.path);
        let mut attempt = 0u64;

        loop {
            if self.cancel.is_cancelled() {
                return Err(JulesError::Cancelled);
            }
            attempt += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(method = %request.method, %url, attempt, "sending request");

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(JulesError::Cancelled),
                outcome = self.attempt(request, &url, policy.attempt_timeout(), decode) => outcome,
            };

            let failure = match outcome {
                Ok(decoded) => return Ok(decoded),
                Err(failure) => failure,
            };

            match policy.decide(&failure) {
                RetryDecision::Stop => return Err(failure.into_error()),
                RetryDecision::RetryAfter(delay) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "{failure}, retrying"
                    );

                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return Err(JulesError::Cancelled),
                        _ = sleep(delay) => {}
                    }
                }
            }
        }
    }

    async fn attempt<T>(
        &self,
        request: &RequestDescriptor,
        url: &str,
        timeout: Duration,
        decode: fn(&[u8]) -> AttemptOutcome<T>,
    ) -> AttemptOutcome<T> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(classify::transport)?;

        classify::status(status, &body)?;
        decode(&body)
    }
}
