//! `jules-http` is an async HTTP client for the Jules agent session API.
//!
//! The crate wraps the session, source and activity endpoints:
//! - [`JulesClient::list_sources`] / [`JulesClient::get_source`]
//! - [`JulesClient::create_session`] / [`JulesClient::get_session`] /
//!   [`JulesClient::list_sessions`]
//! - [`JulesClient::approve_plan`] / [`JulesClient::send_message`]
//! - [`JulesClient::list_activities`]
//!
//! # Timeouts and retries
//!
//! Every call runs under a [`TimeoutPolicy`]. The default,
//! [`TimeoutPolicy::Bounded`], makes exactly one attempt and returns the first
//! failure. [`TimeoutPolicy::Unbounded`] retries transport errors and every
//! non-2xx status, including `404` for sessions that are not visible yet, with
//! a fixed delay between attempts.
//!
//! **Unbounded calls never give up on their own.** They return only on
//! success, on a malformed success body, or when the [`CancellationToken`]
//! attached with [`JulesClient::with_cancellation`] fires. Attach a token (or
//! wrap the call in `tokio::time::timeout`) if you need a ceiling.

mod classify;
mod client;
mod error;
mod executor;
mod options;
mod page;
mod retry;
mod types;

pub use client::{JulesClient, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::JulesError;
pub use executor::{RequestDescriptor, API_KEY_HEADER};
pub use options::{ClientOptions, TimeoutPolicy};
pub use page::PageRequest;
pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;
pub use types::{
    Activity, CreateSessionRequest, GithubRepo, GithubRepoContext, ListActivitiesResponse,
    ListSessionsResponse, ListSourcesResponse, SendMessageRequest, Session, Source, SourceContext,
};

pub type Result<T> = std::result::Result<T, JulesError>;
