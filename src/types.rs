use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{page, PageRequest};

/// GitHub repository backing a [`Source`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

/// A registered upstream repository the agent can work on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Resource name, e.g. `sources/github/owner/repo`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<GithubRepo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_branch: Option<String>,
}

/// Which source a session works against.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    /// Resource name of the source (`Source::name`).
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_context: Option<GithubRepoContext>,
}

impl SourceContext {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            github_repo_context: None,
        }
    }

    /// Starts work from the given branch of a GitHub source.
    pub fn with_starting_branch(mut self, branch: impl Into<String>) -> Self {
        self.github_repo_context = Some(GithubRepoContext {
            starting_branch: Some(branch.into()),
        });
        self
    }
}

/// A unit of ongoing agent work tied to a source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SourceContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Body of `POST /sessions`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub prompt: String,
    pub source_context: SourceContext,
    pub title: String,
    /// Pause the session until [`crate::JulesClient::approve_plan`] is called.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub require_plan_approval: bool,
}

impl CreateSessionRequest {
    pub fn new(
        prompt: impl Into<String>,
        source_context: SourceContext,
        title: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            source_context,
            title: title.into(),
            require_plan_approval: false,
        }
    }

    pub fn with_plan_approval(mut self, required: bool) -> Self {
        self.require_plan_approval = required;
        self
    }
}

/// Body of `POST /sessions/{id}:sendMessage`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest {
    pub prompt: String,
}

impl SendMessageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// One logged event in a session's history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourcesResponse {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListSourcesResponse {
    /// Token for the following page, or `None` at the end of the listing.
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|token| !token.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListSessionsResponse {
    /// Request for the following page, or `None` at the end of the listing.
    pub fn next_page(&self, page_size: Option<u32>) -> Option<PageRequest> {
        page::next_page(self.next_page_token.as_deref(), page_size)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActivitiesResponse {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListActivitiesResponse {
    /// Request for the following page, or `None` at the end of the listing.
    pub fn next_page(&self, page_size: Option<u32>) -> Option<PageRequest> {
        page::next_page(self.next_page_token.as_deref(), page_size)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        Activity, CreateSessionRequest, ListActivitiesResponse, ListSessionsResponse,
        SourceContext,
    };

    #[test]
    fn create_session_request_uses_camel_case_and_omits_default_approval() {
        let request = CreateSessionRequest::new("p", SourceContext::new("s"), "t");
        assert_eq!(
            serde_json::to_value(&request).expect("must serialize"),
            json!({"prompt": "p", "sourceContext": {"source": "s"}, "title": "t"})
        );

        let request = request.with_plan_approval(true);
        let value = serde_json::to_value(&request).expect("must serialize");
        assert_eq!(value["requirePlanApproval"], json!(true));
    }

    #[test]
    fn starting_branch_is_nested_under_repo_context() {
        let context = SourceContext::new("sources/github/o/r").with_starting_branch("main");
        assert_eq!(
            serde_json::to_value(&context).expect("must serialize"),
            json!({
                "source": "sources/github/o/r",
                "githubRepoContext": {"startingBranch": "main"}
            })
        );
    }

    #[test]
    fn activity_decodes_type_and_timestamp() {
        let activity: Activity = serde_json::from_value(json!({
            "name": "sessions/1/activities/a",
            "id": "a",
            "type": "planGenerated",
            "timestamp": "2025-01-02T03:04:05Z"
        }))
        .expect("must decode");
        assert_eq!(activity.kind, "planGenerated");
        assert_eq!(activity.content, None);
        assert_eq!(
            activity.timestamp.map(|ts| ts.to_rfc3339()),
            Some("2025-01-02T03:04:05+00:00".to_owned())
        );
    }

    #[test]
    fn list_responses_tolerate_missing_fields() {
        let sessions: ListSessionsResponse =
            serde_json::from_value(json!({})).expect("must decode");
        assert!(sessions.sessions.is_empty());
        assert_eq!(sessions.next_page(Some(10)), None);

        let activities: ListActivitiesResponse =
            serde_json::from_value(json!({"activities": [], "nextPageToken": "n"}))
                .expect("must decode");
        let next = activities.next_page(None).expect("token means more pages");
        assert_eq!(next.page_token.as_deref(), Some("n"));
    }
}
