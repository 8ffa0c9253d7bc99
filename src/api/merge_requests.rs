//
//  gitlab-client
//  api/merge_requests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Merge requests API.
//!
//! Merge requests are addressed by project and internal id (`iid`).
//!
//! # Merge Request Lifecycle
//!
//! 1. **opened** - Initial state when created
//! 2. **merged** - Changes merged into the target branch
//! 3. **closed** - Closed without merging
//! 4. **locked** - Transient state while a merge is in progress
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::merge_requests::{AcceptMergeRequest, CreateMergeRequest};
//! use gitlab_client::GitlabClient;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let client = GitlabClient::new()?;
//! let mrs = client.merge_requests();
//!
//! let request = CreateMergeRequest {
//!     source_branch: "feature/auth".to_string(),
//!     target_branch: "main".to_string(),
//!     title: "Add user authentication".to_string(),
//!     remove_source_branch: Some(true),
//!     ..Default::default()
//! };
//! let mr = mrs.create("group/project", &request).await?;
//!
//! let merged = mrs
//!     .merge("group/project", mr.iid, &AcceptMergeRequest::default())
//!     .await?;
//! println!("!{} is {}", merged.iid, merged.state);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::common::{encode_path, query_pairs, ListOptions, UserRef};
use super::GitlabClient;
use crate::error::Result;

/// A merge request as returned by the GitLab API.
///
/// # Fields
///
/// * `id` / `iid` - Instance-wide and per-project identifiers
/// * `title` / `description` - Summary and Markdown body
/// * `state` - `opened`, `closed`, `locked` or `merged`
/// * `source_branch` / `target_branch` - Branch names
/// * `draft` - Draft merge requests cannot be merged
/// * `merge_status` - `can_be_merged`, `cannot_be_merged`, `checking`, ...
/// * `sha` - Head commit of the source branch
/// * `author` / `assignees` / `reviewers` - People involved
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::api::merge_requests::MergeRequest;
///
/// fn summary(mr: &MergeRequest) -> String {
///     format!(
///         "!{} {} ({} -> {}){}",
///         mr.iid,
///         mr.title,
///         mr.source_branch,
///         mr.target_branch,
///         if mr.draft { " [draft]" } else { "" }
///     )
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,

    /// Identifier within the project, shown as `!iid`.
    pub iid: u64,

    #[serde(default)]
    pub project_id: Option<u64>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub source_branch: String,

    #[serde(default)]
    pub target_branch: String,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub merge_status: Option<String>,

    /// Head commit of the source branch.
    #[serde(default)]
    pub sha: Option<String>,

    /// Set once merged.
    #[serde(default)]
    pub merge_commit_sha: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub author: Option<UserRef>,

    #[serde(default)]
    pub assignees: Vec<UserRef>,

    #[serde(default)]
    pub reviewers: Vec<UserRef>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub merged_at: Option<String>,

    #[serde(default)]
    pub web_url: Option<String>,
}

/// Filters for merge request listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequestFilter {
    /// `opened`, `closed`, `locked`, `merged` or `all`.
    pub state: Option<String>,

    pub source_branch: Option<String>,

    pub target_branch: Option<String>,

    /// Sent as `labels[]`.
    pub labels: Vec<String>,

    /// Milestone title.
    pub milestone: Option<String>,

    pub author_id: Option<u64>,

    pub search: Option<String>,

    pub order_by: Option<String>,

    pub sort: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Payload for opening a merge request.
///
/// # Fields
///
/// * `source_branch`, `target_branch`, `title` - Required
/// * `target_project_id` - Set when opening from a fork
/// * `labels` - Comma-separated label names
/// * `remove_source_branch` - Delete the source branch after merging
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMergeRequest {
    pub source_branch: String,

    pub target_branch: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewer_ids: Vec<u64>,

    /// Project id of the target when opening from a fork.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
}

/// Payload for updating a merge request. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateMergeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,

    /// `close` or `reopen`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
}

/// Options for accepting (merging) a merge request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AcceptMergeRequest {
    /// Overrides the default merge commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_remove_source_branch: Option<bool>,

    /// Queue the merge until the head pipeline passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_when_pipeline_succeeds: Option<bool>,

    /// Merge only if the source branch head still matches this SHA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Sub-client for the merge requests resource group (`merge_requests`, `mr`).
#[derive(Debug, Clone, Copy)]
pub struct MergeRequests<'a> {
    client: &'a GitlabClient,
}

impl<'a> MergeRequests<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// Lists merge requests of a project.
    ///
    /// `GET /projects/:id/merge_requests`
    ///
    /// # Parameters
    ///
    /// * `project` - Numeric id or full path
    /// * `filter` - State, branch, label and page filters
    pub async fn all(
        &self,
        project: impl Display,
        filter: &MergeRequestFilter,
    ) -> Result<Vec<MergeRequest>> {
        self.client
            .get_with_query(&mrs_path(project)?, query_pairs(filter)?)
            .await
    }

    /// `GET /projects/:id/merge_requests/:iid`
    pub async fn show(&self, project: impl Display, iid: u64) -> Result<MergeRequest> {
        self.client.get(&mr_path(project, iid)?).await
    }

    /// Opens a merge request.
    ///
    /// `POST /projects/:id/merge_requests`
    ///
    /// # Errors
    ///
    /// GitLab answers 409 when an open merge request already exists for the
    /// same branches, which surfaces as [`Error::Api`](crate::Error::Api).
    pub async fn create(
        &self,
        project: impl Display,
        request: &CreateMergeRequest,
    ) -> Result<MergeRequest> {
        self.client.post(&mrs_path(project)?, request).await
    }

    /// Edits a merge request, or closes/reopens it through `state_event`.
    ///
    /// `PUT /projects/:id/merge_requests/:iid`
    pub async fn update(
        &self,
        project: impl Display,
        iid: u64,
        changes: &UpdateMergeRequest,
    ) -> Result<MergeRequest> {
        self.client.put(&mr_path(project, iid)?, changes).await
    }

    /// Accepts the merge request.
    ///
    /// `PUT /projects/:id/merge_requests/:iid/merge`
    ///
    /// # Errors
    ///
    /// GitLab answers 405 when the merge request cannot be merged (draft,
    /// conflicts, failed pipeline) and 409 when `sha` no longer matches; both
    /// surface as [`Error::Api`](crate::Error::Api).
    pub async fn merge(
        &self,
        project: impl Display,
        iid: u64,
        options: &AcceptMergeRequest,
    ) -> Result<MergeRequest> {
        self.client
            .put(&format!("{}/merge", mr_path(project, iid)?), options)
            .await
    }

    /// `GET /projects/:id/merge_requests/:iid/notes`
    pub async fn notes(&self, project: impl Display, iid: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/notes", mr_path(project, iid)?))
            .await
    }

    /// Adds a comment.
    ///
    /// `POST /projects/:id/merge_requests/:iid/notes`
    pub async fn add_note(&self, project: impl Display, iid: u64, body: &str) -> Result<Value> {
        self.client
            .post(
                &format!("{}/notes", mr_path(project, iid)?),
                &json!({ "body": body }),
            )
            .await
    }

    /// The merge request with its diffs under `changes`.
    ///
    /// `GET /projects/:id/merge_requests/:iid/changes`
    ///
    /// # Notes
    ///
    /// Large diffs are truncated by GitLab; check `overflow` in the result.
    pub async fn changes(&self, project: impl Display, iid: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/changes", mr_path(project, iid)?))
            .await
    }

    /// `GET /projects/:id/merge_requests/:iid/commits`
    pub async fn commits(&self, project: impl Display, iid: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/commits", mr_path(project, iid)?))
            .await
    }

    /// Approval state: required approvals and who has approved.
    ///
    /// `GET /projects/:id/merge_requests/:iid/approvals`
    pub async fn approvals(&self, project: impl Display, iid: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/approvals", mr_path(project, iid)?))
            .await
    }
}

fn mrs_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/merge_requests", encode_path(project)?))
}

fn mr_path(project: impl Display, iid: u64) -> Result<String> {
    Ok(format!("{}/{}", mrs_path(project)?, iid))
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_create_sends_branches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects/group%2Fapp/merge_requests")
            .match_body(Matcher::Json(json!({
                "source_branch": "feature",
                "target_branch": "main",
                "title": "Feature",
            })))
            .with_status(201)
            .with_body(
                r#"{"id": 812, "iid": 12, "state": "opened", "title": "Feature",
                    "source_branch": "feature", "target_branch": "main",
                    "author": {"id": 3, "username": "dev"}}"#,
            )
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let request = CreateMergeRequest {
            source_branch: "feature".into(),
            target_branch: "main".into(),
            title: "Feature".into(),
            ..Default::default()
        };
        let mr = client
            .merge_requests()
            .create("group/app", &request)
            .await
            .unwrap();

        assert_eq!(mr.iid, 12);
        assert_eq!(mr.source_branch, "feature");
        assert!(!mr.draft);
        assert!(mr.reviewers.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_merge_returns_merged_state() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v4/projects/3/merge_requests/12/merge")
            .match_body(Matcher::Json(json!({ "squash": true })))
            .with_body(r#"{"id": 812, "iid": 12, "state": "merged", "merge_commit_sha": "abc123"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let options = AcceptMergeRequest {
            squash: Some(true),
            ..Default::default()
        };
        let mr = client.merge_requests().merge(3, 12, &options).await.unwrap();

        assert_eq!(mr.state, "merged");
        assert_eq!(mr.merge_commit_sha.as_deref(), Some("abc123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_merge_not_allowed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/api/v4/projects/3/merge_requests/12/merge")
            .with_status(405)
            .with_body(r#"{"message": "405 Method Not Allowed"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let err = client
            .merge_requests()
            .merge(3, 12, &AcceptMergeRequest::default())
            .await
            .unwrap_err();

        match err {
            Error::Api { status, message } => {
                assert_eq!(status, reqwest::StatusCode::METHOD_NOT_ALLOWED);
                assert_eq!(message, "405 Method Not Allowed");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
