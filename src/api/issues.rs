//
//  gitlab-client
//  api/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issues API.
//!
//! Issues track bugs, features and tasks inside a project. They are addressed
//! by project and internal id (`iid`), the number shown in the GitLab UI, not
//! the instance-wide `id`.
//!
//! # Issue Lifecycle
//!
//! 1. **opened** - Initial state when created, and after a reopen
//! 2. **closed** - Closed manually, by a merge request or by [`Issues::close`]
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::issues::{CreateIssue, IssueFilter};
//! use gitlab_client::GitlabClient;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let client = GitlabClient::new()?;
//!
//! let filter = IssueFilter {
//!     state: Some("opened".to_string()),
//!     labels: vec!["bug".to_string()],
//!     ..Default::default()
//! };
//! let open_bugs = client.issues().list("group/project", &filter).await?;
//!
//! let issue = CreateIssue {
//!     title: "Crash on startup".to_string(),
//!     description: Some("Segfault when the config file is empty.".to_string()),
//!     ..Default::default()
//! };
//! let created = client.issues().create("group/project", &issue).await?;
//! println!("Opened #{} ({} open bugs)", created.iid, open_bugs.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Notes
//!
//! - Issues must be enabled for the project
//! - Labels are sent comma-separated on create/update but as `labels[]` on lists
//! - Deleting an issue requires owner or administrator rights

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::common::{encode_path, query_pairs, ListOptions, UserRef};
use super::GitlabClient;
use crate::error::Result;

/// An issue as returned by the GitLab API.
///
/// Only the commonly used fields are modelled; unknown fields are ignored.
///
/// # Fields
///
/// * `id` - Instance-wide identifier
/// * `iid` - Identifier within the project, used in paths
/// * `project_id` - Owning project
/// * `title` / `description` - Summary and Markdown body
/// * `state` - `opened` or `closed`
/// * `labels` - Label names
/// * `author` / `assignees` - People involved
/// * `created_at` / `updated_at` / `closed_at` - ISO 8601 timestamps
/// * `web_url` - Link to the issue in the GitLab UI
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::api::issues::Issue;
///
/// fn display_issue(issue: &Issue) {
///     println!("#{}: {} [{}]", issue.iid, issue.title, issue.state);
///     if let Some(author) = &issue.author {
///         println!("  Author: @{}", author.username);
///     }
///     println!("  Labels: {}", issue.labels.join(", "));
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Instance-wide identifier.
    pub id: u64,

    /// Identifier within the project.
    pub iid: u64,

    #[serde(default)]
    pub project_id: Option<u64>,

    #[serde(default)]
    pub title: String,

    /// Markdown body.
    #[serde(default)]
    pub description: Option<String>,

    /// Possible values: `opened`, `closed`.
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub confidential: bool,

    #[serde(default)]
    pub author: Option<UserRef>,

    #[serde(default)]
    pub assignees: Vec<UserRef>,

    /// Due date as `YYYY-MM-DD`.
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub closed_at: Option<String>,

    #[serde(default)]
    pub web_url: Option<String>,
}

/// Filters for issue listings.
///
/// Every field is optional; the default lists the first page of all issues
/// visible to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueFilter {
    /// `opened`, `closed` or `all`.
    pub state: Option<String>,

    /// Only issues carrying all of these labels. Sent as `labels[]`.
    pub labels: Vec<String>,

    /// Milestone title, or `None`/`Any` for the special filters.
    pub milestone: Option<String>,

    /// `created_by_me`, `assigned_to_me` or `all`.
    pub scope: Option<String>,

    pub author_id: Option<u64>,

    pub assignee_id: Option<u64>,

    /// Matches title and description.
    pub search: Option<String>,

    /// `created_at`, `updated_at`, `priority`, `due_date`, ...
    pub order_by: Option<String>,

    /// `asc` or `desc`.
    pub sort: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Payload for creating an issue.
///
/// # Example
///
/// ```rust
/// use gitlab_client::api::issues::CreateIssue;
///
/// let issue = CreateIssue {
///     title: "Add dark mode".to_string(),
///     labels: Some("feature,ui".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssue {
    /// Required.
    pub title: String,

    /// Markdown body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignee_ids: Vec<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,

    /// Comma-separated label names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,

    /// `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Payload for updating an issue. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,

    /// Replaces the assignee list; an empty list unassigns everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,

    /// Comma-separated label names, replacing the current set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,

    /// `close` or `reopen`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Sub-client for the issues resource group (`issues`).
#[derive(Debug, Clone, Copy)]
pub struct Issues<'a> {
    client: &'a GitlabClient,
}

impl<'a> Issues<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// Lists issues visible to the authenticated user, across all projects.
    ///
    /// `GET /issues`
    ///
    /// # Parameters
    ///
    /// * `filter` - State, label, scope and page filters
    pub async fn all(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        self.client
            .get_with_query("issues", query_pairs(filter)?)
            .await
    }

    /// Lists the issues of one project.
    ///
    /// `GET /projects/:id/issues`
    ///
    /// # Parameters
    ///
    /// * `project` - Numeric id or full path (`group/project`)
    /// * `filter` - State, label, scope and page filters
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::issues::IssueFilter;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let mine = IssueFilter {
    ///     scope: Some("assigned_to_me".to_string()),
    ///     ..Default::default()
    /// };
    /// for issue in client.issues().list(42, &mine).await? {
    ///     println!("#{} {}", issue.iid, issue.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, project: impl Display, filter: &IssueFilter) -> Result<Vec<Issue>> {
        self.client
            .get_with_query(&issues_path(project)?, query_pairs(filter)?)
            .await
    }

    /// Fetches a single issue.
    ///
    /// `GET /projects/:id/issues/:iid`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the issue does
    /// not exist or is confidential and hidden from the caller.
    pub async fn show(&self, project: impl Display, iid: u64) -> Result<Issue> {
        self.client.get(&issue_path(project, iid)?).await
    }

    /// Opens a new issue.
    ///
    /// `POST /projects/:id/issues`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationFailed`](crate::Error::ValidationFailed)
    /// when the title is empty.
    pub async fn create(&self, project: impl Display, issue: &CreateIssue) -> Result<Issue> {
        self.client.post(&issues_path(project)?, issue).await
    }

    /// Edits an issue. Only the fields set in `changes` are modified.
    ///
    /// `PUT /projects/:id/issues/:iid`
    pub async fn update(
        &self,
        project: impl Display,
        iid: u64,
        changes: &UpdateIssue,
    ) -> Result<Issue> {
        self.client.put(&issue_path(project, iid)?, changes).await
    }

    /// Deletes an issue.
    ///
    /// `DELETE /projects/:id/issues/:iid`
    ///
    /// # Notes
    ///
    /// Requires owner or administrator rights. Most workflows should
    /// [`close`](Self::close) instead.
    pub async fn remove(&self, project: impl Display, iid: u64) -> Result<Value> {
        self.client.delete(&issue_path(project, iid)?).await
    }

    /// Closes an issue. Shorthand for an update with `state_event=close`.
    pub async fn close(&self, project: impl Display, iid: u64) -> Result<Issue> {
        self.set_state(project, iid, "close").await
    }

    /// Reopens a closed issue. Shorthand for an update with
    /// `state_event=reopen`.
    pub async fn reopen(&self, project: impl Display, iid: u64) -> Result<Issue> {
        self.set_state(project, iid, "reopen").await
    }

    /// Lists comments and system notes on an issue, oldest first.
    ///
    /// `GET /projects/:id/issues/:iid/notes`
    pub async fn notes(&self, project: impl Display, iid: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/notes", issue_path(project, iid)?))
            .await
    }

    /// Adds a comment to an issue.
    ///
    /// `POST /projects/:id/issues/:iid/notes`
    ///
    /// # Parameters
    ///
    /// * `body` - Markdown text of the comment
    pub async fn add_note(&self, project: impl Display, iid: u64, body: &str) -> Result<Value> {
        self.client
            .post(
                &format!("{}/notes", issue_path(project, iid)?),
                &json!({ "body": body }),
            )
            .await
    }

    async fn set_state(&self, project: impl Display, iid: u64, event: &str) -> Result<Issue> {
        let changes = UpdateIssue {
            state_event: Some(event.to_string()),
            ..Default::default()
        };
        self.update(project, iid, &changes).await
    }
}

fn issues_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/issues", encode_path(project)?))
}

fn issue_path(project: impl Display, iid: u64) -> Result<String> {
    Ok(format!("{}/{}", issues_path(project)?, iid))
}
