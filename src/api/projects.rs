//
//  gitlab-client
//  api/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects API.
//!
//! Covers the project itself plus the per-project collections that have no
//! resource group of their own: members, webhooks, pipelines, deploy keys and
//! CI/CD variables.
//!
//! A project is identified either by its numeric id or by its full path
//! (`group/subgroup/project`); paths are encoded with
//! [`encode_path`](super::encode_path).
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::projects::{ProjectFilter, ProjectParams};
//! use gitlab_client::GitlabClient;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let client = GitlabClient::new()?;
//!
//! let owned = ProjectFilter {
//!     owned: Some(true),
//!     archived: Some(false),
//!     ..Default::default()
//! };
//! for project in client.projects().all(&owned).await? {
//!     println!("{} ({})", project.path_with_namespace, project.default_branch.unwrap_or_default());
//! }
//!
//! let params = ProjectParams {
//!     name: Some("sandbox".to_string()),
//!     visibility: Some("private".to_string()),
//!     initialize_with_readme: Some(true),
//!     ..Default::default()
//! };
//! let created = client.projects().create(&params).await?;
//! println!("Created {}", created.web_url.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::common::{encode_path, query_pairs, ListOptions, UserRef};
use super::GitlabClient;
use crate::error::Result;

/// A project as returned by the GitLab API.
///
/// # Fields
///
/// * `id` - Numeric identifier, usable wherever a project path is accepted
/// * `name` / `path` - Display name and URL slug
/// * `path_with_namespace` - Full path, e.g. `group/subgroup/project`
/// * `default_branch` - `None` for an empty repository
/// * `visibility` - `public`, `internal` or `private`
/// * `archived` - Read-only projects
/// * `owner` - Set for projects in a user namespace
/// * `web_url` / `http_url_to_repo` / `ssh_url_to_repo` - Links
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::api::projects::Project;
///
/// fn clone_url(project: &Project, ssh: bool) -> Option<&str> {
///     if ssh {
///         project.ssh_url_to_repo.as_deref()
///     } else {
///         project.http_url_to_repo.as_deref()
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub path: String,

    /// `group/subgroup/project`.
    #[serde(default)]
    pub path_with_namespace: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub default_branch: Option<String>,

    /// Absent from `simple` listings.
    #[serde(default)]
    pub visibility: Option<String>,

    #[serde(default)]
    pub archived: bool,

    /// Only set for projects in a user namespace.
    #[serde(default)]
    pub owner: Option<UserRef>,

    #[serde(default)]
    pub forks_count: Option<u64>,

    #[serde(default)]
    pub star_count: Option<u64>,

    #[serde(default)]
    pub web_url: Option<String>,

    #[serde(default)]
    pub http_url_to_repo: Option<String>,

    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub last_activity_at: Option<String>,
}

/// Filters for project listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectFilter {
    pub archived: Option<bool>,

    /// `public`, `internal` or `private`.
    pub visibility: Option<String>,

    pub search: Option<String>,

    /// Only projects owned by the caller.
    pub owned: Option<bool>,

    /// Only projects the caller is a member of.
    pub membership: Option<bool>,

    pub starred: Option<bool>,

    /// Ask GitLab for the short representation (id, names, links).
    pub simple: Option<bool>,

    /// `id`, `name`, `path`, `created_at`, `updated_at` or `last_activity_at`.
    pub order_by: Option<String>,

    pub sort: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Payload for creating or updating a project.
///
/// When creating, at least one of `name` or `path` must be set; GitLab
/// derives the other.
///
/// # Fields
///
/// * `namespace_id` - Group to create the project in (defaults to the
///   caller's namespace)
/// * `initialize_with_readme` - Create with an initial commit so
///   `default_branch` is set
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_with_readme: Option<bool>,
}

/// Payload for adding a project webhook.
///
/// Unset event flags keep GitLab's defaults (push events only).
#[derive(Debug, Clone, Default, Serialize)]
pub struct HookParams {
    /// Endpoint GitLab POSTs events to.
    pub url: String,

    /// Sent back in the `X-Gitlab-Token` header for verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_push_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ssl_verification: Option<bool>,
}

/// Filters for pipeline listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineFilter {
    /// `running`, `pending`, `success`, `failed`, `canceled`, `skipped`, ...
    pub status: Option<String>,

    /// Branch or tag. Sent as `ref`.
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,

    pub sha: Option<String>,

    /// Only pipelines triggered by this user.
    pub username: Option<String>,

    pub order_by: Option<String>,

    pub sort: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Sub-client for the projects resource group (`projects`).
#[derive(Debug, Clone, Copy)]
pub struct Projects<'a> {
    client: &'a GitlabClient,
}

impl<'a> Projects<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// Lists projects visible to the caller.
    ///
    /// `GET /projects`
    ///
    /// # Notes
    ///
    /// Unauthenticated calls on gitlab.com list every public project; pass a
    /// filter such as `owned` or `membership` to keep results manageable.
    pub async fn all(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        self.client
            .get_with_query("projects", query_pairs(filter)?)
            .await
    }

    /// Fetches a project by id or full path.
    ///
    /// `GET /projects/:id`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let by_id = client.projects().show(278964).await?;
    /// let by_path = client.projects().show("gitlab-org/gitlab").await?;
    /// assert_eq!(by_id.id, by_path.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn show(&self, project: impl Display) -> Result<Project> {
        self.client.get(&project_path(project)?).await
    }

    /// Creates a project.
    ///
    /// `POST /projects`
    pub async fn create(&self, params: &ProjectParams) -> Result<Project> {
        self.client.post("projects", params).await
    }

    /// Edits project settings. Only fields set in `params` change.
    ///
    /// `PUT /projects/:id`
    pub async fn update(&self, project: impl Display, params: &ProjectParams) -> Result<Project> {
        self.client.put(&project_path(project)?, params).await
    }

    /// Schedules the project for deletion.
    ///
    /// `DELETE /projects/:id`
    ///
    /// # Notes
    ///
    /// On instances with delayed deletion the project stays visible, marked
    /// for removal, until the retention period ends.
    pub async fn remove(&self, project: impl Display) -> Result<Value> {
        self.client.delete(&project_path(project)?).await
    }

    /// Makes the project read-only.
    ///
    /// `POST /projects/:id/archive`
    pub async fn archive(&self, project: impl Display) -> Result<Project> {
        self.client
            .post_empty(&format!("{}/archive", project_path(project)?))
            .await
    }

    /// `POST /projects/:id/unarchive`
    pub async fn unarchive(&self, project: impl Display) -> Result<Project> {
        self.client
            .post_empty(&format!("{}/unarchive", project_path(project)?))
            .await
    }

    /// Forks a project.
    ///
    /// `POST /projects/:id/fork`
    ///
    /// # Parameters
    ///
    /// * `project` - Source project
    /// * `namespace` - Target namespace path; `None` forks into the caller's
    ///   own namespace
    ///
    /// # Returns
    ///
    /// The new fork. Its repository may still be importing when this returns.
    pub async fn fork(&self, project: impl Display, namespace: Option<&str>) -> Result<Project> {
        let path = format!("{}/fork", project_path(project)?);
        match namespace {
            Some(namespace) => {
                self.client
                    .post(&path, &json!({ "namespace_path": namespace }))
                    .await
            }
            None => self.client.post_empty(&path).await,
        }
    }

    /// Lists direct members of the project.
    ///
    /// `GET /projects/:id/members`
    pub async fn members(&self, project: impl Display, list: &ListOptions) -> Result<Value> {
        self.client
            .get_with_query(
                &format!("{}/members", project_path(project)?),
                query_pairs(list)?,
            )
            .await
    }

    /// Adds a member.
    ///
    /// `POST /projects/:id/members`
    ///
    /// # Parameters
    ///
    /// * `user_id` - Numeric user id
    /// * `access_level` - GitLab's numeric role: 10 guest, 20 reporter,
    ///   30 developer, 40 maintainer, 50 owner
    pub async fn add_member(
        &self,
        project: impl Display,
        user_id: u64,
        access_level: u32,
    ) -> Result<Value> {
        self.client
            .post(
                &format!("{}/members", project_path(project)?),
                &json!({ "user_id": user_id, "access_level": access_level }),
            )
            .await
    }

    /// `GET /projects/:id/hooks`
    pub async fn hooks(&self, project: impl Display) -> Result<Value> {
        self.client
            .get(&format!("{}/hooks", project_path(project)?))
            .await
    }

    /// Adds a webhook.
    ///
    /// `POST /projects/:id/hooks`
    pub async fn add_hook(&self, project: impl Display, hook: &HookParams) -> Result<Value> {
        self.client
            .post(&format!("{}/hooks", project_path(project)?), hook)
            .await
    }

    /// Removes a webhook. GitLab answers with an empty body, returned as
    /// `Value::Null`.
    ///
    /// `DELETE /projects/:id/hooks/:hook_id`
    pub async fn remove_hook(&self, project: impl Display, hook_id: u64) -> Result<Value> {
        self.client
            .delete(&format!("{}/hooks/{}", project_path(project)?, hook_id))
            .await
    }

    /// Lists CI/CD pipelines, newest first.
    ///
    /// `GET /projects/:id/pipelines`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::projects::PipelineFilter;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let failed_on_main = PipelineFilter {
    ///     status: Some("failed".to_string()),
    ///     ref_name: Some("main".to_string()),
    ///     ..Default::default()
    /// };
    /// let pipelines = client.projects().pipelines("group/app", &failed_on_main).await?;
    /// println!("{}", pipelines);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn pipelines(&self, project: impl Display, filter: &PipelineFilter) -> Result<Value> {
        self.client
            .get_with_query(
                &format!("{}/pipelines", project_path(project)?),
                query_pairs(filter)?,
            )
            .await
    }

    /// `GET /projects/:id/pipelines/:pipeline_id`
    pub async fn pipeline(&self, project: impl Display, pipeline_id: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/pipelines/{}", project_path(project)?, pipeline_id))
            .await
    }

    /// Runs a new pipeline for a branch or tag.
    ///
    /// `POST /projects/:id/pipeline`
    ///
    /// # Notes
    ///
    /// The endpoint is singular (`pipeline`), unlike the listing.
    pub async fn create_pipeline(&self, project: impl Display, ref_name: &str) -> Result<Value> {
        self.client
            .post(
                &format!("{}/pipeline", project_path(project)?),
                &json!({ "ref": ref_name }),
            )
            .await
    }

    /// Deploy keys enabled for the project.
    ///
    /// `GET /projects/:id/deploy_keys`
    pub async fn deploy_keys(&self, project: impl Display) -> Result<Value> {
        self.client
            .get(&format!("{}/deploy_keys", project_path(project)?))
            .await
    }

    /// Adds a deploy key.
    ///
    /// `POST /projects/:id/deploy_keys`
    ///
    /// # Parameters
    ///
    /// * `title` - Label shown in the UI
    /// * `key` - Public key in OpenSSH format
    /// * `can_push` - Grant write access to the repository
    pub async fn add_deploy_key(
        &self,
        project: impl Display,
        title: &str,
        key: &str,
        can_push: bool,
    ) -> Result<Value> {
        self.client
            .post(
                &format!("{}/deploy_keys", project_path(project)?),
                &json!({ "title": title, "key": key, "can_push": can_push }),
            )
            .await
    }

    /// CI/CD variables. Values are returned in clear text.
    ///
    /// `GET /projects/:id/variables`
    pub async fn variables(&self, project: impl Display) -> Result<Value> {
        self.client
            .get(&format!("{}/variables", project_path(project)?))
            .await
    }
}

fn project_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}", encode_path(project)?))
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_show_by_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/my-group%2Fmy%2Eproject")
            .with_body(
                r#"{"id": 5, "name": "my.project", "path_with_namespace": "my-group/my.project",
                    "default_branch": "main", "visibility": "private",
                    "owner": {"id": 1, "username": "root"}}"#,
            )
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let project = client.projects().show("my-group/my.project").await.unwrap();

        assert_eq!(project.id, 5);
        assert_eq!(project.path_with_namespace, "my-group/my.project");
        assert_eq!(project.default_branch.as_deref(), Some("main"));
        assert!(!project.archived);
        assert_eq!(project.owner.unwrap().username, "root");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fork_into_namespace() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects/5/fork")
            .match_body(Matcher::Json(json!({ "namespace_path": "team" })))
            .with_status(201)
            .with_body(r#"{"id": 6, "path_with_namespace": "team/app"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let fork = client.projects().fork(5, Some("team")).await.unwrap();

        assert_eq!(fork.id, 6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_pipeline_uses_ref() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects/5/pipeline")
            .match_body(Matcher::Json(json!({ "ref": "main" })))
            .with_status(201)
            .with_body(r#"{"id": 99, "status": "created"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let pipeline = client.projects().create_pipeline(5, "main").await.unwrap();

        assert_eq!(pipeline["id"], 99);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pipeline_filter_renames_ref() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/5/pipelines")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("ref".into(), "main".into()),
                Matcher::UrlEncoded("status".into(), "failed".into()),
            ]))
            .with_body("[]")
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let filter = PipelineFilter {
            status: Some("failed".into()),
            ref_name: Some("main".into()),
            ..Default::default()
        };
        client.projects().pipelines(5, &filter).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_accepts_empty_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/v4/projects/5/hooks/1")
            .with_status(204)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let result = client.projects().remove_hook(5, 1).await.unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_dot_segment_project_is_rejected() {
        let client = GitlabClient::new().unwrap();
        for project in [".", ".."] {
            let err = client.projects().remove(project).await.unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{}", project);
        }
        assert!(client.response_history().is_empty());
    }
}
