//
//  gitlab-client
//  api/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository API: branches, commits, trees and files.
//!
//! File paths and branch names are encoded as single path segments, so
//! `src/main.rs` and `feature/login` can be passed as-is.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::GitlabClient;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let client = GitlabClient::new()?;
//! let repo = client.repositories();
//!
//! repo.create_branch("group/project", "feature/login", "main").await?;
//! let readme = repo.raw_file("group/project", "README.md", "main").await?;
//! println!("{}", readme);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use serde::Serialize;
use serde_json::{json, Value};

use super::common::{encode_path, query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Filters for commit listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitFilter {
    /// Branch, tag or SHA to list from. Defaults to the default branch.
    /// GitLab calls this `ref_name` here but `ref` on the tree endpoint.
    pub ref_name: Option<String>,

    /// ISO 8601 lower bound.
    pub since: Option<String>,

    /// ISO 8601 upper bound.
    pub until: Option<String>,

    /// Only commits touching this file path.
    pub path: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Options for tree listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeOptions {
    /// Directory to list; the repository root when unset.
    pub path: Option<String>,

    /// Sent as `ref`.
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,

    pub recursive: Option<bool>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Sub-client for the repositories resource group (`repositories`, `repo`).
#[derive(Debug, Clone, Copy)]
pub struct Repositories<'a> {
    client: &'a GitlabClient,
}

impl<'a> Repositories<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /projects/:id/repository/branches`
    pub async fn branches(&self, project: impl Display, list: &ListOptions) -> Result<Value> {
        self.client
            .get_with_query(&repo_path(project, "branches")?, query_pairs(list)?)
            .await
    }

    /// `GET /projects/:id/repository/branches/:branch`
    pub async fn branch(&self, project: impl Display, branch: &str) -> Result<Value> {
        self.client.get(&branch_path(project, branch)?).await
    }

    /// Creates a branch.
    ///
    /// `POST /projects/:id/repository/branches`
    ///
    /// # Parameters
    ///
    /// * `branch` - Name of the new branch
    /// * `ref_name` - Branch, tag or SHA to start from
    pub async fn create_branch(
        &self,
        project: impl Display,
        branch: &str,
        ref_name: &str,
    ) -> Result<Value> {
        self.client
            .post(
                &repo_path(project, "branches")?,
                &json!({ "branch": branch, "ref": ref_name }),
            )
            .await
    }

    /// `DELETE /projects/:id/repository/branches/:branch`
    pub async fn delete_branch(&self, project: impl Display, branch: &str) -> Result<Value> {
        self.client.delete(&branch_path(project, branch)?).await
    }

    /// Protects a branch.
    ///
    /// `PUT /projects/:id/repository/branches/:branch/protect`
    ///
    /// # Parameters
    ///
    /// * `developers_can_push` - Allow developers to push directly
    /// * `developers_can_merge` - Allow developers to merge into the branch
    pub async fn protect_branch(
        &self,
        project: impl Display,
        branch: &str,
        developers_can_push: bool,
        developers_can_merge: bool,
    ) -> Result<Value> {
        self.client
            .put(
                &format!("{}/protect", branch_path(project, branch)?),
                &json!({
                    "developers_can_push": developers_can_push,
                    "developers_can_merge": developers_can_merge,
                }),
            )
            .await
    }

    /// `PUT /projects/:id/repository/branches/:branch/unprotect`
    pub async fn unprotect_branch(&self, project: impl Display, branch: &str) -> Result<Value> {
        self.client
            .put(
                &format!("{}/unprotect", branch_path(project, branch)?),
                &json!({}),
            )
            .await
    }

    /// Commit history, newest first.
    ///
    /// `GET /projects/:id/repository/commits`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::repositories::CommitFilter;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let filter = CommitFilter {
    ///     ref_name: Some("develop".to_string()),
    ///     path: Some("Cargo.toml".to_string()),
    ///     ..Default::default()
    /// };
    /// let commits = client.repositories().commits("group/app", &filter).await?;
    /// println!("{}", commits);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn commits(&self, project: impl Display, filter: &CommitFilter) -> Result<Value> {
        self.client
            .get_with_query(&repo_path(project, "commits")?, query_pairs(filter)?)
            .await
    }

    /// `GET /projects/:id/repository/commits/:sha`
    pub async fn commit(&self, project: impl Display, sha: &str) -> Result<Value> {
        self.client
            .get(&format!("{}/{}", repo_path(project, "commits")?, encode_path(sha)?))
            .await
    }

    /// Diff between two refs.
    ///
    /// `GET /projects/:id/repository/compare?from=...&to=...`
    pub async fn compare(&self, project: impl Display, from: &str, to: &str) -> Result<Value> {
        self.client
            .get_with_query(
                &repo_path(project, "compare")?,
                vec![
                    ("from".to_string(), from.to_string()),
                    ("to".to_string(), to.to_string()),
                ],
            )
            .await
    }

    /// `GET /projects/:id/repository/tree`
    pub async fn tree(&self, project: impl Display, options: &TreeOptions) -> Result<Value> {
        self.client
            .get_with_query(&repo_path(project, "tree")?, query_pairs(options)?)
            .await
    }

    /// File metadata with base64 content.
    ///
    /// `GET /projects/:id/repository/files/:file_path?ref=...`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument)
    /// without sending a request when `file_path` is empty, `.` or `..`.
    pub async fn file(
        &self,
        project: impl Display,
        file_path: &str,
        ref_name: &str,
    ) -> Result<Value> {
        self.client
            .get_with_query(&file_path_for(project, file_path)?, ref_query(ref_name))
            .await
    }

    /// Decoded file content.
    ///
    /// `GET /projects/:id/repository/files/:file_path/raw?ref=...`
    pub async fn raw_file(
        &self,
        project: impl Display,
        file_path: &str,
        ref_name: &str,
    ) -> Result<String> {
        self.client
            .get_raw(
                &format!("{}/raw", file_path_for(project, file_path)?),
                ref_query(ref_name),
            )
            .await
    }

    /// Commit and line counts per author email.
    ///
    /// `GET /projects/:id/repository/contributors`
    pub async fn contributors(&self, project: impl Display) -> Result<Value> {
        self.client.get(&repo_path(project, "contributors")?).await
    }
}

fn repo_path(project: impl Display, rest: &str) -> Result<String> {
    Ok(format!("projects/{}/repository/{}", encode_path(project)?, rest))
}

fn branch_path(project: impl Display, branch: &str) -> Result<String> {
    Ok(format!("{}/{}", repo_path(project, "branches")?, encode_path(branch)?))
}

fn file_path_for(project: impl Display, file_path: &str) -> Result<String> {
    Ok(format!("{}/{}", repo_path(project, "files")?, encode_path(file_path)?))
}

fn ref_query(ref_name: &str) -> Vec<(String, String)> {
    vec![("ref".to_string(), ref_name.to_string())]
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_raw_file_encodes_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/9/repository/files/src%2Fmain%2Ers/raw")
            .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
            .with_body("fn main() {}\n")
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let content = client
            .repositories()
            .raw_file(9, "src/main.rs", "main")
            .await
            .unwrap();

        assert_eq!(content, "fn main() {}\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_protect_branch_with_slash() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v4/projects/9/repository/branches/release%2F1%2E0/protect")
            .match_body(Matcher::Json(json!({
                "developers_can_push": false,
                "developers_can_merge": true,
            })))
            .with_body(r#"{"name": "release/1.0", "protected": true}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let branch = client
            .repositories()
            .protect_branch(9, "release/1.0", false, true)
            .await
            .unwrap();

        assert_eq!(branch["protected"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_compare_refs() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/9/repository/compare")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "v1.0".into()),
                Matcher::UrlEncoded("to".into(), "main".into()),
            ]))
            .with_body(r#"{"commits": [], "diffs": []}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        client.repositories().compare(9, "v1.0", "main").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dot_segments_never_reach_the_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let repo = client.repositories();

        assert!(matches!(
            repo.file(9, "..", "main").await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            repo.branch(9, ".").await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            repo.raw_file(9, "", "main").await,
            Err(Error::InvalidArgument(_))
        ));

        mock.assert_async().await;
        assert!(client.response_history().is_empty());
    }
}
