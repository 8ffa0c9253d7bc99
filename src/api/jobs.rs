//
//  gitlab-client
//  api/jobs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CI/CD jobs API.
//!
//! Jobs belong to a project and are usually listed per pipeline. The job log
//! is plain text and is returned by [`Jobs::trace`] as a `String`.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::jobs::JobFilter;
//! use gitlab_client::GitlabClient;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let client = GitlabClient::new()?;
//! let failed = JobFilter {
//!     scope: vec!["failed".to_string()],
//!     ..Default::default()
//! };
//! for job in client.jobs().pipeline_jobs("group/project", 1234, &failed).await?
//!     .as_array()
//!     .into_iter()
//!     .flatten()
//! {
//!     client.jobs().retry("group/project", job["id"].as_u64().unwrap_or_default()).await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::common::{encode_path, query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Filters for job listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobFilter {
    /// Job statuses to include (`created`, `pending`, `running`, `failed`,
    /// `success`, `canceled`, `skipped`, `manual`). Sent as `scope[]`.
    pub scope: Vec<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Sub-client for the jobs resource group (`jobs`).
#[derive(Debug, Clone, Copy)]
pub struct Jobs<'a> {
    client: &'a GitlabClient,
}

impl<'a> Jobs<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// Jobs of a project, newest first.
    ///
    /// `GET /projects/:id/jobs`
    pub async fn all(&self, project: impl Display, filter: &JobFilter) -> Result<Value> {
        self.client
            .get_with_query(&jobs_path(project)?, query_pairs(filter)?)
            .await
    }

    /// Jobs of one pipeline.
    ///
    /// `GET /projects/:id/pipelines/:pipeline_id/jobs`
    ///
    /// # Notes
    ///
    /// Retried jobs are hidden unless GitLab is asked for them; only the
    /// latest attempt of each job is listed.
    pub async fn pipeline_jobs(
        &self,
        project: impl Display,
        pipeline_id: u64,
        filter: &JobFilter,
    ) -> Result<Value> {
        self.client
            .get_with_query(
                &format!(
                    "projects/{}/pipelines/{}/jobs",
                    encode_path(project)?,
                    pipeline_id
                ),
                query_pairs(filter)?,
            )
            .await
    }

    /// `GET /projects/:id/jobs/:job_id`
    pub async fn show(&self, project: impl Display, job_id: u64) -> Result<Value> {
        self.client.get(&job_path(project, job_id)?).await
    }

    /// The job log as plain text.
    ///
    /// `GET /projects/:id/jobs/:job_id/trace`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let log = client.jobs().trace("group/project", 8).await?;
    /// for line in log.lines().rev().take(20) {
    ///     println!("{}", line);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn trace(&self, project: impl Display, job_id: u64) -> Result<String> {
        self.client
            .get_raw(&format!("{}/trace", job_path(project, job_id)?), Vec::new())
            .await
    }

    /// `POST /projects/:id/jobs/:job_id/cancel`
    pub async fn cancel(&self, project: impl Display, job_id: u64) -> Result<Value> {
        self.action(project, job_id, "cancel").await
    }

    /// Runs the job again. Returns the new job, which has its own id.
    ///
    /// `POST /projects/:id/jobs/:job_id/retry`
    pub async fn retry(&self, project: impl Display, job_id: u64) -> Result<Value> {
        self.action(project, job_id, "retry").await
    }

    /// Removes the job log and artifacts.
    ///
    /// `POST /projects/:id/jobs/:job_id/erase`
    pub async fn erase(&self, project: impl Display, job_id: u64) -> Result<Value> {
        self.action(project, job_id, "erase").await
    }

    /// Starts a manual job.
    ///
    /// `POST /projects/:id/jobs/:job_id/play`
    pub async fn play(&self, project: impl Display, job_id: u64) -> Result<Value> {
        self.action(project, job_id, "play").await
    }

    async fn action(&self, project: impl Display, job_id: u64, action: &str) -> Result<Value> {
        self.client
            .post_empty(&format!("{}/{}", job_path(project, job_id)?, action))
            .await
    }
}

fn jobs_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/jobs", encode_path(project)?))
}

fn job_path(project: impl Display, job_id: u64) -> Result<String> {
    Ok(format!("{}/{}", jobs_path(project)?, job_id))
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_trace_returns_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects/1/jobs/8/trace")
            .with_header("content-type", "text/plain")
            .with_body("$ cargo test\nok\n")
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let trace = client.jobs().trace(1, 8).await.unwrap();
        assert_eq!(trace, "$ cargo test\nok\n");
    }

    #[tokio::test]
    async fn test_scope_is_sent_as_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/1/pipelines/2/jobs")
            .match_query(Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let filter = JobFilter {
            scope: vec!["failed".into(), "canceled".into()],
            ..Default::default()
        };
        client.jobs().pipeline_jobs(1, 2, &filter).await.unwrap();
        mock.assert_async().await;

        // Repeated keys, in order; a key/value map would keep only one.
        let sent = client.response_history().last().unwrap().request;
        let scopes: Vec<(String, String)> = sent
            .url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert_eq!(
            scopes,
            vec![
                ("scope[]".to_string(), "failed".to_string()),
                ("scope[]".to_string(), "canceled".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_play_posts_without_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects/1/jobs/8/play")
            .with_body(r#"{"id": 8, "status": "pending"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let job = client.jobs().play(1, 8).await.unwrap();
        assert_eq!(job["status"], "pending");
        mock.assert_async().await;
    }
}
