//
//  gitlab-client
//  api/milestones.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project milestones API.
//!
//! Milestones are addressed by their instance-wide `id`, not the `iid`.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::common::{encode_path, query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Filters for milestone listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MilestoneFilter {
    /// `active` or `closed`.
    pub state: Option<String>,

    /// Matches title and description.
    pub search: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Payload for creating or updating a milestone. Dates are `YYYY-MM-DD`.
///
/// `title` is required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MilestoneParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// `close` or `activate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
}

/// Sub-client for the milestones resource group (`milestones`, `ms`).
#[derive(Debug, Clone, Copy)]
pub struct Milestones<'a> {
    client: &'a GitlabClient,
}

impl<'a> Milestones<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /projects/:id/milestones`
    pub async fn all(&self, project: impl Display, filter: &MilestoneFilter) -> Result<Value> {
        self.client
            .get_with_query(&milestones_path(project)?, query_pairs(filter)?)
            .await
    }

    /// `GET /projects/:id/milestones/:milestone_id`
    pub async fn show(&self, project: impl Display, milestone_id: u64) -> Result<Value> {
        self.client
            .get(&milestone_path(project, milestone_id)?)
            .await
    }

    /// Creates a milestone.
    ///
    /// `POST /projects/:id/milestones`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::milestones::MilestoneParams;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let params = MilestoneParams {
    ///     title: Some("v2.0".to_string()),
    ///     due_date: Some("2026-12-01".to_string()),
    ///     ..Default::default()
    /// };
    /// client.milestones().create("group/app", &params).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, project: impl Display, params: &MilestoneParams) -> Result<Value> {
        self.client.post(&milestones_path(project)?, params).await
    }

    /// Edits a milestone; set `state_event` to close or reactivate it.
    ///
    /// `PUT /projects/:id/milestones/:milestone_id`
    pub async fn update(
        &self,
        project: impl Display,
        milestone_id: u64,
        params: &MilestoneParams,
    ) -> Result<Value> {
        self.client
            .put(&milestone_path(project, milestone_id)?, params)
            .await
    }

    /// `DELETE /projects/:id/milestones/:milestone_id`
    pub async fn remove(&self, project: impl Display, milestone_id: u64) -> Result<Value> {
        self.client
            .delete(&milestone_path(project, milestone_id)?)
            .await
    }

    /// Issues assigned to the milestone.
    ///
    /// `GET /projects/:id/milestones/:milestone_id/issues`
    pub async fn issues(&self, project: impl Display, milestone_id: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/issues", milestone_path(project, milestone_id)?))
            .await
    }
}

fn milestones_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/milestones", encode_path(project)?))
}

fn milestone_path(project: impl Display, milestone_id: u64) -> Result<String> {
    Ok(format!("{}/{}", milestones_path(project)?, milestone_id))
}
