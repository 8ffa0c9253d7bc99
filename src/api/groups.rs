//
//  gitlab-client
//  api/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Groups API.
//!
//! Groups (and subgroups) are addressed by numeric id or full path such as
//! `parent/child`.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{json, Value};

use super::common::{encode_path, query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Filters for group listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupFilter {
    pub search: Option<String>,

    pub owned: Option<bool>,

    /// Include every group visible to the caller, not only memberships.
    pub all_available: Option<bool>,

    /// Groups the user can access with at least this role.
    pub min_access_level: Option<u32>,

    pub order_by: Option<String>,

    pub sort: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Payload for creating or updating a group.
///
/// `name` and `path` are both required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    /// Creates a subgroup when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

/// Sub-client for the groups resource group (`groups`).
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    client: &'a GitlabClient,
}

impl<'a> Groups<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /groups`
    pub async fn all(&self, filter: &GroupFilter) -> Result<Value> {
        self.client
            .get_with_query("groups", query_pairs(filter)?)
            .await
    }

    /// Fetches a group, including its projects.
    ///
    /// `GET /groups/:id`
    pub async fn show(&self, group: impl Display) -> Result<Value> {
        self.client.get(&group_path(group)?).await
    }

    /// Creates a group, or a subgroup when `parent_id` is set.
    ///
    /// `POST /groups`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::groups::GroupParams;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let params = GroupParams {
    ///     name: Some("Platform".to_string()),
    ///     path: Some("platform".to_string()),
    ///     parent_id: Some(42),
    ///     ..Default::default()
    /// };
    /// let group = client.groups().create(&params).await?;
    /// println!("{}", group["full_path"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, params: &GroupParams) -> Result<Value> {
        self.client.post("groups", params).await
    }

    /// `PUT /groups/:id`
    pub async fn update(&self, group: impl Display, params: &GroupParams) -> Result<Value> {
        self.client.put(&group_path(group)?, params).await
    }

    /// Deletes a group with all of its subgroups and projects.
    ///
    /// `DELETE /groups/:id`
    pub async fn remove(&self, group: impl Display) -> Result<Value> {
        self.client.delete(&group_path(group)?).await
    }

    /// `GET /groups/:id/members`
    pub async fn members(&self, group: impl Display, list: &ListOptions) -> Result<Value> {
        self.client
            .get_with_query(&format!("{}/members", group_path(group)?), query_pairs(list)?)
            .await
    }

    /// Adds a member.
    ///
    /// `POST /groups/:id/members`
    ///
    /// # Parameters
    ///
    /// * `user_id` - Numeric user id
    /// * `access_level` - 10 guest, 20 reporter, 30 developer, 40 maintainer,
    ///   50 owner
    pub async fn add_member(
        &self,
        group: impl Display,
        user_id: u64,
        access_level: u32,
    ) -> Result<Value> {
        self.client
            .post(
                &format!("{}/members", group_path(group)?),
                &json!({ "user_id": user_id, "access_level": access_level }),
            )
            .await
    }

    /// `DELETE /groups/:id/members/:user_id`
    pub async fn remove_member(&self, group: impl Display, user_id: u64) -> Result<Value> {
        self.client
            .delete(&format!("{}/members/{}", group_path(group)?, user_id))
            .await
    }

    /// Projects directly in the group.
    ///
    /// `GET /groups/:id/projects`
    pub async fn projects(&self, group: impl Display, list: &ListOptions) -> Result<Value> {
        self.client
            .get_with_query(
                &format!("{}/projects", group_path(group)?),
                query_pairs(list)?,
            )
            .await
    }

    /// Moves a project into this group.
    ///
    /// `POST /groups/:id/projects/:project_id`
    ///
    /// # Notes
    ///
    /// Admin only.
    pub async fn transfer_project(&self, group: impl Display, project_id: u64) -> Result<Value> {
        self.client
            .post_empty(&format!("{}/projects/{}", group_path(group)?, project_id))
            .await
    }
}

fn group_path(group: impl Display) -> Result<String> {
    Ok(format!("groups/{}", encode_path(group)?))
}
