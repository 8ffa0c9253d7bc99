//
//  gitlab-client
//  api/tags.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository tags API, including the release notes attached to a tag.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::tags::CreateTag;
//! use gitlab_client::GitlabClient;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let client = GitlabClient::new()?;
//! let tag = CreateTag {
//!     tag_name: "v1.4.0".to_string(),
//!     ref_name: "main".to_string(),
//!     message: Some("Release 1.4.0".to_string()),
//!     ..Default::default()
//! };
//! client.tags().create("group/app", &tag).await?;
//! client.tags().create_release("group/app", "v1.4.0", "## Changes\n- Faster sync").await?;
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use serde::Serialize;
use serde_json::{json, Value};

use super::common::{encode_path, query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Payload for creating a tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTag {
    pub tag_name: String,

    /// Branch, tag or SHA the tag points at. Sent as `ref`.
    #[serde(rename = "ref")]
    pub ref_name: String,

    /// Creates an annotated tag when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Release notes created together with the tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_description: Option<String>,
}

/// Sub-client for the tags resource group (`tags`).
#[derive(Debug, Clone, Copy)]
pub struct Tags<'a> {
    client: &'a GitlabClient,
}

impl<'a> Tags<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// Tags, most recently updated first.
    ///
    /// `GET /projects/:id/repository/tags`
    pub async fn all(&self, project: impl Display, list: &ListOptions) -> Result<Value> {
        self.client
            .get_with_query(&tags_path(project)?, query_pairs(list)?)
            .await
    }

    /// `GET /projects/:id/repository/tags/:tag_name`
    pub async fn show(&self, project: impl Display, tag: &str) -> Result<Value> {
        self.client.get(&tag_path(project, tag)?).await
    }

    /// `POST /projects/:id/repository/tags`
    pub async fn create(&self, project: impl Display, tag: &CreateTag) -> Result<Value> {
        self.client.post(&tags_path(project)?, tag).await
    }

    /// `DELETE /projects/:id/repository/tags/:tag_name`
    pub async fn remove(&self, project: impl Display, tag: &str) -> Result<Value> {
        self.client.delete(&tag_path(project, tag)?).await
    }

    /// Adds release notes to an existing tag.
    ///
    /// `POST /projects/:id/repository/tags/:tag_name/release`
    ///
    /// # Errors
    ///
    /// GitLab answers 409 if the tag already has release notes; use
    /// [`update_release`](Self::update_release) then.
    pub async fn create_release(
        &self,
        project: impl Display,
        tag: &str,
        description: &str,
    ) -> Result<Value> {
        self.client
            .post(
                &format!("{}/release", tag_path(project, tag)?),
                &json!({ "description": description }),
            )
            .await
    }

    /// Replaces the release notes of a tag.
    ///
    /// `PUT /projects/:id/repository/tags/:tag_name/release`
    pub async fn update_release(
        &self,
        project: impl Display,
        tag: &str,
        description: &str,
    ) -> Result<Value> {
        self.client
            .put(
                &format!("{}/release", tag_path(project, tag)?),
                &json!({ "description": description }),
            )
            .await
    }
}

fn tags_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/repository/tags", encode_path(project)?))
}

fn tag_path(project: impl Display, tag: &str) -> Result<String> {
    Ok(format!("{}/{}", tags_path(project)?, encode_path(tag)?))
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_create_tag_renames_ref() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects/3/repository/tags")
            .match_body(Matcher::Json(json!({ "tag_name": "v1.0.0", "ref": "main" })))
            .with_status(201)
            .with_body(r#"{"name": "v1.0.0"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let tag = CreateTag {
            tag_name: "v1.0.0".into(),
            ref_name: "main".into(),
            ..Default::default()
        };
        client.tags().create(3, &tag).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_release_encodes_tag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v4/projects/3/repository/tags/v1%2E0%2E0/release")
            .with_body(r#"{"tag_name": "v1.0.0", "description": "Notes"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        client
            .tags()
            .update_release(3, "v1.0.0", "Notes")
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
