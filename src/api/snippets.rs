//
//  gitlab-client
//  api/snippets.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project snippets API.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::common::encode_path;
use super::GitlabClient;
use crate::error::Result;

/// Payload for creating or updating a snippet.
///
/// # Fields
///
/// * `title`, `file_name`, `content`, `visibility` - Required on create
/// * `description` - Optional Markdown
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnippetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Used for syntax highlighting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `private`, `internal` or `public`. Required on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

/// Sub-client for the snippets resource group (`snippets`).
#[derive(Debug, Clone, Copy)]
pub struct Snippets<'a> {
    client: &'a GitlabClient,
}

impl<'a> Snippets<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /projects/:id/snippets`
    pub async fn all(&self, project: impl Display) -> Result<Value> {
        self.client.get(&snippets_path(project)?).await
    }

    /// Snippet metadata. Use [`content`](Self::content) for the body.
    ///
    /// `GET /projects/:id/snippets/:snippet_id`
    pub async fn show(&self, project: impl Display, snippet_id: u64) -> Result<Value> {
        self.client.get(&snippet_path(project, snippet_id)?).await
    }

    /// Creates a snippet.
    ///
    /// `POST /projects/:id/snippets`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::snippets::SnippetParams;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let params = SnippetParams {
    ///     title: Some("Bootstrap".to_string()),
    ///     file_name: Some("bootstrap.sh".to_string()),
    ///     content: Some("#!/bin/sh\nmake setup\n".to_string()),
    ///     visibility: Some("internal".to_string()),
    ///     ..Default::default()
    /// };
    /// client.snippets().create("group/app", &params).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, project: impl Display, params: &SnippetParams) -> Result<Value> {
        self.client.post(&snippets_path(project)?, params).await
    }

    /// `PUT /projects/:id/snippets/:snippet_id`
    pub async fn update(
        &self,
        project: impl Display,
        snippet_id: u64,
        params: &SnippetParams,
    ) -> Result<Value> {
        self.client
            .put(&snippet_path(project, snippet_id)?, params)
            .await
    }

    /// `DELETE /projects/:id/snippets/:snippet_id`
    pub async fn remove(&self, project: impl Display, snippet_id: u64) -> Result<Value> {
        self.client.delete(&snippet_path(project, snippet_id)?).await
    }

    /// The snippet body as plain text.
    ///
    /// `GET /projects/:id/snippets/:snippet_id/raw`
    pub async fn content(&self, project: impl Display, snippet_id: u64) -> Result<String> {
        self.client
            .get_raw(
                &format!("{}/raw", snippet_path(project, snippet_id)?),
                Vec::new(),
            )
            .await
    }
}

fn snippets_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/snippets", encode_path(project)?))
}

fn snippet_path(project: impl Display, snippet_id: u64) -> Result<String> {
    Ok(format!("{}/{}", snippets_path(project)?, snippet_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_content_is_raw() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects/1/snippets/4/raw")
            .with_body("echo hello")
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        assert_eq!(client.snippets().content(1, 4).await.unwrap(), "echo hello");
    }
}
