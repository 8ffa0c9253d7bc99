//
//  gitlab-client
//  api/system_hooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Instance-wide system hooks. Every call requires an administrator token.

use serde::Serialize;
use serde_json::Value;

use super::GitlabClient;
use crate::error::Result;

/// Payload for adding a system hook.
///
/// System hooks always receive project, group and user lifecycle events; the
/// flags below opt into repository events as well.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemHookParams {
    /// Endpoint GitLab POSTs events to.
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_push_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_events: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ssl_verification: Option<bool>,
}

/// Sub-client for the system hooks resource group (`system_hooks`, `hooks`).
#[derive(Debug, Clone, Copy)]
pub struct SystemHooks<'a> {
    client: &'a GitlabClient,
}

impl<'a> SystemHooks<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /hooks`
    pub async fn all(&self) -> Result<Value> {
        self.client.get("hooks").await
    }

    /// `POST /hooks`
    pub async fn create(&self, hook: &SystemHookParams) -> Result<Value> {
        self.client.post("hooks", hook).await
    }

    /// Fires a test event at the hook.
    ///
    /// `POST /hooks/:id`
    pub async fn test(&self, hook_id: u64) -> Result<Value> {
        self.client.post_empty(&format!("hooks/{}", hook_id)).await
    }

    /// `DELETE /hooks/:id`
    pub async fn remove(&self, hook_id: u64) -> Result<Value> {
        self.client.delete(&format!("hooks/{}", hook_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthMethod, Error};

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/hooks")
            .with_status(403)
            .with_body(r#"{"message": "403 Forbidden"}"#)
            .create_async()
            .await;

        let mut client = GitlabClient::with_url(&server.url()).unwrap();
        client.authenticate("user-token", AuthMethod::HttpToken, None);
        let err = client.system_hooks().all().await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(ref m) if m == "403 Forbidden"));
    }
}
