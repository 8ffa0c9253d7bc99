//
//  gitlab-client
//  api/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Instance version information.

use serde::{Deserialize, Serialize};

use super::GitlabClient;
use crate::error::Result;

/// Response of `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Semantic version with edition suffix, e.g. `16.8.1-ee`.
    pub version: String,

    /// Git SHA the instance was built from.
    pub revision: String,
}

/// Sub-client for the version resource group (`version`).
#[derive(Debug, Clone, Copy)]
pub struct Version<'a> {
    client: &'a GitlabClient,
}

impl<'a> Version<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /version`
    ///
    /// # Notes
    ///
    /// Requires authentication on gitlab.com and most self-managed instances.
    pub async fn show(&self) -> Result<VersionInfo> {
        self.client.get("version").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_decodes_typed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/version")
            .with_body(r#"{"version": "16.8.1-ee", "revision": "a1b2c3", "kas": {}}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let info = client.version().show().await.unwrap();
        assert_eq!(
            info,
            VersionInfo {
                version: "16.8.1-ee".into(),
                revision: "a1b2c3".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/version")
            .with_status(401)
            .with_body(r#"{"message": "401 Unauthorized"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        assert!(matches!(
            client.version().show().await,
            Err(crate::Error::Unauthorized(_))
        ));
    }
}
