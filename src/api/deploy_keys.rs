//
//  gitlab-client
//  api/deploy_keys.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Instance-wide deploy keys. Per-project keys live on
//! [`Projects`](super::Projects).

use serde_json::Value;

use super::common::{query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Sub-client for the deploy keys resource group (`deploy_keys`).
#[derive(Debug, Clone, Copy)]
pub struct DeployKeys<'a> {
    client: &'a GitlabClient,
}

impl<'a> DeployKeys<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// All deploy keys on the instance.
    ///
    /// `GET /deploy_keys`
    ///
    /// # Notes
    ///
    /// Admin only; other callers get [`Error::Forbidden`](crate::Error::Forbidden).
    pub async fn all(&self, list: &ListOptions) -> Result<Value> {
        self.client
            .get_with_query("deploy_keys", query_pairs(list)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_all_pages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/deploy_keys")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "10".into()),
            ]))
            .with_body(r#"[{"id": 1, "title": "ci", "key": "ssh-ed25519 AAAA"}]"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let keys = client.deploy_keys().all(&ListOptions::page(2, 10)).await.unwrap();

        assert_eq!(keys[0]["title"], "ci");
        mock.assert_async().await;
    }
}
