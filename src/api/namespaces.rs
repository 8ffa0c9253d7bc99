//
//  gitlab-client
//  api/namespaces.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Namespaces API. A namespace is either a user's personal space or a group.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::common::{encode_path, query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Filters for namespace listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamespaceFilter {
    /// Matches name and path.
    pub search: Option<String>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Sub-client for the namespaces resource group (`namespaces`, `ns`).
#[derive(Debug, Clone, Copy)]
pub struct Namespaces<'a> {
    client: &'a GitlabClient,
}

impl<'a> Namespaces<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// Namespaces the caller can create projects in. Administrators see all.
    ///
    /// `GET /namespaces`
    pub async fn all(&self, filter: &NamespaceFilter) -> Result<Value> {
        self.client
            .get_with_query("namespaces", query_pairs(filter)?)
            .await
    }

    /// Looks up a namespace by id or full path.
    ///
    /// `GET /namespaces/:id`
    ///
    /// # Notes
    ///
    /// `kind` in the result tells a user namespace (`user`) from a group
    /// (`group`).
    pub async fn show(&self, namespace: impl Display) -> Result<Value> {
        self.client
            .get(&format!("namespaces/{}", encode_path(namespace)?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_all_sends_search() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/namespaces")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "plat".into()),
                Matcher::UrlEncoded("per_page".into(), "20".into()),
            ]))
            .with_body(r#"[{"id": 4, "path": "platform", "kind": "group"}]"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let filter = NamespaceFilter {
            search: Some("plat".into()),
            list: ListOptions {
                page: None,
                per_page: Some(20),
            },
        };
        let namespaces = client.namespaces().all(&filter).await.unwrap();

        assert_eq!(namespaces[0]["kind"], "group");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_show_by_full_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/namespaces/platform%2Finfra")
            .with_body(r#"{"id": 9, "full_path": "platform/infra", "kind": "group"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let namespace = client.namespaces().show("platform/infra").await.unwrap();

        assert_eq!(namespace["id"], 9);
        mock.assert_async().await;
    }
}
