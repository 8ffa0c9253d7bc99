//
//  gitlab-client
//  api/keys.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! SSH key lookup. Returns the key together with the user it belongs to.

use serde_json::Value;

use super::GitlabClient;
use crate::error::Result;

/// Sub-client for the keys resource group (`keys`).
#[derive(Debug, Clone, Copy)]
pub struct Keys<'a> {
    client: &'a GitlabClient,
}

impl<'a> Keys<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /keys/:id`
    pub async fn show(&self, key_id: u64) -> Result<Value> {
        self.client.get(&format!("keys/{}", key_id)).await
    }

    /// Looks a key up by its fingerprint.
    ///
    /// `GET /keys?fingerprint=...`
    ///
    /// # Parameters
    ///
    /// * `fingerprint` - `SHA256:...` or colon-separated MD5 form
    ///
    /// # Notes
    ///
    /// Admin only. The fingerprint is query-encoded, so the `:` and `+`
    /// characters need no escaping by the caller.
    pub async fn by_fingerprint(&self, fingerprint: &str) -> Result<Value> {
        self.client
            .get_with_query(
                "keys",
                vec![("fingerprint".to_string(), fingerprint.to_string())],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_show_returns_owner() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/keys/17")
            .with_body(r#"{"id": 17, "title": "laptop", "user": {"id": 2, "username": "jdoe"}}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let key = client.keys().show(17).await.unwrap();

        assert_eq!(key["user"]["username"], "jdoe");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_by_fingerprint_encodes_query() {
        let fingerprint = "SHA256:nThbg6kXUpJWGl7E1IGOCspRomTxdCARLviKw6E5SY8+x/y";
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/keys")
            .match_query(Matcher::UrlEncoded("fingerprint".into(), fingerprint.into()))
            .with_body(r#"{"id": 17, "title": "laptop"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let key = client.keys().by_fingerprint(fingerprint).await.unwrap();

        assert_eq!(key["id"], 17);
        mock.assert_async().await;
    }
}
