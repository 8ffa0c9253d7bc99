//
//  gitlab-client
//  api/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Users API.
//!
//! Creating, updating, blocking and removing users requires an administrator
//! token. [`Users::me`] and the `*_key` methods without a user id act on the
//! authenticated user.

use serde::Serialize;
use serde_json::{json, Value};

use super::common::{query_pairs, ListOptions};
use super::GitlabClient;
use crate::error::Result;

/// Filters for user listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilter {
    /// Exact username match.
    pub username: Option<String>,

    /// Matches name, username and public email.
    pub search: Option<String>,

    pub active: Option<bool>,

    pub blocked: Option<bool>,

    #[serde(flatten)]
    pub list: ListOptions,
}

/// Payload for creating or updating a user.
///
/// # Fields
///
/// * `email`, `username`, `name` - Required on create
/// * `password` or `reset_password` - One of them is required on create
/// * `skip_confirmation` - Mark the email as confirmed straight away
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Sends a password reset link instead of setting `password`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_create_group: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_confirmation: Option<bool>,
}

/// Sub-client for the users resource group (`users`).
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a GitlabClient,
}

impl<'a> Users<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /users`
    pub async fn all(&self, filter: &UserFilter) -> Result<Value> {
        self.client
            .get_with_query("users", query_pairs(filter)?)
            .await
    }

    /// `GET /users/:id`
    pub async fn show(&self, user_id: u64) -> Result<Value> {
        self.client.get(&format!("users/{}", user_id)).await
    }

    /// The user the active credential belongs to.
    ///
    /// `GET /user`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::{AuthMethod, GitlabClient};
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let mut client = GitlabClient::new()?;
    /// client.authenticate("glpat-xxxx", AuthMethod::HttpToken, None);
    /// let me = client.users().me().await?;
    /// println!("Logged in as @{}", me["username"].as_str().unwrap_or("?"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn me(&self) -> Result<Value> {
        self.client.get("user").await
    }

    /// Creates a user. Admin only.
    ///
    /// `POST /users`
    pub async fn create(&self, params: &UserParams) -> Result<Value> {
        self.client.post("users", params).await
    }

    /// `PUT /users/:id`
    pub async fn update(&self, user_id: u64, params: &UserParams) -> Result<Value> {
        self.client.put(&format!("users/{}", user_id), params).await
    }

    /// Deletes a user. Their contributions move to the ghost user.
    ///
    /// `DELETE /users/:id`
    pub async fn remove(&self, user_id: u64) -> Result<Value> {
        self.client.delete(&format!("users/{}", user_id)).await
    }

    /// `POST /users/:id/block`
    pub async fn block(&self, user_id: u64) -> Result<Value> {
        self.client
            .post_empty(&format!("users/{}/block", user_id))
            .await
    }

    /// `POST /users/:id/unblock`
    pub async fn unblock(&self, user_id: u64) -> Result<Value> {
        self.client
            .post_empty(&format!("users/{}/unblock", user_id))
            .await
    }

    /// SSH keys of `user_id`, or of the authenticated user when `None`.
    ///
    /// `GET /users/:id/keys` or `GET /user/keys`
    pub async fn keys(&self, user_id: Option<u64>) -> Result<Value> {
        self.client.get(&keys_path(user_id)).await
    }

    /// Adds an SSH key.
    ///
    /// `POST /users/:id/keys` or `POST /user/keys`
    ///
    /// # Parameters
    ///
    /// * `user_id` - Target user (admin only), or `None` for the caller
    /// * `title` - Label shown in the UI
    /// * `key` - Public key in OpenSSH format
    pub async fn add_key(&self, user_id: Option<u64>, title: &str, key: &str) -> Result<Value> {
        self.client
            .post(&keys_path(user_id), &json!({ "title": title, "key": key }))
            .await
    }

    /// `DELETE /users/:id/keys/:key_id` or `DELETE /user/keys/:key_id`
    pub async fn remove_key(&self, user_id: Option<u64>, key_id: u64) -> Result<Value> {
        self.client
            .delete(&format!("{}/{}", keys_path(user_id), key_id))
            .await
    }
}

fn keys_path(user_id: Option<u64>) -> String {
    match user_id {
        Some(id) => format!("users/{}/keys", id),
        None => "user/keys".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_me() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/user")
            .with_body(r#"{"id": 1, "username": "root"}"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let me = client.users().me().await.unwrap();
        assert_eq!(me["username"], "root");
    }

    #[tokio::test]
    async fn test_key_paths() {
        let mut server = mockito::Server::new_async().await;
        let own = server
            .mock("POST", "/api/v4/user/keys")
            .match_body(Matcher::Json(json!({ "title": "laptop", "key": "ssh-ed25519 AAAA" })))
            .with_status(201)
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;
        let other = server
            .mock("DELETE", "/api/v4/users/5/keys/1")
            .with_status(204)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        client
            .users()
            .add_key(None, "laptop", "ssh-ed25519 AAAA")
            .await
            .unwrap();
        client.users().remove_key(Some(5), 1).await.unwrap();

        own.assert_async().await;
        other.assert_async().await;
    }
}
