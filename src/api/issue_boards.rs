//
//  gitlab-client
//  api/issue_boards.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project issue boards and their lists.

use std::fmt::Display;

use serde_json::Value;

use super::common::encode_path;
use super::GitlabClient;
use crate::error::Result;

/// Sub-client for the issue boards resource group (`issue_boards`, `board`).
#[derive(Debug, Clone, Copy)]
pub struct IssueBoards<'a> {
    client: &'a GitlabClient,
}

impl<'a> IssueBoards<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self { client }
    }

    /// `GET /projects/:id/boards`
    pub async fn all(&self, project: impl Display) -> Result<Value> {
        self.client.get(&boards_path(project)?).await
    }

    /// `GET /projects/:id/boards/:board_id`
    pub async fn show(&self, project: impl Display, board_id: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/{}", boards_path(project)?, board_id))
            .await
    }

    /// The columns of a board, excluding the built-in open and closed lists.
    ///
    /// `GET /projects/:id/boards/:board_id/lists`
    pub async fn lists(&self, project: impl Display, board_id: u64) -> Result<Value> {
        self.client
            .get(&format!("{}/{}/lists", boards_path(project)?, board_id))
            .await
    }
}

fn boards_path(project: impl Display) -> Result<String> {
    Ok(format!("projects/{}/boards", encode_path(project)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;

    #[tokio::test]
    async fn test_lists_through_board_alias() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/1/boards/2/lists")
            .with_body(r#"[{"id": 1, "label": {"name": "Doing"}}]"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let Api::IssueBoards(boards) = client.api("board").unwrap() else {
            panic!("board did not resolve to issue boards");
        };
        let lists = boards.lists(1, 2).await.unwrap();

        assert_eq!(lists[0]["label"]["name"], "Doing");
        mock.assert_async().await;
    }
}
