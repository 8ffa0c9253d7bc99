//
//  gitlab-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common helpers shared by every resource group.
//!
//! - [`encode_path`]: encodes ids such as `group/project` for use in a path
//! - [`UserRef`]: the user summary embedded in issues, merge requests and projects
//! - [`query_pairs`]: turns a serializable parameter struct into query pairs
//! - [`ListOptions`]: `page`/`per_page` options embedded in list parameters
//! - Pagination types (re-exported from [`pagination`] submodule)

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

mod pagination;

pub use pagination::*;

/// Encodes a project, group, branch or file id for use as a single path
/// segment.
///
/// Numeric ids pass through unchanged; namespaced paths have `/` (and `.`)
/// escaped so GitLab treats them as one segment.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty id, or one made only of
/// dots (`.`, `..`). URL normalization would remove such a segment and send
/// the request to a different endpoint.
///
/// # Example
///
/// ```rust
/// use gitlab_client::api::encode_path;
///
/// assert_eq!(encode_path(42)?, "42");
/// assert_eq!(encode_path("my-group/my.project")?, "my-group%2Fmy%2Eproject");
/// assert!(encode_path("..").is_err());
/// # Ok::<(), gitlab_client::Error>(())
/// ```
pub fn encode_path(id: impl Display) -> Result<String> {
    let id = id.to_string();
    if id.chars().all(|c| c == '.') {
        return Err(Error::invalid_argument(format!(
            "'{}' is not a valid path segment",
            id
        )));
    }
    Ok(urlencoding::encode(&id).replace('.', "%2E"))
}

/// A user as embedded in other resources (author, assignee, ...).
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::api::UserRef;
///
/// fn display_user(user: &UserRef) {
///     println!("{} (@{})", user.name, user.username);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Numeric user id.
    pub id: u64,

    /// Login handle, without the leading `@`.
    pub username: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// `active`, `blocked` or `deactivated`.
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Profile page in the GitLab UI.
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Flattens a serializable struct into query pairs.
///
/// `None` fields are skipped, booleans and numbers are rendered as text and
/// sequences become repeated `key[]` entries, matching what the GitLab API
/// expects for array parameters such as `labels[]`.
pub fn query_pairs<T: Serialize + ?Sized>(params: &T) -> Result<Vec<(String, String)>> {
    let map = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::invalid_argument(format!(
                "query parameters must serialize to an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let key = format!("{}[]", key);
                pairs.extend(items.iter().filter_map(scalar).map(|v| (key.clone(), v)));
            }
            other => {
                if let Some(v) = scalar(&other) {
                    pairs.push((key, v));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Page selection shared by list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// GitLab caps this at 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Default)]
    struct Params {
        state: Option<String>,
        labels: Vec<String>,
        confidential: Option<bool>,
        #[serde(flatten)]
        list: ListOptions,
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(
            encode_path("group/sub group/project").unwrap(),
            "group%2Fsub%20group%2Fproject"
        );
        assert_eq!(encode_path("src/main.rs").unwrap(), "src%2Fmain%2Ers");
        assert_eq!(encode_path("...hidden").unwrap(), "%2E%2E%2Ehidden");
    }

    #[test]
    fn test_encode_path_rejects_dot_segments() {
        for id in [".", "..", "...", ""] {
            match encode_path(id) {
                Err(Error::InvalidArgument(message)) => assert!(message.contains(id)),
                other => panic!("'{}' encoded to {:?}", id, other),
            }
        }
    }

    #[test]
    fn test_query_pairs_skip_none_and_expand_arrays() {
        let params = Params {
            state: Some("opened".into()),
            labels: vec!["bug".into(), "ui".into()],
            confidential: Some(false),
            list: ListOptions::page(2, 50),
        };
        let mut pairs = query_pairs(&params).unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("confidential".to_string(), "false".to_string()),
                ("labels[]".to_string(), "bug".to_string()),
                ("labels[]".to_string(), "ui".to_string()),
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "50".to_string()),
                ("state".to_string(), "opened".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_default_is_empty() {
        assert!(query_pairs(&Params::default()).unwrap().is_empty());
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_query_pairs_rejects_scalars() {
        assert!(matches!(query_pairs(&"oops"), Err(Error::InvalidArgument(_))));
    }
}
