//
//  gitlab-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for GitLab API Responses
//!
//! GitLab paginates list endpoints with `page`/`per_page` query parameters and
//! describes the result set in response headers:
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `x-page` | Current page (1-indexed) |
//! | `x-per-page` | Items per page |
//! | `x-total` | Total items (omitted for very large sets) |
//! | `x-total-pages` | Total pages (omitted for very large sets) |
//! | `x-next-page` | Next page, empty on the last page |
//! | `x-prev-page` | Previous page, empty on the first page |
//! | `link` | RFC 8288 links with `rel="next"`, `"prev"`, `"first"`, `"last"` |
//!
//! [`ResultPager`] walks all pages of an endpoint through the client's normal
//! pipeline, so every page is authenticated, recorded in the history and
//! checked for errors like any other call.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::api::GitlabClient;
use crate::error::{Error, Result};
use crate::http::{Request, Response};

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("link pattern is valid")
});

/// Largest page size GitLab accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination metadata of a single response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    /// `rel` name to URL, from the `Link` header.
    pub links: HashMap<String, String>,
}

impl Pagination {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        fn number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        }

        let links = headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| LINK_PATTERN.captures_iter(v))
            .map(|c| (c[2].to_string(), c[1].to_string()))
            .collect();

        Self {
            page: number(headers, "x-page"),
            per_page: number(headers, "x-per-page"),
            total: number(headers, "x-total"),
            total_pages: number(headers, "x-total-pages"),
            next_page: number(headers, "x-next-page"),
            prev_page: number(headers, "x-prev-page"),
            links,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page_number().is_some()
    }

    /// The next page number, from `x-next-page` or else the `next` link.
    pub fn next_page_number(&self) -> Option<u32> {
        self.next_page.or_else(|| {
            let next = Url::parse(self.links.get("next")?).ok()?;
            let page = next
                .query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse().ok());
            page
        })
    }
}

/// Fetches pages of a list endpoint.
///
/// ```rust,no_run
/// use gitlab_client::GitlabClient;
///
/// # async fn example() -> gitlab_client::Result<()> {
/// let client = GitlabClient::new()?;
/// let projects = client
///     .result_pager()
///     .per_page(50)
///     .fetch_all("projects", vec![("visibility".into(), "public".into())])
///     .await?;
/// println!("{} projects", projects.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResultPager<'a> {
    client: &'a GitlabClient,
    per_page: u32,
    max_pages: Option<u32>,
}

impl<'a> ResultPager<'a> {
    pub fn new(client: &'a GitlabClient) -> Self {
        Self {
            client,
            per_page: MAX_PER_PAGE,
            max_pages: None,
        }
    }

    /// Items requested per page, clamped to `1..=100`.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Stops after this many pages.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Fetches one page. Any `page`/`per_page` entries in `query` are replaced.
    pub async fn fetch(
        &self,
        path: &str,
        query: &[(String, String)],
        page: u32,
    ) -> Result<Response> {
        let request = Request::get(path)
            .with_query(
                query
                    .iter()
                    .filter(|(key, _)| key != "page" && key != "per_page")
                    .cloned(),
            )
            .with_query([
                ("page".to_string(), page.to_string()),
                ("per_page".to_string(), self.per_page.to_string()),
            ]);
        self.client.send(request).await
    }

    /// Fetches every page and concatenates the items.
    pub async fn fetch_all(&self, path: &str, query: Vec<(String, String)>) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page = 1;
        let mut fetched = 0;

        loop {
            let response = self.fetch(path, &query, page).await?;
            fetched += 1;

            match response.json::<Value>()? {
                Value::Array(values) => items.extend(values),
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "'{}' is not a list endpoint",
                        path
                    )))
                }
            }

            let next = response.pagination().next_page_number();
            debug!(page, next = ?next, total = items.len(), "Fetched result page");

            match next {
                Some(next) if next > page && self.max_pages.map_or(true, |max| fetched < max) => {
                    page = next
                }
                _ => break,
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_headers_are_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert("x-page", HeaderValue::from_static("2"));
        headers.insert("x-per-page", HeaderValue::from_static("20"));
        headers.insert("x-total", HeaderValue::from_static("45"));
        headers.insert("x-total-pages", HeaderValue::from_static("3"));
        headers.insert("x-next-page", HeaderValue::from_static("3"));
        headers.insert("x-prev-page", HeaderValue::from_static("1"));

        let pagination = Pagination::from_headers(&headers);
        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.total, Some(45));
        assert_eq!(pagination.total_pages, Some(3));
        assert_eq!(pagination.next_page_number(), Some(3));
        assert_eq!(pagination.prev_page, Some(1));
    }

    #[test]
    fn test_last_page_has_empty_next() {
        let mut headers = HeaderMap::new();
        headers.insert("x-page", HeaderValue::from_static("3"));
        headers.insert("x-next-page", HeaderValue::from_static(""));
        assert!(!Pagination::from_headers(&headers).has_next());
    }

    #[test]
    fn test_link_header_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://gitlab.com/api/v4/projects?page=1&per_page=3>; rel=\"prev\", \
                 <https://gitlab.com/api/v4/projects?page=3&per_page=3>; rel=\"next\"",
            ),
        );

        let pagination = Pagination::from_headers(&headers);
        assert_eq!(pagination.links.len(), 2);
        assert_eq!(pagination.next_page_number(), Some(3));
    }

    #[tokio::test]
    async fn test_fetch_all_walks_pages() {
        use mockito::Matcher;

        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/api/v4/projects/1/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("state".into(), "opened".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
            ]))
            .with_header("x-next-page", "2")
            .with_body(r#"[{"iid": 1}, {"iid": 2}]"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v4/projects/1/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
            ]))
            .with_header("x-next-page", "")
            .with_body(r#"[{"iid": 3}]"#)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let items = client
            .result_pager()
            .per_page(2)
            .fetch_all(
                "projects/1/issues",
                vec![
                    ("state".to_string(), "opened".to_string()),
                    ("page".to_string(), "9".to_string()),
                ],
            )
            .await
            .unwrap();

        let iids: Vec<u64> = items.iter().filter_map(|i| i["iid"].as_u64()).collect();
        assert_eq!(iids, vec![1, 2, 3]);
        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(client.response_history().len(), 2);
    }

    #[tokio::test]
    async fn test_max_pages_stops_early() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/users")
            .match_query(mockito::Matcher::Any)
            .with_header("x-next-page", "2")
            .with_body("[{}]")
            .expect(1)
            .create_async()
            .await;

        let client = GitlabClient::with_url(&server.url()).unwrap();
        let items = client
            .result_pager()
            .max_pages(1)
            .fetch_all("users", Vec::new())
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        mock.assert_async().await;
    }

    #[test]
    fn test_per_page_is_clamped() {
        let client = GitlabClient::new().unwrap();
        assert_eq!(client.result_pager().per_page(500).per_page, MAX_PER_PAGE);
        assert_eq!(client.result_pager().per_page(0).per_page, 1);
    }

    #[test]
    fn test_no_headers() {
        let pagination = Pagination::from_headers(&HeaderMap::new());
        assert_eq!(pagination, Pagination::default());
        assert!(!pagination.has_next());
    }
}
