//
//  gitlab-client
//  http/plugins.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline plugins used by [`GitlabClient`](crate::GitlabClient).

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::warn;
use url::Url;

use super::{history::History, Plugin, Request, Response};
use crate::auth::Authentication;
use crate::error::{Error, Result};

/// Path prefix of the GitLab REST API v4.
pub const API_V4_PREFIX: &str = "/api/v4/";

/// Turns non-success responses into typed errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPlugin;

impl Plugin for ErrorPlugin {
    fn name(&self) -> &'static str {
        "error"
    }

    fn on_response(&self, request: &Request, response: &Response) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }

        warn!(
            status = %response.status(),
            method = %request.method(),
            path = %request.path(),
            "GitLab API returned an error status"
        );
        Err(Error::from_response(response))
    }
}

/// Records every exchange into a shared [`History`].
#[derive(Debug, Clone)]
pub struct HistoryPlugin {
    history: History,
}

impl HistoryPlugin {
    pub fn new(history: History) -> Self {
        Self { history }
    }
}

impl Plugin for HistoryPlugin {
    fn name(&self) -> &'static str {
        "history"
    }

    fn on_response(&self, request: &Request, response: &Response) -> Result<()> {
        self.history.record(request, response)
    }
}

/// Prefixes request paths with the API version root.
#[derive(Debug, Clone)]
pub struct ApiVersionPlugin {
    prefix: String,
}

impl ApiVersionPlugin {
    /// Uses a custom prefix such as `/api/v3/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: format!("/{}/", prefix.trim_matches('/')),
        }
    }
}

impl Default for ApiVersionPlugin {
    fn default() -> Self {
        Self::new(API_V4_PREFIX)
    }
}

impl Plugin for ApiVersionPlugin {
    fn name(&self) -> &'static str {
        "api_version"
    }

    fn on_request(&self, request: &mut Request) -> Result<()> {
        if !request.path().starts_with(&self.prefix) {
            let path = format!("{}{}", self.prefix, request.path().trim_start_matches('/'));
            request.set_path(path);
        }
        Ok(())
    }
}

/// Sets headers the request does not already carry.
#[derive(Debug, Clone)]
pub struct HeaderDefaultsPlugin {
    headers: HeaderMap,
}

impl HeaderDefaultsPlugin {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Sends `User-Agent: gitlab-client/<version>`.
    pub fn user_agent() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(crate::USER_AGENT));
        Self::new(headers)
    }
}

impl Plugin for HeaderDefaultsPlugin {
    fn name(&self) -> &'static str {
        "header_defaults"
    }

    fn on_request(&self, request: &mut Request) -> Result<()> {
        for (name, value) in &self.headers {
            if !request.headers().contains_key(name) {
                request.headers_mut().insert(name.clone(), value.clone());
            }
        }
        Ok(())
    }
}

/// Applies an [`Authentication`] to outgoing requests.
#[derive(Debug, Clone)]
pub struct AuthPlugin {
    auth: Authentication,
}

impl AuthPlugin {
    pub fn new(auth: Authentication) -> Self {
        Self { auth }
    }
}

impl Plugin for AuthPlugin {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn on_request(&self, request: &mut Request) -> Result<()> {
        for (key, value) in self.auth.query_pairs() {
            request.push_query(key, value);
        }
        self.auth.apply_headers(request.headers_mut())
    }
}

/// Points requests at a GitLab host.
#[derive(Debug, Clone)]
pub struct BaseUriPlugin {
    base_url: Url,
}

impl BaseUriPlugin {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }
}

impl Plugin for BaseUriPlugin {
    fn name(&self) -> &'static str {
        "base_uri"
    }

    fn on_request(&self, request: &mut Request) -> Result<()> {
        request.set_base_url(self.base_url.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::auth::AuthMethod;

    #[test]
    fn test_api_version_prefix_applied_once() {
        let plugin = ApiVersionPlugin::default();
        let mut request = Request::get("projects/1");
        plugin.on_request(&mut request).unwrap();
        assert_eq!(request.path(), "/api/v4/projects/1");

        plugin.on_request(&mut request).unwrap();
        assert_eq!(request.path(), "/api/v4/projects/1");
    }

    #[test]
    fn test_custom_api_version_prefix() {
        let plugin = ApiVersionPlugin::new("api/v3");
        let mut request = Request::get("/users");
        plugin.on_request(&mut request).unwrap();
        assert_eq!(request.path(), "/api/v3/users");
    }

    #[test]
    fn test_header_defaults_do_not_override() {
        let plugin = HeaderDefaultsPlugin::user_agent();

        let mut plain = Request::get("version");
        plugin.on_request(&mut plain).unwrap();
        assert_eq!(plain.headers().get(USER_AGENT).unwrap(), crate::USER_AGENT);

        let mut custom = Request::get("version");
        custom
            .headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static("my-tool/1.0"));
        plugin.on_request(&mut custom).unwrap();
        assert_eq!(custom.headers().get(USER_AGENT).unwrap(), "my-tool/1.0");
    }

    #[test]
    fn test_url_token_appends_to_existing_query() {
        let plugin = AuthPlugin::new(Authentication::new("t", AuthMethod::UrlToken, None));
        let mut request = Request::get("projects").with_query([("search", "demo")]);
        request.set_base_url(Url::parse("https://gitlab.com").unwrap());
        plugin.on_request(&mut request).unwrap();
        assert_eq!(
            request.url().unwrap().as_str(),
            "https://gitlab.com/projects?search=demo&private_token=t"
        );
    }

    #[test]
    fn test_error_plugin() {
        let request = Request::get("projects/1");
        let ok = Response::new(StatusCode::OK, HeaderMap::new(), "{}");
        assert!(ErrorPlugin.on_response(&request, &ok).is_ok());

        let missing = Response::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            r#"{"message":"404 Project Not Found"}"#,
        );
        match ErrorPlugin.on_response(&request, &missing) {
            Err(Error::NotFound(message)) => assert_eq!(message, "404 Project Not Found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit_reads_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("30"));
        let response = Response::new(StatusCode::TOO_MANY_REQUESTS, headers, "");
        match ErrorPlugin.on_response(&Request::get("x"), &response) {
            Err(Error::RateLimited { retry_after }) => {
                assert_eq!(retry_after, Some(std::time::Duration::from_secs(30)))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
