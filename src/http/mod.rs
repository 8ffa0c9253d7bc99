//
//  gitlab-client
//  http/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transport Pipeline
//!
//! Every API call travels through an ordered chain of [`Plugin`]s wrapped
//! around a [`reqwest::Client`]:
//!
//! ```text
//!  request ──► error ► history ► api_version ► header_defaults ► authentication ► base_uri ──► network
//! response ◄── error ◄ history ◄ api_version ◄ header_defaults ◄ authentication ◄ base_uri ◄──
//! ```
//!
//! Request hooks run in registration order, response hooks in reverse order,
//! so the first plugin registered sees the response last. The error plugin
//! is registered first and therefore turns a non-success status into an
//! [`Error`](crate::Error) only after every other plugin (history included)
//! has observed it.
//!
//! - [`HttpClientBuilder`]: holds the reqwest client and the plugin list
//! - [`HttpClient`]: a realized pipeline that sends [`Request`]s
//! - [`plugins`]: the plugins used by [`GitlabClient`](crate::GitlabClient)
//! - [`history`]: the shared record of past exchanges

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::api::Pagination;
use crate::error::{Error, Result};

pub mod history;
pub mod plugins;

pub use history::{Exchange, History, RecordedRequest};
pub use plugins::{
    ApiVersionPlugin, AuthPlugin, BaseUriPlugin, ErrorPlugin, HeaderDefaultsPlugin, HistoryPlugin,
};

/// One interceptor stage in the transport pipeline.
///
/// Both hooks default to doing nothing. Returning an error from either hook
/// aborts the call and surfaces that error to the caller.
pub trait Plugin: fmt::Debug + Send + Sync {
    /// Stable name identifying the kind of plugin.
    fn name(&self) -> &'static str;

    /// Inspects or rewrites an outgoing request.
    fn on_request(&self, _request: &mut Request) -> Result<()> {
        Ok(())
    }

    /// Inspects a response together with the final request that produced it.
    fn on_response(&self, _request: &Request, _response: &Response) -> Result<()> {
        Ok(())
    }
}

/// An API request before it is resolved against a base URL.
///
/// Paths are relative to the API root; plugins supply the version prefix,
/// credentials and host.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    base_url: Option<Url>,
}

impl Request {
    /// Creates a request for `path`, normalized to start with `/`.
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        Self {
            method,
            path: format!("/{}", path.as_ref().trim_start_matches('/')),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            base_url: None,
        }
    }

    pub fn get(path: impl AsRef<str>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl AsRef<str>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl AsRef<str>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl AsRef<str>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends query parameters.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Serializes `body` as the JSON payload.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn push_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn set_base_url(&mut self, base_url: Url) {
        self.base_url = Some(base_url);
    }

    /// Resolves the absolute URL this request targets.
    ///
    /// The base URL contributes scheme, host, port and any path prefix (so a
    /// GitLab served under `https://example.com/gitlab` works); its own query
    /// and fragment are dropped.
    pub fn url(&self) -> Result<Url> {
        let base = self.base_url.as_ref().ok_or_else(|| {
            Error::invalid_argument(format!("no base URL configured for '{}'", self.path))
        })?;

        let mut url = base.clone();
        let prefix = base.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, self.path));
        url.set_query(None);
        url.set_fragment(None);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

/// A fully read API response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self::new(status, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decodes the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.trim().is_empty() {
            Ok(serde_json::from_value(Value::Null)?)
        } else {
            Ok(serde_json::from_str(&self.body)?)
        }
    }

    /// Pagination metadata from the response headers.
    pub fn pagination(&self) -> Pagination {
        Pagination::from_headers(&self.headers)
    }
}

/// Holds the reqwest client and the ordered plugin list used to build
/// [`HttpClient`]s.
///
/// Pass a pre-configured builder to
/// [`GitlabClient::with_builder`](crate::GitlabClient::with_builder) to add
/// plugins of your own ahead of the client's.
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    http: reqwest::Client,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl HttpClientBuilder {
    /// Creates a builder around a default reqwest client.
    pub fn new() -> Result<Self> {
        Ok(Self::from_client(reqwest::Client::builder().build()?))
    }

    /// Creates a builder around an existing reqwest client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self {
            http,
            plugins: Vec::new(),
        }
    }

    /// Appends a plugin to the end of the chain.
    pub fn add_plugin(&mut self, plugin: impl Plugin + 'static) -> &mut Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Removes every plugin with the given name. Returns whether any was removed.
    pub fn remove_plugin(&mut self, name: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|p| p.name() != name);
        self.plugins.len() != before
    }

    /// Names of the registered plugins, in chain order.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// The underlying reqwest client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Realizes a pipeline from the registered plugins.
    pub fn build(&self) -> HttpClient {
        self.build_with(Vec::new())
    }

    /// Realizes a pipeline from the registered plugins followed by `extra`.
    pub fn build_with(&self, extra: Vec<Arc<dyn Plugin>>) -> HttpClient {
        let mut plugins = self.plugins.clone();
        plugins.extend(extra);
        HttpClient {
            http: self.http.clone(),
            plugins,
        }
    }
}

/// A realized transport pipeline.
///
/// Cheap to clone; holds a snapshot of the plugin chain taken when it was built.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl HttpClient {
    /// Names of the plugins in this pipeline, in chain order.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Sends a request through the pipeline.
    #[instrument(skip_all, fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, mut request: Request) -> Result<Response> {
        for plugin in &self.plugins {
            plugin.on_request(&mut request)?;
        }

        // The URL may carry a private token, so only the path is logged.
        let url = request.url()?;
        debug!(target_path = %url.path(), "Sending GitLab API request");

        let mut builder = self
            .http
            .request(request.method().clone(), url)
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = Response::from_reqwest(builder.send().await?).await?;
        debug!(status = %response.status(), "Received GitLab API response");

        for plugin in self.plugins.iter().rev() {
            plugin.on_response(&request, &response)?;
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_path_is_normalized() {
        assert_eq!(Request::get("projects").path(), "/projects");
        assert_eq!(Request::get("/projects").path(), "/projects");
    }

    #[test]
    fn test_url_requires_base() {
        let err = Request::get("projects").url().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_url_resolution_keeps_base_prefix() {
        let mut request = Request::get("/api/v4/projects").with_query([("page", "2")]);
        request.set_base_url(base("https://example.com/gitlab/"));
        assert_eq!(
            request.url().unwrap().as_str(),
            "https://example.com/gitlab/api/v4/projects?page=2"
        );
    }

    #[test]
    fn test_url_resolution_drops_base_query() {
        let mut request = Request::get("/api/v4/version");
        request.set_base_url(base("http://localhost:8080?x=1#frag"));
        assert_eq!(request.url().unwrap().as_str(), "http://localhost:8080/api/v4/version");
    }

    #[test]
    fn test_encoded_segments_survive() {
        let mut request = Request::get("/api/v4/projects/group%2Fproject");
        request.set_base_url(base("https://gitlab.com"));
        assert_eq!(
            request.url().unwrap().as_str(),
            "https://gitlab.com/api/v4/projects/group%2Fproject"
        );
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = Request::post("projects")
            .with_json(&serde_json::json!({"name": "demo"}))
            .unwrap();
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(request.body().unwrap(), br#"{"name":"demo"}"#);
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let response = Response::new(StatusCode::NO_CONTENT, HeaderMap::new(), "");
        assert_eq!(response.json::<Value>().unwrap(), Value::Null);
    }

    #[test]
    fn test_builder_plugin_management() {
        let mut builder = HttpClientBuilder::from_client(reqwest::Client::new());
        builder
            .add_plugin(ErrorPlugin)
            .add_plugin(ApiVersionPlugin::default());
        assert_eq!(builder.plugin_names(), vec!["error", "api_version"]);

        assert!(builder.remove_plugin("error"));
        assert!(!builder.remove_plugin("error"));
        assert_eq!(builder.build().plugin_names(), vec!["api_version"]);
    }
}
