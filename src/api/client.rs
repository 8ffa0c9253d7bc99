//
//  gitlab-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # GitLab Client
//!
//! [`GitlabClient`] wires the transport pipeline and hands out resource
//! sub-clients.
//!
//! ## Features
//!
//! - Error translation, history capture, API version prefix and `User-Agent`
//!   registered on construction, in that order
//! - One active credential and one active base URL, each replaced wholesale
//! - A fresh pipeline realized for every call, so configuration changes apply
//!   to the next request
//! - Lookup of sub-clients by name or through typed accessors

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use super::{
    Api, DeployKeys, Groups, IssueBoards, Issues, Jobs, Keys, MergeRequests, Milestones,
    Namespaces, Projects, Repositories, ResourceGroup, ResultPager, Snippets, SystemHooks, Tags,
    Users, Version,
};
use crate::auth::{AuthMethod, Authentication};
use crate::config::HostConfig;
use crate::error::{Error, Result};
use crate::http::{
    ApiVersionPlugin, AuthPlugin, BaseUriPlugin, ErrorPlugin, HeaderDefaultsPlugin, History,
    HistoryPlugin, HttpClient, HttpClientBuilder, Plugin, Request, Response,
};

/// Base URL used until [`GitlabClient::set_url`] is called.
pub const DEFAULT_URL: &str = "https://gitlab.com";

/// The main client for the GitLab REST API.
///
/// The client owns an [`HttpClientBuilder`] holding the fixed part of the
/// pipeline, a shared [`History`], and two single-value slots: the active
/// [`Authentication`] and the base URL. Changing either slot replaces the
/// previous value; there is never more than one of each.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use gitlab_client::GitlabClient;
///
/// // https://gitlab.com
/// let client = GitlabClient::new()?;
///
/// // A self-managed instance
/// let client = GitlabClient::with_url("https://gitlab.example.com")?;
///
/// // A custom transport
/// let http = reqwest::Client::builder().build()?;
/// let client = GitlabClient::with_http_client(http)?;
/// # Ok::<(), gitlab_client::Error>(())
/// ```
///
/// # Configuration Changes
///
/// [`authenticate`](Self::authenticate) and [`set_url`](Self::set_url)
/// return the same client, so calls chain:
///
/// ```rust,no_run
/// use gitlab_client::{AuthMethod, GitlabClient};
///
/// let mut client = GitlabClient::new()?;
/// client
///     .set_url("https://gitlab.example.com")?
///     .authenticate("glpat-xxxx", AuthMethod::HttpToken, None);
/// # Ok::<(), gitlab_client::Error>(())
/// ```
///
/// # Sharing
///
/// Both mutators take `&mut self`, so the borrow checker rules out a
/// configuration change racing a request. The client is `Send + Sync`; wrap it
/// in an `Arc` to issue requests from several tasks.
#[derive(Debug, Clone)]
pub struct GitlabClient {
    builder: HttpClientBuilder,
    history: History,
    auth: Option<Authentication>,
    base_url: Url,
}

impl GitlabClient {
    /// Creates a client for `https://gitlab.com` with a default transport.
    pub fn new() -> Result<Self> {
        Self::with_builder(HttpClientBuilder::new()?)
    }

    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedUri`] if `url` is not a usable base URL.
    pub fn with_url(url: &str) -> Result<Self> {
        let mut client = Self::new()?;
        client.set_url(url)?;
        Ok(client)
    }

    /// Creates a client around a pre-configured reqwest client.
    ///
    /// Use this to control timeouts, proxies or TLS settings.
    pub fn with_http_client(http: reqwest::Client) -> Result<Self> {
        Self::with_builder(HttpClientBuilder::from_client(http))
    }

    /// Creates a client around a pre-configured pipeline builder.
    ///
    /// Plugins already registered on `builder` run before the client's own.
    /// The client then appends, in this order:
    ///
    /// 1. [`ErrorPlugin`]
    /// 2. [`HistoryPlugin`]
    /// 3. [`ApiVersionPlugin`]
    /// 4. [`HeaderDefaultsPlugin`] (`User-Agent`)
    ///
    /// and sets the base URL to [`DEFAULT_URL`].
    pub fn with_builder(mut builder: HttpClientBuilder) -> Result<Self> {
        let history = History::new();

        builder
            .add_plugin(ErrorPlugin)
            .add_plugin(HistoryPlugin::new(history.clone()))
            .add_plugin(ApiVersionPlugin::default())
            .add_plugin(HeaderDefaultsPlugin::user_agent());

        Ok(Self {
            builder,
            history,
            auth: None,
            base_url: parse_base_url(DEFAULT_URL)?,
        })
    }

    /// Creates a client from a host entry of the configuration file.
    ///
    /// Applies the entry's timeout, URL and (when a token is present)
    /// credentials.
    ///
    /// ```rust,no_run
    /// use gitlab_client::config::Config;
    /// use gitlab_client::GitlabClient;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::load()?;
    /// let host = config.default_host_config()?;
    /// let client = GitlabClient::from_config(&host)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &HostConfig) -> Result<Self> {
        let mut http = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            http = http.timeout(Duration::from_secs(secs));
        }

        let mut client = Self::with_http_client(http.build()?)?;
        client.set_url(&config.url)?;
        if let Some(token) = &config.token {
            client.authenticate(token.clone(), config.auth_method, config.sudo.as_deref());
        }
        Ok(client)
    }

    /// Sets the credential used for every subsequent request.
    ///
    /// Any previously configured credential is discarded. The token format is
    /// not checked; use [`AuthMethod::from_str`](std::str::FromStr) to parse a
    /// method from configuration text.
    ///
    /// # Parameters
    ///
    /// * `token` - A personal, project, group or OAuth access token
    /// * `method` - Where to place the token, see [`AuthMethod`]
    /// * `sudo` - Username or id to impersonate (admin tokens only)
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::{AuthMethod, GitlabClient};
    ///
    /// let mut client = GitlabClient::new()?;
    /// client.authenticate("old-token", AuthMethod::UrlToken, None);
    /// client.authenticate("new-token", AuthMethod::OauthToken, Some("jdoe"));
    /// assert_eq!(client.authentication().unwrap().token(), "new-token");
    /// # Ok::<(), gitlab_client::Error>(())
    /// ```
    #[instrument(skip(self, token))]
    pub fn authenticate(
        &mut self,
        token: impl Into<String>,
        method: AuthMethod,
        sudo: Option<&str>,
    ) -> &mut Self {
        self.auth = Some(Authentication::new(token, method, sudo));
        debug!("Authentication configured");
        self
    }

    /// Removes the active credential.
    pub fn clear_authentication(&mut self) -> &mut Self {
        self.auth = None;
        self
    }

    /// Replaces the base URL requests are sent to.
    ///
    /// A path component is kept as a prefix, so GitLab instances served under
    /// a sub-path (`https://example.com/gitlab`) work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedUri`] if `url` cannot be parsed, or is not an
    /// `http`/`https` URL that can carry a path. The previous URL stays active.
    #[instrument(skip(self))]
    pub fn set_url(&mut self, url: &str) -> Result<&mut Self> {
        self.base_url = parse_base_url(url)?;
        debug!("Base URL updated");
        Ok(self)
    }

    /// The active base URL.
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    /// The active credential, if any.
    pub fn authentication(&self) -> Option<&Authentication> {
        self.auth.as_ref()
    }

    /// The builder holding the fixed part of the pipeline.
    pub fn http_client_builder(&self) -> &HttpClientBuilder {
        &self.builder
    }

    /// Realizes the transport pipeline for the current configuration.
    ///
    /// A new pipeline is built on every call from the builder's plugins
    /// followed by the authentication plugin (when a credential is set) and
    /// the base URL plugin. Building is cheap; the reqwest client and its
    /// connection pool are shared.
    pub fn http_client(&self) -> HttpClient {
        let mut extra: Vec<Arc<dyn Plugin>> = Vec::with_capacity(2);
        if let Some(auth) = &self.auth {
            extra.push(Arc::new(AuthPlugin::new(auth.clone())));
        }
        extra.push(Arc::new(BaseUriPlugin::new(self.base_url.clone())));
        self.builder.build_with(extra)
    }

    /// The shared record of every exchange made by this client.
    ///
    /// Keeps growing for the lifetime of the client; clones of the client
    /// share it.
    pub fn response_history(&self) -> &History {
        &self.history
    }

    /// Sends a prepared request through the pipeline.
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.http_client().send(request).await
    }

    /// Makes a GET request and decodes the JSON response.
    ///
    /// The path is relative to the API root, e.g. `projects/42/issues`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, Vec::new()).await
    }

    /// Makes a GET request with query parameters and decodes the JSON response.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        self.send(Request::get(path).with_query(query))
            .await?
            .json()
    }

    /// Makes a GET request and returns the body as text.
    ///
    /// Used for raw file contents, job traces and snippet content.
    pub async fn get_raw(&self, path: &str, query: Vec<(String, String)>) -> Result<String> {
        let response = self.send(Request::get(path).with_query(query)).await?;
        Ok(response.text().to_string())
    }

    /// Makes a POST request with a JSON body and decodes the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(Request::post(path).with_json(body)?)
            .await?
            .json()
    }

    /// Makes a POST request without a body and decodes the JSON response.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Request::post(path)).await?.json()
    }

    /// Makes a PUT request with a JSON body and decodes the JSON response.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(Request::put(path).with_json(body)?)
            .await?
            .json()
    }

    /// Makes a DELETE request and decodes the JSON response, if any.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Request::delete(path)).await?.json()
    }

    /// Returns a pager for walking list endpoints.
    pub fn result_pager(&self) -> ResultPager<'_> {
        ResultPager::new(self)
    }

    /// Returns a new sub-client for a resource group name.
    ///
    /// See the [module documentation](super) for the name table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] carrying the name if it is not in
    /// the table. The client is not modified.
    pub fn api(&self, name: &str) -> Result<Api<'_>> {
        Ok(Api::new(ResourceGroup::from_name(name)?, self))
    }

    /// Instance-wide deploy keys (`/deploy_keys`).
    pub fn deploy_keys(&self) -> DeployKeys<'_> {
        DeployKeys::new(self)
    }

    /// Groups and subgroups (`/groups`).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let group = client.groups().show("gitlab-org").await?;
    /// println!("{}", group["full_name"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    /// Issues (`/issues`, `/projects/:id/issues`).
    ///
    /// Same as `api("issues")`, without the name lookup or the `Result`.
    pub fn issues(&self) -> Issues<'_> {
        Issues::new(self)
    }

    /// Project issue boards (`/projects/:id/boards`).
    pub fn issue_boards(&self) -> IssueBoards<'_> {
        IssueBoards::new(self)
    }

    /// CI/CD jobs and their logs (`/projects/:id/jobs`).
    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(self)
    }

    /// Merge requests (`/projects/:id/merge_requests`).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab_client::api::merge_requests::MergeRequestFilter;
    /// use gitlab_client::GitlabClient;
    ///
    /// # async fn example() -> gitlab_client::Result<()> {
    /// let client = GitlabClient::new()?;
    /// let open = MergeRequestFilter {
    ///     state: Some("opened".to_string()),
    ///     ..Default::default()
    /// };
    /// for mr in client.merge_requests().all("group/app", &open).await? {
    ///     println!("!{} {}", mr.iid, mr.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge_requests(&self) -> MergeRequests<'_> {
        MergeRequests::new(self)
    }

    /// Project milestones (`/projects/:id/milestones`).
    pub fn milestones(&self) -> Milestones<'_> {
        Milestones::new(self)
    }

    /// User and group namespaces (`/namespaces`).
    pub fn namespaces(&self) -> Namespaces<'_> {
        Namespaces::new(self)
    }

    /// Projects and their members, hooks, pipelines, deploy keys and
    /// variables (`/projects`).
    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    /// Branches, commits, trees and files (`/projects/:id/repository`).
    pub fn repositories(&self) -> Repositories<'_> {
        Repositories::new(self)
    }

    /// Project snippets (`/projects/:id/snippets`).
    pub fn snippets(&self) -> Snippets<'_> {
        Snippets::new(self)
    }

    /// System hooks (`/hooks`).
    ///
    /// # Notes
    ///
    /// Every call needs an administrator token.
    pub fn system_hooks(&self) -> SystemHooks<'_> {
        SystemHooks::new(self)
    }

    /// Users and SSH keys (`/users`, `/user`).
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// SSH key lookup by id or fingerprint (`/keys`).
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self)
    }

    /// Tags and release notes (`/projects/:id/repository/tags`).
    pub fn tags(&self) -> Tags<'_> {
        Tags::new(self)
    }

    /// Instance version (`/version`).
    pub fn version(&self) -> Version<'_> {
        Version::new(self)
    }
}

fn parse_base_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::malformed_uri(url, e))?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::malformed_uri(url, "expected an http or https base URL"));
    }
    Ok(parsed)
}
