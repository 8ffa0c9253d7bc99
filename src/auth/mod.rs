//
//  gitlab-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! GitLab accepts a token in three places, selected with [`AuthMethod`]:
//!
//! | Method | String | Wire form |
//! |--------|--------|-----------|
//! | [`AuthMethod::UrlToken`] | `url_token` | `?private_token=<token>` (and `&sudo=<user>`) |
//! | [`AuthMethod::HttpToken`] | `http_token` | `PRIVATE-TOKEN: <token>` header (and `SUDO`) |
//! | [`AuthMethod::OauthToken`] | `oauth_token` | `Authorization: Bearer <token>` (and `SUDO`) |
//!
//! The optional sudo actor lets an administrator token act as another user.
//!
//! ## Example
//!
//! ```rust
//! use gitlab_client::auth::{AuthMethod, Authentication};
//!
//! let method: AuthMethod = "oauth_token".parse().unwrap();
//! let auth = Authentication::new("secret", method, Some("jdoe"));
//! assert_eq!(auth.method(), AuthMethod::OauthToken);
//! assert_eq!(auth.sudo(), Some("jdoe"));
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Header carrying a personal access token.
pub const PRIVATE_TOKEN_HEADER: &str = "private-token";

/// Header naming the user an admin token impersonates.
pub const SUDO_HEADER: &str = "sudo";

/// Where the token is placed on outgoing requests.
///
/// The string forms (`url_token`, `http_token`, `oauth_token`) are stable and
/// are what configuration files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Token passed as the `private_token` query parameter.
    #[default]
    UrlToken,
    /// Token passed in the `PRIVATE-TOKEN` header.
    HttpToken,
    /// Token passed as an OAuth2 bearer token.
    OauthToken,
}

impl AuthMethod {
    /// All methods, in declaration order.
    pub const ALL: [AuthMethod; 3] = [Self::UrlToken, Self::HttpToken, Self::OauthToken];

    /// Returns the stable string form of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrlToken => "url_token",
            Self::HttpToken => "http_token",
            Self::OauthToken => "oauth_token",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = Error;

    /// Parses one of the exact strings `url_token`, `http_token`, `oauth_token`.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("unknown authentication method '{}'", s)))
    }
}

/// The single active credential of a [`GitlabClient`](crate::GitlabClient).
///
/// Setting a new one replaces the previous one; credentials never stack.
#[derive(Clone, PartialEq, Eq)]
pub struct Authentication {
    method: AuthMethod,
    token: String,
    sudo: Option<String>,
}

impl Authentication {
    /// Creates a credential descriptor.
    pub fn new(token: impl Into<String>, method: AuthMethod, sudo: Option<&str>) -> Self {
        Self {
            method,
            token: token.into(),
            sudo: sudo.map(str::to_string),
        }
    }

    /// The placement method.
    pub fn method(&self) -> AuthMethod {
        self.method
    }

    /// The raw token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The impersonated user, if any.
    pub fn sudo(&self) -> Option<&str> {
        self.sudo.as_deref()
    }

    /// Query parameters this credential adds to a request.
    ///
    /// Only [`AuthMethod::UrlToken`] uses the query string.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        if self.method != AuthMethod::UrlToken {
            return Vec::new();
        }

        let mut pairs = vec![("private_token".to_string(), self.token.clone())];
        if let Some(sudo) = &self.sudo {
            pairs.push(("sudo".to_string(), sudo.clone()));
        }
        pairs
    }

    /// Writes the headers this credential needs into `headers`.
    ///
    /// Existing values for the same header names are replaced. Fails with
    /// [`Error::InvalidArgument`] if the token or sudo value contains bytes
    /// that are not allowed in a header.
    pub fn apply_headers(&self, headers: &mut HeaderMap) -> Result<()> {
        match self.method {
            AuthMethod::UrlToken => return Ok(()),
            AuthMethod::HttpToken => {
                headers.insert(
                    HeaderName::from_static(PRIVATE_TOKEN_HEADER),
                    header_value(&self.token)?,
                );
            }
            AuthMethod::OauthToken => {
                let mut value = header_value(&format!("Bearer {}", self.token))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        if let Some(sudo) = &self.sudo {
            headers.insert(HeaderName::from_static(SUDO_HEADER), header_value(sudo)?);
        }
        Ok(())
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("method", &self.method)
            .field("token", &"<redacted>")
            .field("sudo", &self.sudo)
            .finish()
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| Error::invalid_argument("credential contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(value)
}
