//
//  gitlab-client
//  http/history.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Append-only record of the exchanges a client has made.
//!
//! [`History`] is a handle onto shared storage: clones observe and append to
//! the same sequence, which is how the [`HistoryPlugin`](super::HistoryPlugin)
//! inside each realized pipeline feeds the history exposed by
//! [`GitlabClient::response_history`](crate::GitlabClient::response_history).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::Method;
use url::Url;

use super::{Request, Response};
use crate::error::Result;

/// The request as it left the pipeline, after every plugin ran.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

/// One request/response pair.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request: RecordedRequest,
    pub response: Response,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Arc<Mutex<Vec<Exchange>>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an exchange.
    pub fn record(&self, request: &Request, response: &Response) -> Result<()> {
        let exchange = Exchange {
            request: RecordedRequest {
                method: request.method().clone(),
                url: request.url()?,
                headers: request.headers().clone(),
            },
            response: response.clone(),
            recorded_at: Utc::now(),
        };
        self.lock().push(exchange);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A snapshot of all exchanges, oldest first.
    pub fn entries(&self) -> Vec<Exchange> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Exchange> {
        self.lock().last().cloned()
    }

    pub fn last_response(&self) -> Option<Response> {
        self.lock().last().map(|e| e.response.clone())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-pushed Vec behind.
    fn lock(&self) -> MutexGuard<'_, Vec<Exchange>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
