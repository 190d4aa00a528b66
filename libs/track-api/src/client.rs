//! Request-scoped REST client for the track service.
//!
//! Every [`RestClient`] owns a memo table of GET responses keyed by method and
//! fully qualified URL. A second GET for a URL that is already in flight awaits
//! the same shared future instead of issuing another request, and a settled
//! response is served from the table for as long as the client lives. Create
//! one client per GraphQL request so nothing leaks between requests.

use std::{collections::HashMap, sync::Arc};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
    lock::Mutex,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteCallError {
    #[error("upstream responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl RemoteCallError {
    fn transport(url: &Url, message: impl ToString) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// The upstream status code, when the upstream answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

type MemoKey = (Method, String);
type PendingResponse = Shared<BoxFuture<'static, Result<Arc<Value>, RemoteCallError>>>;

pub struct RestClient {
    client: Client,
    base_url: Url,
    memoized: Mutex<HashMap<MemoKey, PendingResponse>>,
}

impl RestClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            memoized: Mutex::new(HashMap::new()),
        }
    }

    fn resolve_url(&self, segments: &[&str]) -> Result<Url, RemoteCallError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteCallError::transport(&self.base_url, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str]) -> Result<Arc<Value>, RemoteCallError> {
        let url = self.resolve_url(segments)?;
        let key = (Method::GET, url.to_string());

        // Lookup and registration happen under one lock with no await between
        // them, so two callers can never both start a request for the same key.
        let pending = {
            let mut memoized = self.memoized.lock().await;
            match memoized.get(&key) {
                Some(pending) => {
                    tracing::debug!("Reusing memoized response for GET {}", url);
                    pending.clone()
                }
                None => {
                    tracing::debug!("Sending GET {}", url);
                    let pending = send(self.client.get(url.clone()), url).boxed().shared();
                    memoized.insert(key.clone(), pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;
        if result.is_err() {
            let mut memoized = self.memoized.lock().await;
            if memoized
                .get(&key)
                .is_some_and(|current| current.ptr_eq(&pending))
            {
                tracing::debug!("Evicting failed GET {} from the memo table", key.1);
                memoized.remove(&key);
            }
        }
        result
    }

    pub async fn patch(&self, segments: &[&str]) -> Result<Arc<Value>, RemoteCallError> {
        let url = self.resolve_url(segments)?;
        self.memoized
            .lock()
            .await
            .remove(&(Method::GET, url.to_string()));

        tracing::debug!("Sending PATCH {}", url);
        send(self.client.patch(url.clone()), url).await
    }
}

async fn send(request: RequestBuilder, url: Url) -> Result<Arc<Value>, RemoteCallError> {
    let response = request
        .send()
        .await
        .map_err(|e| RemoteCallError::transport(&url, e))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RemoteCallError::transport(&url, e))?;

    if !status.is_success() {
        tracing::warn!("Upstream responded with {} for {}", status, url);
        return Err(RemoteCallError::Status { status, body });
    }

    // Plain-text bodies are handed up as a JSON string.
    let value = serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body));
    Ok(Arc::new(value))
}
