use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use jt_core::bookmark::BookmarkRecord;
use jt_core::ids::UserId;
use jt_core::ports::{RemotePutResponse, RemoteProfileError, RemoteProfilePort};

#[derive(Debug, Deserialize)]
struct BookmarksEnvelope {
    #[serde(default)]
    bookmarks: Option<Vec<BookmarkRecord>>,
}

#[derive(Debug, Serialize)]
struct PutBookmarksBody<'a> {
    bookmarks: &'a [BookmarkRecord],
}

/// Profile service client speaking JSON over HTTP.
///
/// `GET` and `PUT` on `{base_url}/users/{user_id}/bookmarks`.
pub struct HttpRemoteProfileClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpRemoteProfileClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid remote base url: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("remote base url cannot carry a path: {base_url}");
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client failed")?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn bookmarks_url(&self, user_id: &UserId) -> Result<Url, RemoteProfileError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteProfileError::Transport("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["users", user_id.as_str(), "bookmarks"]);
        Ok(url)
    }

    fn map_error(&self, error: reqwest::Error) -> RemoteProfileError {
        if error.is_timeout() {
            RemoteProfileError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if error.is_decode() {
            RemoteProfileError::Decode(error.to_string())
        } else {
            RemoteProfileError::Transport(error.to_string())
        }
    }

    async fn status_error(response: reqwest::Response) -> RemoteProfileError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        RemoteProfileError::Status { status, body }
    }
}

#[async_trait]
impl RemoteProfilePort for HttpRemoteProfileClient {
    async fn get_bookmarks(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError> {
        let url = self.bookmarks_url(user_id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(user_id = %user_id, "Remote profile has no bookmark list");
                Ok(None)
            }
            status if status.is_success() => {
                let envelope: BookmarksEnvelope =
                    response.json().await.map_err(|e| self.map_error(e))?;
                Ok(envelope.bookmarks)
            }
            _ => Err(Self::status_error(response).await),
        }
    }

    async fn put_bookmarks(
        &self,
        user_id: &UserId,
        bookmarks: &[BookmarkRecord],
    ) -> Result<RemotePutResponse, RemoteProfileError> {
        let url = self.bookmarks_url(user_id)?;
        let response = self
            .client
            .put(url)
            .json(&PutBookmarksBody { bookmarks })
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        response.json().await.map_err(|e| self.map_error(e))
    }
}
