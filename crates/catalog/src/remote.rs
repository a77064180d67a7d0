//! Remote source abstraction and its HTTP implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::RemoteError;

/// Default REST endpoint for the game collection.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/games";

/// Boxed future returned by [`RemoteSource`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// A backend holding the durable game collection.
///
/// Payloads are opaque JSON in the backend's own field shape; the store
/// is the only place that encodes or decodes them.
pub trait RemoteSource: Send + Sync {
    /// Fetches the whole collection.
    fn list(&self) -> RemoteFuture<'_, Value>;

    /// Creates a game and returns the backend's copy, including its id.
    fn create(&self, body: &Value) -> RemoteFuture<'_, Value>;

    /// Replaces the game with the given id and returns the backend's copy.
    fn update(&self, id: &str, body: &Value) -> RemoteFuture<'_, Value>;

    /// Deletes the game with the given id.
    fn delete(&self, id: &str) -> RemoteFuture<'_, ()>;
}

/// [`RemoteSource`] over a REST collection endpoint.
///
/// `GET base`, `POST base`, `PUT base/{id}`, `DELETE base/{id}`.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Creates a remote with its own client using the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a remote sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{id}", self.base_url)
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<Value, RemoteError> {
        let response = check_status(send(request).await?)?;
        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteError> {
    request
        .send()
        .await
        .map_err(|e| RemoteError::Transport(e.to_string()))
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        debug!(url = %response.url(), %status, "remote returned error status");
        return Err(RemoteError::Status(status.as_u16()));
    }
    Ok(response)
}

impl RemoteSource for HttpRemote {
    fn list(&self) -> RemoteFuture<'_, Value> {
        Box::pin(async move { self.send_json(self.client.get(self.base_url.as_str())).await })
    }

    fn create(&self, body: &Value) -> RemoteFuture<'_, Value> {
        let request = self.client.post(self.base_url.as_str()).json(body);
        Box::pin(async move { self.send_json(request).await })
    }

    fn update(&self, id: &str, body: &Value) -> RemoteFuture<'_, Value> {
        let request = self.client.put(self.item_url(id)).json(body);
        Box::pin(async move { self.send_json(request).await })
    }

    fn delete(&self, id: &str) -> RemoteFuture<'_, ()> {
        let request = self.client.delete(self.item_url(id));
        Box::pin(async move {
            check_status(send(request).await?)?;
            Ok(())
        })
    }
}
