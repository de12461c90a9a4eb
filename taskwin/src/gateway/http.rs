//! REST gateway over HTTP.
//!
//! Issues the three task operations against a fixed base resource URL:
//! `GET <base>`, `POST <base>`, and `PATCH <base>/<id>/complete`.

use std::time::Duration;

use reqwest::{Client as HttpClient, Method, StatusCode};
use taskwin_proto::codec;
use taskwin_proto::{NewTask, Task, TaskId};
use url::Url;

use super::{GatewayError, TaskGateway};

/// Errors raised while building an [`HttpGateway`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry a path (e.g. `mailto:`).
    #[error("base URL cannot be used as a resource root: {0}")]
    NotHierarchical(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A finished exchange: status plus the full body.
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

/// Gateway that talks to the task service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http_client: HttpClient,
    base_url: Url,
}

impl HttpGateway {
    /// Create a gateway for the given base resource URL.
    ///
    /// `timeout` bounds each exchange end to end; no other deadline applies.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the URL cannot be a resource root or the
    /// HTTP client cannot be built.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, BuildError> {
        if base_url.cannot_be_a_base() {
            return Err(BuildError::NotHierarchical(base_url.to_string()));
        }
        // `/api/tasks/` and `/api/tasks` name the same resource.
        if base_url.path().len() > 1
            && let Ok(mut segments) = base_url.path_segments_mut()
        {
            segments.pop_if_empty();
        }
        let http_client = HttpClient::builder()
            .user_agent(concat!("taskwin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a gateway from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the URL is invalid or the client cannot be built.
    pub fn from_url(base_url: &str, timeout: Duration) -> Result<Self, BuildError> {
        Self::new(Url::parse(base_url)?, timeout)
    }

    /// The resource root this gateway targets.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn complete_url(&self, id: TaskId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string()).push("complete");
        }
        url
    }

    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Reply, GatewayError> {
        let mut request = self.http_client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request failed");
            GatewayError::Transport(e.to_string())
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?
            .to_vec();

        tracing::debug!(%method, %url, status = status.as_u16(), len = body.len(), "exchange finished");
        Ok(Reply { status, body })
    }
}

impl TaskGateway for HttpGateway {
    async fn list_incomplete(&self) -> Result<Vec<Task>, GatewayError> {
        let reply = self.exchange(Method::GET, self.base_url.clone(), None).await?;
        if !reply.status.is_success() {
            return Err(GatewayError::Server {
                status: reply.status.as_u16(),
            });
        }
        codec::decode_task_list(&reply.body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn create(&self, body: &NewTask) -> Result<Option<Task>, GatewayError> {
        let payload =
            codec::encode_new_task(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let reply = self
            .exchange(Method::POST, self.base_url.clone(), Some(payload))
            .await?;
        if !reply.status.is_success() {
            return Err(create_failure(reply.status, &reply.body));
        }
        // The status alone decides acceptance; the echoed task is a bonus.
        match codec::decode_task(&reply.body) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                tracing::warn!(
                    status = reply.status.as_u16(),
                    error = %e,
                    "create accepted without a task body"
                );
                Ok(None)
            }
        }
    }

    async fn complete(&self, id: TaskId) -> Result<(), GatewayError> {
        let reply = self.exchange(Method::PATCH, self.complete_url(id), None).await?;
        if reply.status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !reply.status.is_success() {
            return Err(GatewayError::Server {
                status: reply.status.as_u16(),
            });
        }
        // The body may be empty or the completed task; neither is needed.
        Ok(())
    }
}

/// Classify a failed create: any status with a `detail` reason is a rejection
/// carrying that reason, anything else is a bare server error.
fn create_failure(status: StatusCode, body: &[u8]) -> GatewayError {
    match codec::failure_detail(body) {
        Some(message) => GatewayError::ValidationRejected { message },
        None => GatewayError::Server {
            status: status.as_u16(),
        },
    }
}
