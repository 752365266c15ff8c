//! The HTTP capability the client sends requests through.

use std::{future::Future, sync::Arc, time::Duration};

use reqwest::StatusCode;

use crate::{
    error::{Result, SdkError, TransportError},
    request::PreparedRequest,
};

/// Status and fully read body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Sends a prepared request and reads the complete response body.
///
/// Implementations own retries, timeouts and cancellation; whatever they give
/// up on is reported as a [`TransportError`]. The body must be read to the
/// end before returning so that the connection is released by the time the
/// caller sees the response.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: PreparedRequest,
    ) -> impl Future<Output = std::result::Result<RawResponse, TransportError>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn send(
        &self,
        request: PreparedRequest,
    ) -> impl Future<Output = std::result::Result<RawResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SdkError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, keeping its pool, proxy and TLS settings.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: PreparedRequest,
    ) -> std::result::Result<RawResponse, TransportError> {
        let PreparedRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        // Consumes the response; the connection goes back to the pool here
        // or is dropped with the error.
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Runs prepared requests through an [`HttpTransport`].
///
/// Failures are surfaced exactly once and never retried here.
#[derive(Debug, Clone)]
pub struct Executor<H> {
    http: H,
}

impl<H: HttpTransport> Executor<H> {
    #[must_use]
    pub fn new(http: H) -> Self {
        Self { http }
    }

    #[must_use]
    pub fn transport(&self) -> &H {
        &self.http
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: PreparedRequest) -> Result<RawResponse> {
        trace!("sending request");
        match self.http.send(request).await {
            Ok(response) => {
                debug!(
                    status = %response.status,
                    bytes = response.body.len(),
                    "received response"
                );
                Ok(response)
            }
            Err(e) => {
                error!(kind = ?e.kind, "transport failure: {}", e);
                Err(e.into())
            }
        }
    }
}
