//! HTTP GET as a protected operation

use backoff_breaker::Circuit;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failures of a single GET
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("request cancelled")]
    Cancelled,
}

/// GETs a fixed URL and returns the body as a string
#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: reqwest::Client,
    url: String,
}

impl HttpFetch {
    /// Client with a whole-request `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get(&self) -> Result<String, FetchError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(resp.text().await?)
    }
}

impl Circuit for HttpFetch {
    type Output = String;
    type Error = FetchError;

    fn call(
        &self,
        ctx: CancellationToken,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            tokio::select! {
                biased;
                _ = ctx.cancelled() => Err(FetchError::Cancelled),
                result = self.get() => result,
            }
        }
    }
}
