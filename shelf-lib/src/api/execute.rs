//! Request execution with retry, and the HTTP [`CollectionService`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use url::Url;

use super::CollectionService;
use super::ItemsRequest;
use super::SelectBody;
use super::SortBody;
use super::request::endpoint;
use crate::ShelfClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::ItemId;
use crate::model::ItemPage;

impl ShelfClient {
    /// Sends a request, retrying transient failures per the client's [`crate::retry::RetryConfig`].
    ///
    /// Returns the response only if its status is a success.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let retry_config = &self.inner.retry_config;
        let mut attempts = 0;

        loop {
            let result = self
                .send_request_inner(method.clone(), url.clone(), body.clone())
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    let status_code = status.as_u16();
                    if retry_config.should_retry_status(status_code, attempts) {
                        let wait = if status_code == 429 {
                            parse_retry_after(&response).unwrap_or(retry_config.delay_for(attempts))
                        } else {
                            retry_config.delay_for(attempts)
                        };
                        log::debug!(
                            "{} {} returned {}, retrying in {:?}",
                            method,
                            url.path(),
                            status_code,
                            wait
                        );
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    if status_code == 429 {
                        let retry_after = parse_retry_after(&response);
                        return Err(Error::RateLimit { retry_after });
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Api(ApiError::http(status_code, body)));
                }
                Err(e) => {
                    let is_transport = matches!(
                        &e,
                        Error::Api(ApiError::Network(_)) | Error::Api(ApiError::Timeout(_))
                    );

                    if is_transport && retry_config.should_retry_network(attempts) {
                        let wait = retry_config.delay_for(attempts);
                        log::debug!("{} {} failed ({}), retrying in {:?}", method, url.path(), e, wait);
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    return Err(e);
                }
            }
        }
    }

    /// Inner request method without retry logic.
    async fn send_request_inner(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let mut request = self.inner.http_client.request(method, url);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        request.send().await.map_err(|e| {
            match self.inner.timeout {
                Some(timeout) if e.is_timeout() => Error::Api(ApiError::Timeout(timeout)),
                _ => Error::Api(ApiError::from(e)),
            }
        })
    }

    async fn post_json(&self, path: &str, body: String) -> Result<(), Error> {
        let url = endpoint(&self.inner.base_url, path)?;
        self.request(Method::POST, url, Some(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl CollectionService for ShelfClient {
    async fn list_items(&self, request: &ItemsRequest) -> Result<ItemPage, Error> {
        let url = request.to_url(&self.inner.base_url)?;
        let response = self.request(Method::GET, url, None).await?;

        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), body)))
    }

    async fn select(&self, ids: &[ItemId], selected: bool) -> Result<(), Error> {
        let body = serde_json::to_string(&SelectBody { ids, selected })
            .map_err(|e| ApiError::parse(e.to_string()))?;
        self.post_json("select", body).await
    }

    async fn sort(&self, new_order: &[ItemId]) -> Result<(), Error> {
        let body = serde_json::to_string(&SortBody { new_order })
            .map_err(|e| ApiError::parse(e.to_string()))?;
        self.post_json("sort", body).await
    }
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
