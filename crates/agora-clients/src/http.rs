//! Shared reqwest transport with retry for transient errors.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::HttpSettings;
use crate::error::{ClientError, ClientResult, error_message};

/// Whether a request may be sent again after a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Retry network errors and 5xx responses with exponential backoff.
    Transient,
    /// Send once. Used for requests that are not safe to repeat.
    Never,
}

/// reqwest client plus the retry policy from [`HttpSettings`].
pub struct HttpClient {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: settings.max_retries,
            retry_base_delay: settings.retry_base_delay,
        })
    }

    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn backoff(&self, attempt: u8) -> Duration {
        self.retry_base_delay * 2u32.pow(u32::from(attempt.saturating_sub(1)))
    }

    /// Send the request built by `build`, returning the body of a 2xx response.
    ///
    /// `build` is called once per attempt because multipart bodies cannot be
    /// cloned.
    pub async fn send<F>(&self, retry: Retry, build: F) -> ClientResult<String>
    where
        F: Fn(&reqwest::Client) -> ClientResult<reqwest::RequestBuilder> + Send + Sync,
    {
        let attempts = match retry {
            Retry::Transient => self.max_retries,
            Retry::Never => 0,
        };
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..=attempts {
            if attempt > 0 {
                tokio::time::sleep(self.backoff(attempt)).await;
            }

            match build(&self.client)?.send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await?;
                    if status.is_success() {
                        return Ok(body);
                    }

                    let err = ClientError::ApiRequestFailed {
                        status: status.as_u16(),
                        message: error_message(&body),
                    };
                    if status.is_server_error() && attempt < attempts {
                        tracing::debug!(
                            status = status.as_u16(),
                            attempt,
                            "Retrying provider request"
                        );
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    if attempt < attempts && (e.is_timeout() || e.is_connect() || e.is_request()) {
                        tracing::debug!(error = %e, attempt, "Retrying provider request");
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::invalid("request was never sent")))
    }

    /// [`send`](Self::send) and decode the JSON body.
    pub async fn send_json<T, F>(&self, retry: Retry, build: F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> ClientResult<reqwest::RequestBuilder> + Send + Sync,
    {
        let body = self.send(retry, build).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Join a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.openai.com/v1/", "/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(join_url("http://x", "users"), "http://x/users");
    }

    #[test]
    fn test_backoff_doubles() {
        let client = HttpClient::new(
            &HttpSettings::default().with_retry_delay(Duration::from_millis(100)),
        )
        .unwrap();
        assert_eq!(client.backoff(1), Duration::from_millis(100));
        assert_eq!(client.backoff(2), Duration::from_millis(200));
        assert_eq!(client.backoff(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = HttpClient::new(&HttpSettings::default().with_max_retries(0)).unwrap();
        let err = client
            .send(Retry::Transient, |c| Ok(c.get("http://127.0.0.1:9/unreachable")))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
