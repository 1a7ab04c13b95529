use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>`.
///
/// The token is issued by the identity provider in front of the fleet
/// backend. It is validated as a header value once, on construction.
pub struct BearerAuth<C> {
    pub inner: C,
    value: HeaderValue,
}

impl<C> BearerAuth<C> {
    pub fn new(inner: C, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("bearer token is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BearerAuth<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;
    use std::sync::Mutex;

    /// Records the headers of each request before passing it on.
    struct Recorder {
        inner: BasicClient,
        seen: Mutex<Option<reqwest::header::HeaderMap>>,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            *self.seen.lock().unwrap() = Some(req.headers().clone());
            self.inner.execute(req).await
        }
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached() {
        let recorder = Recorder {
            inner: BasicClient::new(),
            seen: Mutex::new(None),
        };
        let client = BearerAuth::new(recorder, "secret").unwrap();
        // Nothing listens on the discard port; only the outgoing headers matter.
        let req = reqwest::Request::new(reqwest::Method::GET, "http://127.0.0.1:9/".parse().unwrap());

        let _ = client.execute(req).await;

        let headers = client.inner.seen.lock().unwrap().clone().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        assert!(BearerAuth::new((), "line\nbreak").is_err());
    }
}
