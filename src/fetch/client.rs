use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Implementations may rewrite it first.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Lets the concrete client stack be picked at runtime, e.g. with or without
/// authentication.
#[async_trait]
impl HttpClient for Box<dyn HttpClient> {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.as_ref().execute(req).await
    }
}
