use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes HTTP requests. Implementations may decorate requests (headers,
/// query parameters) before handing them to an inner client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
