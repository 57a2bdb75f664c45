use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// Wrappers nest, so a store wanting both an `apikey` header and a bearer
/// token is served by `ApiKey::bearer(ApiKey::new(inner, "apikey", key)?, key)?`.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sends `key` verbatim in the `header_name` header.
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .with_context(|| format!("invalid header name '{header_name}'"))?;
        let mut value = HeaderValue::from_str(key).context("API key is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// Convenience constructor that uses `Authorization: Bearer <key>`.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, AUTHORIZATION.as_str(), &format!("Bearer {key}"))
    }

    /// Sets the header on `req`, replacing any previous value.
    pub fn apply(&self, req: &mut reqwest::Request) {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.apply(&mut req);
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    fn request() -> reqwest::Request {
        reqwest::Request::new(
            reqwest::Method::GET,
            "https://example.supabase.co/rest/v1/transport_modes".parse().unwrap(),
        )
    }

    #[test]
    fn test_bearer_header() {
        let client = ApiKey::bearer(BasicClient::new(), "secret").unwrap();
        let mut req = request();
        client.apply(&mut req);
        assert_eq!(req.headers()["authorization"], "Bearer secret");
        assert!(req.headers()["authorization"].is_sensitive());
    }

    #[test]
    fn test_custom_header() {
        let client = ApiKey::new(BasicClient::new(), "apikey", "anon").unwrap();
        let mut req = request();
        client.apply(&mut req);
        assert_eq!(req.headers()["apikey"], "anon");
    }

    #[test]
    fn test_rejects_invalid_header_name() {
        assert!(ApiKey::new(BasicClient::new(), "bad header", "k").is_err());
    }

    #[test]
    fn test_rejects_invalid_key() {
        assert!(ApiKey::new(BasicClient::new(), "apikey", "line\nbreak").is_err());
    }
}
