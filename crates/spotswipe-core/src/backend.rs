use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BackendError;
use crate::place::{NewPlace, Place, Vote};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// The places backend as seen by the session controller.
#[async_trait::async_trait]
pub trait PlacesApi: Send + Sync + 'static {
    async fn fetch_places(&self) -> Result<Vec<Place>, BackendError>;

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError>;

    async fn vote(&self, token: &str, place_id: u64, vote: Vote) -> Result<(), BackendError>;

    async fn create_place(&self, token: &str, place: &NewPlace) -> Result<Place, BackendError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into `BackendError::Server` carrying the body text.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackendError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl PlacesApi for HttpBackend {
    async fn fetch_places(&self) -> Result<Vec<Place>, BackendError> {
        let url = self.url("/places");
        debug!(%url, "fetching places");

        let response = check(self.client.get(&url).send().await?).await?;
        decode(response).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let url = self.url("/auth/login");
        debug!(%url, username, "logging in");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        decode(check(response).await?).await
    }

    async fn vote(&self, token: &str, place_id: u64, vote: Vote) -> Result<(), BackendError> {
        let url = self.url(&format!("/places/{}/{}", place_id, vote.as_str()));
        debug!(%url, "sending vote");

        let response = self.client.post(&url).bearer_auth(token).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn create_place(&self, token: &str, place: &NewPlace) -> Result<Place, BackendError> {
        let url = self.url("/places");
        debug!(%url, name = %place.name, "creating place");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(place)
            .send()
            .await?;
        decode(check(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:3000/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:3000");
        assert_eq!(backend.url("/places"), "http://localhost:3000/places");
    }

    #[test]
    fn test_login_response_decodes() {
        let body = r#"{"token":"abc","username":"sam"}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.username, "sam");
    }
}
