//! reqwest client for the Distribution API.
//!
//! On native targets the client keeps its own cookie jar so the session
//! cookie set by `POST /api/login` is replayed on later calls. In the browser
//! the fetch API does the same once credentials are included.

use async_trait::async_trait;
use portal_wire::{CheckAuthResponse, LoginRequest};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{AuthService, DataService, Query, Resource};
use crate::error::ApiError;

/// HTTP implementation of [`DataService`] and [`AuthService`].
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        // API paths are joined below the base path, which must end in `/`
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        #[cfg(target_arch = "wasm32")]
        let client = {
            // the browser enforces its own fetch timeouts
            let _ = timeout;
            Client::new()
        };

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str, query: Option<&Query>) -> Result<Url, ApiError> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    fn entity_path(resource: Resource, id: &str) -> String {
        format!("{}/{}", resource.path(), urlencoding::encode(id))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Map a non-success response to an [`ApiError`], pulling the API's
    /// `{ "error": "..." }` message out of the body when present.
    async fn check(response: Response, resource: Option<(Resource, &str)>) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some((resource, id)) = resource {
                return Err(ApiError::NotFound {
                    resource: resource.name().to_string(),
                    id: id.to_string(),
                });
            }
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait(?Send)]
impl DataService for HttpApi {
    async fn list(&self, resource: Resource, query: &Query) -> Result<Vec<Value>, ApiError> {
        let url = self.url(resource.path(), Some(query))?;
        debug!(%url, "GET list");
        let response = self.send(self.client.get(url)).await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        let url = self.url(&Self::entity_path(resource, id), None)?;
        debug!(%url, "GET entity");
        let response = self.send(self.client.get(url)).await?;
        let response = Self::check(response, Some((resource, id))).await?;
        Self::decode(response).await
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(resource.path(), None)?;
        debug!(%url, "POST");
        let response = self.send(self.client.post(url).json(body)).await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(&Self::entity_path(resource, id), None)?;
        debug!(%url, "PUT");
        let response = self.send(self.client.put(url).json(body)).await?;
        let response = Self::check(response, Some((resource, id))).await?;
        Self::decode(response).await
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        let url = self.url(&Self::entity_path(resource, id), None)?;
        debug!(%url, "DELETE");
        let response = self.send(self.client.delete(url)).await?;
        Self::check(response, Some((resource, id))).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl AuthService for HttpApi {
    async fn check_auth(&self) -> Result<CheckAuthResponse, ApiError> {
        let url = self.url("/api/check-auth", None)?;
        let response = self.send(self.client.get(url)).await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let url = self.url("/api/login", None)?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        // The API answers with a redirect to the landing page; the body is
        // irrelevant, only the session cookie matters.
        let response = self.send(self.client.post(url).json(&body)).await?;
        if response.status().is_redirection() {
            return Ok(());
        }
        Self::check(response, None).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.url("/api/logout", None)?;
        let response = self.send(self.client.post(url)).await?;
        if response.status().is_redirection() {
            return Ok(());
        }
        Self::check(response, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        HttpApi::new("http://localhost:3000", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_list_url_carries_query() {
        let mut query = Query::new();
        query.insert("driverId".into(), "7".into());
        let url = api().url(Resource::Deliveries.path(), Some(&query)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/deliveries?driverId=7");
    }

    #[test]
    fn test_empty_query_adds_no_question_mark() {
        let url = api().url(Resource::Payments.path(), Some(&Query::new())).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/payments");
    }

    #[test]
    fn test_entity_path_encodes_id() {
        assert_eq!(
            HttpApi::entity_path(Resource::Drivers, "VEH 1"),
            "/api/drivers/VEH%201"
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        for base in ["http://host/portal", "http://host/portal/"] {
            let api = HttpApi::new(base, Duration::from_secs(1)).unwrap();
            let url = api.url(Resource::CustomerFeedbacks.path(), None).unwrap();
            assert_eq!(url.as_str(), "http://host/portal/api/customer-feedbacks");
        }
        let url = api().url("/api/check-auth", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/check-auth");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpApi::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
