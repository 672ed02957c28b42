//! HTTP client for the species API.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use rainforest_auth::User;
use rainforest_core::SpeciesId;
use rainforest_inventory::{Species, SpeciesFilter, SpeciesInput};

use crate::error::ClientError;

/// Operations the dashboard needs from the server.
#[async_trait]
pub trait SpeciesBackend: Send + Sync {
    async fn list(&self, filter: &SpeciesFilter) -> Result<Vec<Species>, ClientError>;
    async fn create(&self, input: &SpeciesInput) -> Result<Species, ClientError>;
    async fn update(&self, id: SpeciesId, input: &SpeciesInput) -> Result<Species, ClientError>;
    /// `None` sends `null`, which the server rejects.
    async fn update_quantity(&self, id: SpeciesId, quantity: Option<i64>) -> Result<Species, ClientError>;
    async fn delete(&self, id: SpeciesId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct QuantityBody {
    quantity: Option<i64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Thin reqwest wrapper; attaches the bearer token when one is set.
#[derive(Debug, Clone)]
pub struct SpeciesApi {
    api_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl SpeciesApi {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.api_url);
        matches!(self.http.get(&url).send().await, Ok(r) if r.status().is_success())
    }

    /// Log in and keep the returned token for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, ClientError> {
        let req = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&Credentials { username, password });
        let session: Session = decode(send(req).await?).await?;
        self.token = Some(session.token);
        Ok(session.user)
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        let req = self.authed(self.http.get(self.url("/api/auth/me")));
        decode(send(req).await?).await
    }

    pub async fn get(&self, id: SpeciesId) -> Result<Species, ClientError> {
        let req = self.authed(self.http.get(self.url(&format!("/api/species/{id}"))));
        decode(send(req).await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Query pairs for a filter; unset criteria are left out entirely.
pub fn filter_params(filter: &SpeciesFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(search) = &filter.search {
        params.push(("search", search.clone()));
    }
    if let Some(kind) = filter.kind {
        params.push(("type", kind.as_str().to_string()));
    }
    if let Some(status) = filter.status {
        params.push(("status", status.as_str().to_string()));
    }
    params
}

#[async_trait]
impl SpeciesBackend for SpeciesApi {
    async fn list(&self, filter: &SpeciesFilter) -> Result<Vec<Species>, ClientError> {
        let req = self
            .authed(self.http.get(self.url("/api/species")))
            .query(&filter_params(filter));
        decode(send(req).await?).await
    }

    async fn create(&self, input: &SpeciesInput) -> Result<Species, ClientError> {
        let req = self.authed(self.http.post(self.url("/api/species"))).json(input);
        decode(send(req).await?).await
    }

    async fn update(&self, id: SpeciesId, input: &SpeciesInput) -> Result<Species, ClientError> {
        let req = self
            .authed(self.http.put(self.url(&format!("/api/species/{id}"))))
            .json(input);
        decode(send(req).await?).await
    }

    async fn update_quantity(&self, id: SpeciesId, quantity: Option<i64>) -> Result<Species, ClientError> {
        let req = self
            .authed(self.http.patch(self.url(&format!("/api/species/{id}/quantity"))))
            .json(&QuantityBody { quantity });
        decode(send(req).await?).await
    }

    async fn delete(&self, id: SpeciesId) -> Result<(), ClientError> {
        let req = self.authed(self.http.delete(self.url(&format!("/api/species/{id}"))));
        send(req).await?;
        Ok(())
    }
}

async fn send(req: RequestBuilder) -> Result<Response, ClientError> {
    let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).ok().and_then(|b| b.error);
    tracing::debug!(status = status.as_u16(), ?message, "species API request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainforest_inventory::{SpeciesKind, SpeciesStatus};

    #[test]
    fn empty_filter_sends_no_params() {
        assert!(filter_params(&SpeciesFilter::default()).is_empty());
    }

    #[test]
    fn filter_params_use_wire_names() {
        let filter = SpeciesFilter::default()
            .with_search("orch")
            .with_kind(SpeciesKind::Plant)
            .with_status(SpeciesStatus::OutOfStock);

        assert_eq!(
            filter_params(&filter),
            vec![
                ("search", "orch".to_string()),
                ("type", "PLANT".to_string()),
                ("status", "OUT_OF_STOCK".to_string()),
            ]
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = SpeciesApi::new("http://localhost:3000/").with_token("t");
        assert_eq!(api.url("/health"), "http://localhost:3000/health");
        assert_eq!(api.token(), Some("t"));
    }

    #[test]
    fn null_quantity_serializes_as_null() {
        let body = serde_json::to_value(QuantityBody { quantity: None }).unwrap();
        assert_eq!(body, serde_json::json!({ "quantity": null }));
    }
}
