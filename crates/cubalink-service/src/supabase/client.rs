//! Supabase REST client implementation.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::types::PostgrestError;

/// Error type for Supabase operations.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `PostgREST` returned an error.
    #[error("Supabase API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Supabase REST client authenticated with the service role key.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    rest_url: String,
    service_role_key: String,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    ///
    /// # Arguments
    ///
    /// * `project_url` - Project URL (`https://<ref>.supabase.co`)
    /// * `service_role_key` - Service role key; bypasses row-level security
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Configuration` if the HTTP client cannot be built.
    pub fn new(
        project_url: &str,
        service_role_key: impl Into<String>,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SupabaseError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            service_role_key: service_role_key.into(),
        })
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{table}", self.rest_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Insert one row (or an array of rows) and return what was stored.
    pub async fn insert<T, R>(&self, table: &str, rows: &T) -> Result<Vec<R>, SupabaseError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(table = %table, "Supabase insert");

        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Select rows using `PostgREST` query parameters
    /// (e.g. `[("select", "*"), ("order", "created_at.desc"), ("limit", "50")]`).
    pub async fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<R>, SupabaseError> {
        let response = self
            .request(reqwest::Method::GET, table)
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete rows where `column` equals `value`.
    pub async fn delete(&self, table: &str, column: &str, value: &str) -> Result<(), SupabaseError> {
        tracing::debug!(table = %table, column = %column, "Supabase delete");

        let filter = format!("eq.{value}");
        let response = self
            .request(reqwest::Method::DELETE, table)
            .query(&[(column, filter.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_from(status, response).await)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SupabaseError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        Err(Self::error_from(status, response).await)
    }

    async fn error_from(status: reqwest::StatusCode, response: reqwest::Response) -> SupabaseError {
        match response.json::<PostgrestError>().await {
            Ok(error) => SupabaseError::Api {
                status: status.as_u16(),
                message: error
                    .message
                    .or(error.details)
                    .or(error.hint)
                    .unwrap_or_else(|| format!("HTTP {status}")),
                code: error.code,
            },
            Err(_) => SupabaseError::Api {
                status: status.as_u16(),
                message: format!("HTTP {status}"),
                code: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn insert_sends_service_role_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/orders"))
            .and(header("apikey", "srk"))
            .and(header("Authorization", "Bearer srk"))
            .and(header("Prefer", "return=representation"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "o-1" }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&format!("{}/", server.uri()), "srk").unwrap();
        let rows: Vec<Value> = client.insert("orders", &json!({ "total": 10 })).await.unwrap();
        assert_eq!(rows[0]["id"], "o-1");
    }

    #[tokio::test]
    async fn delete_filters_by_column() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/notifications"))
            .and(query_param("id", "eq.42"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "srk").unwrap();
        client.delete("notifications", "id", "42").await.unwrap();
    }

    #[tokio::test]
    async fn postgrest_error_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "42P01",
                "message": "relation \"public.missing\" does not exist"
            })))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "srk").unwrap();
        let err = client.select::<Value>("missing", &[("select", "*")]).await.unwrap_err();
        match err {
            SupabaseError::Api { status, code, message } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("42P01"));
                assert!(message.contains("does not exist"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
