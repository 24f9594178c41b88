//! API gateway client. Every REST call to the backend goes through here.
//!
//! Configured once with the backend base URL; the bearer token from the session
//! store (or from the incoming request, in the actions service) is attached to
//! each request.

use reqwest::{
    multipart::{Form, Part},
    Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(&config.api_url, config.http_timeout_secs)
    }

    /// Returns a client that authenticates as `token`. Shares the connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<Q, R>(&self, path: &str, query: &Q) -> Result<R, AppError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R, AppError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// POST without a body, for trigger-style endpoints such as seeding.
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        self.send(self.request(Method::POST, path)).await
    }

    pub async fn put<T, R>(&self, path: &str, body: &T) -> Result<R, AppError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<R, AppError> {
        self.send(self.request(Method::POST, path).multipart(form))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Backend returned {status}: {error_text}");
            return Err(AppError::Network {
                message: format!("HTTP {status}: {error_text}"),
                status: Some(status.as_u16()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::network(format!("Failed to read response body: {e}")))?;

        serde_json::from_slice(&body)
            .map_err(|e| AppError::Parse(format!("Unexpected response shape: {e}")))
    }
}

/// Percent-encodes a single path segment such as a quiz category or document id.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Builds a multipart file part with a content type derived from the file name.
pub fn file_part(bytes: Vec<u8>, file_name: &str) -> Result<Part, AppError> {
    let content_type = content_type_for(file_name)?;
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(content_type)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create multipart: {e}")))
}

/// Only PDF and DOCX resumes are accepted.
pub fn content_type_for(file_name: &str) -> Result<&'static str, AppError> {
    let lower_name = file_name.to_lowercase();
    if lower_name.ends_with(".pdf") {
        Ok("application/pdf")
    } else if lower_name.ends_with(".docx") {
        Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    } else {
        Err(AppError::Validation(format!(
            "Unsupported file format: {file_name} (expected PDF or DOCX)"
        )))
    }
}
