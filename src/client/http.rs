use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    domain::{Announcement, ExtractedFields, University, UniversityInput},
    error::{AppError, Result},
};

use super::{Extractor, RecordStore};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to a running tracker server over its JSON API. Holds the session
/// cookie after [`HttpRecordStore::login`].
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let request = self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        send(request).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        send(self.client.post(self.url("/auth/logout"))).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Err(match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::BAD_REQUEST => AppError::BadRequest(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        _ => AppError::External(format!("{}: {}", status, message)),
    })
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    Ok(send(request).await?.json().await?)
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_universities(&self) -> Result<Vec<University>> {
        send_json(self.client.get(self.url("/api/universities"))).await
    }

    async fn get_university(&self, slug: &str) -> Result<University> {
        send_json(self.client.get(self.url(&format!("/api/universities/{}", slug)))).await
    }

    async fn create_university(&self, input: &UniversityInput) -> Result<University> {
        send_json(self.client.post(self.url("/api/universities")).json(input)).await
    }

    async fn update_university(&self, slug: &str, input: &UniversityInput) -> Result<University> {
        send_json(
            self.client
                .put(self.url(&format!("/api/universities/{}", slug)))
                .json(input),
        )
        .await
    }

    async fn delete_university(&self, slug: &str) -> Result<()> {
        send(self.client.delete(self.url(&format!("/api/universities/{}", slug)))).await?;
        Ok(())
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        send_json(self.client.get(self.url("/api/announcements"))).await
    }
}

#[async_trait]
impl Extractor for HttpRecordStore {
    async fn extract(&self, text: &str) -> Result<ExtractedFields> {
        send_json(
            self.client
                .post(self.url("/api/admin/parse-announcement"))
                .json(&json!({ "text": text })),
        )
        .await
    }
}
