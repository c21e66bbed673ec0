use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::ExtractionConfig,
    error::{AppError, Result},
    extraction::{ModelClient, ModelPrompt},
};

/// Chat-completions client for OpenAI and API-compatible providers.
pub struct OpenAiClient {
    client: Client,
    config: ExtractionConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build http client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, prompt: &'a ModelPrompt) -> ChatRequest<'a> {
        let mut content = vec![ContentPart::Text { text: &prompt.text }];
        if let Some(url) = prompt.image_url.as_deref() {
            content.push(ContentPart::ImageUrl { image_url: ImageUrl { url } });
        }

        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content }],
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &ModelPrompt) -> Result<String> {
        let api_key = self.config.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::External("Model API key is not configured".to_string()))?;

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self.client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::External(format!("Model API error {}: {}", status, body)));
        }

        let body: ChatResponse = response.json().await?;

        Ok(body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "{}".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let client = OpenAiClient::new(ExtractionConfig::default()).unwrap();
        let prompt = ModelPrompt {
            text: "extract".to_string(),
            image_url: Some("data:image/png;base64,aGVsbG8=".to_string()),
        };

        let json = serde_json::to_value(client.request_body(&prompt)).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let client = OpenAiClient::new(ExtractionConfig::default()).unwrap();
        let prompt = ModelPrompt { text: "extract".to_string(), image_url: None };
        assert!(matches!(client.complete(&prompt).await, Err(AppError::External(_))));
    }
}
