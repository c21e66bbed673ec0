//! AI-assisted fill: turns pasted announcement text or a screenshot into
//! [`ExtractedFields`] by way of an external language model.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use crate::{
    domain::ExtractedFields,
    error::{AppError, Result},
};

pub use openai::OpenAiClient;

const TARGET_SHAPE: &str = "{ application_start, application_end, exam_dates: [{date, note}], results_release, exam_fee, requirements: [] }";

/// Body of `POST /api/admin/parse-announcement`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// What gets sent to the model: the instruction, plus an optional image.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrompt {
    pub text: String,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    fn name(&self) -> &str;
    /// Returns the raw text of the model's answer.
    async fn complete(&self, prompt: &ModelPrompt) -> Result<String>;
}

pub struct ExtractionService {
    client: Arc<dyn ModelClient>,
}

impl ExtractionService {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    pub async fn extract(&self, request: ExtractionRequest) -> Result<ExtractedFields> {
        let prompt = build_prompt(request)?;

        tracing::debug!(
            "Sending extraction request to {} (image: {})",
            self.client.name(),
            prompt.image_url.is_some()
        );

        let raw = self.client
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Extraction(format!("{} call failed: {}", self.client.name(), e)))?;

        parse_model_output(&raw)
    }
}

/// Validates the request and builds the single instruction sent upstream.
/// An image takes precedence; text sent alongside it becomes extra context.
pub fn build_prompt(request: ExtractionRequest) -> Result<ModelPrompt> {
    let image = request.image.filter(|s| !s.trim().is_empty());
    let text = request.text.filter(|s| !s.trim().is_empty());

    match (image, text) {
        (Some(image), context) => {
            validate_data_url(&image)?;
            let mut instruction = format!(
                "Analyze this image. If it contains university admission details, extract them into this JSON structure: {}. {}",
                TARGET_SHAPE,
                output_rules(),
            );
            if let Some(context) = context {
                instruction.push_str("\n\nAdditional context:\n");
                instruction.push_str(context.trim());
            }
            Ok(ModelPrompt {
                text: instruction,
                image_url: Some(image),
            })
        }
        (None, Some(text)) => Ok(ModelPrompt {
            text: format!(
                "Analyze the following university admission announcement and extract the details into this JSON structure: {}. {}\n\nAnnouncement:\n{}",
                TARGET_SHAPE,
                output_rules(),
                text.trim(),
            ),
            image_url: None,
        }),
        (None, None) => Err(AppError::BadRequest(
            "Either image or text is required".to_string(),
        )),
    }
}

fn output_rules() -> &'static str {
    "Use null for missing info. Respond with the JSON object only: no commentary, no markdown, no code fences."
}

fn validate_data_url(image: &str) -> Result<()> {
    let invalid = || AppError::BadRequest("Image must be a base64-encoded data URL".to_string());

    let rest = image.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (_media, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid())?;

    Ok(())
}

/// Removes a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_model_output(raw: &str) -> Result<ExtractedFields> {
    let cleaned = strip_code_fences(raw);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| AppError::Extraction(format!("model returned invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(AppError::Extraction("model returned a non-object JSON value".to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::Extraction(format!("model output has the wrong shape: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExamDate, Patch};

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("```json {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = "```json\n{\"exam_fee\": \"₱500\", \"exam_dates\": [{\"date\": \"Aug 1\", \"note\": null}], \"requirements\": null}\n```";
        let fields = parse_model_output(raw).unwrap();
        assert_eq!(fields.exam_fee, Patch::Value("₱500".to_string()));
        assert_eq!(fields.exam_dates, Patch::Value(vec![ExamDate::new("Aug 1", "")]));
        assert_eq!(fields.requirements, Patch::Null);
    }

    #[test]
    fn test_parse_rejects_prose_and_non_objects() {
        assert!(matches!(parse_model_output("Sure! Here you go"), Err(AppError::Extraction(_))));
        assert!(matches!(parse_model_output("[1, 2]"), Err(AppError::Extraction(_))));
        assert!(matches!(
            parse_model_output("{\"requirements\": \"bring a pen\"}"),
            Err(AppError::Extraction(_))
        ));
    }

    #[test]
    fn test_prompt_requires_input() {
        let err = build_prompt(ExtractionRequest::default()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let blank = ExtractionRequest {
            image: Some("  ".to_string()),
            text: Some(String::new()),
        };
        assert!(matches!(build_prompt(blank), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_text_prompt_embeds_shape_and_text() {
        let prompt = build_prompt(ExtractionRequest {
            image: None,
            text: Some("UPCAT applications open on Aug 1".to_string()),
        })
        .unwrap();
        assert!(prompt.image_url.is_none());
        assert!(prompt.text.contains("exam_dates: [{date, note}]"));
        assert!(prompt.text.contains("Use null for missing info"));
        assert!(prompt.text.ends_with("UPCAT applications open on Aug 1"));
    }

    #[test]
    fn test_image_prompt_validates_data_url() {
        let ok = build_prompt(ExtractionRequest {
            image: Some("data:image/png;base64,aGVsbG8=".to_string()),
            text: Some("from the UP Facebook page".to_string()),
        })
        .unwrap();
        assert_eq!(ok.image_url.as_deref(), Some("data:image/png;base64,aGVsbG8="));
        assert!(ok.text.contains("Additional context:\nfrom the UP Facebook page"));

        let not_data_url = ExtractionRequest {
            image: Some("https://example.com/poster.png".to_string()),
            text: None,
        };
        assert!(matches!(build_prompt(not_data_url), Err(AppError::BadRequest(_))));

        let bad_payload = ExtractionRequest {
            image: Some("data:image/png;base64,***".to_string()),
            text: None,
        };
        assert!(matches!(build_prompt(bad_payload), Err(AppError::BadRequest(_))));
    }
}
