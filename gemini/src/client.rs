use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("gemini transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gemini http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid gemini response: {0}")]
    InvalidResponse(String),

    #[error("gemini response contained no text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, GeminiError>;

/// One part of a user turn: either prompt text or an inline attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text(prompt.into())],
            }],
            generation_config: None,
        }
    }

    /// Attachments go first, the instruction text last.
    pub fn with_attachments(prompt: impl Into<String>, attachments: Vec<(String, String)>) -> Self {
        let mut parts: Vec<Part> = attachments
            .into_iter()
            .map(|(mime_type, data)| Part::InlineData { mime_type, data })
            .collect();
        parts.push(Part::Text(prompt.into()));
        Self {
            contents: vec![Content { parts }],
            generation_config: None,
        }
    }

    /// Constrain the answer to JSON matching `schema`.
    pub fn json_schema(mut self, schema: Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        });
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let texts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Minimal client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    pub model: String,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_model(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn new_with_model(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.trim()
        )
    }

    pub async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        let endpoint = self.endpoint();
        tracing::debug!(
            model = %self.model,
            parts = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            json = request.generation_config.is_some(),
            "sending generateContent request"
        );

        let resp = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", self.api_key.trim())
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!("Response Status: {status}");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("gemini http {status}: {body}");
            return Err(GeminiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        parse_response_text(&body)
    }
}

/// Pull the answer text out of a raw `generateContent` response body.
pub fn parse_response_text(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GeminiError::InvalidResponse(format!("{e}; raw: {body}")))?;
    parsed.text().ok_or(GeminiError::EmptyResponse)
}
