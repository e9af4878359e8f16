use anyhow::Result;
use async_trait::async_trait;
use lesson_common::EncodedFile;
use lesson_gemini::{GeminiClient, GenerateContentRequest};
use serde_json::Value;

use crate::config::Config;
use crate::error::ConfigError;

/// One call to the model: instruction text, optional attachments and an
/// optional JSON schema the answer must follow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRequest {
    pub prompt: String,
    pub files: Vec<EncodedFile>,
    pub response_schema: Option<Value>,
}

impl ModelRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_files(prompt: impl Into<String>, files: &[EncodedFile]) -> Self {
        Self {
            prompt: prompt.into(),
            files: files.to_vec(),
            response_schema: None,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            files: Vec::new(),
            response_schema: Some(schema),
        }
    }
}

#[async_trait]
pub trait ModelClient {
    /// Returns the raw answer text.
    async fn generate(&self, request: ModelRequest) -> Result<String>;
}

/// Adapter to wrap GeminiClient into ModelClient
pub struct GeminiAdapter {
    inner: GeminiClient,
}

impl GeminiAdapter {
    /// Fails when the configuration carries no API key.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_string();
        let inner = GeminiClient::new_with_model(api_key, config.model.clone())
            .with_base_url(config.base_url.clone());
        Ok(Self { inner })
    }
}

#[async_trait]
impl ModelClient for GeminiAdapter {
    async fn generate(&self, request: ModelRequest) -> Result<String> {
        let ModelRequest {
            prompt,
            files,
            response_schema,
        } = request;

        let mut body = if files.is_empty() {
            GenerateContentRequest::text(prompt)
        } else {
            let attachments = files.into_iter().map(|f| (f.mime_type, f.data)).collect();
            GenerateContentRequest::with_attachments(prompt, attachments)
        };
        if let Some(schema) = response_schema {
            body = body.json_schema(schema);
        }

        Ok(self.inner.generate_content(&body).await?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Answers requests from a fixed routing table keyed on prompt substrings
    /// and records every request it sees.
    #[derive(Default)]
    pub struct ScriptedClient {
        routes: Vec<(String, std::result::Result<String, String>)>,
        pub requests: Mutex<Vec<ModelRequest>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn answer(mut self, needle: &str, reply: &str) -> Self {
            self.routes.push((needle.to_string(), Ok(reply.to_string())));
            self
        }

        pub fn fail(mut self, needle: &str, message: &str) -> Self {
            self.routes.push((needle.to_string(), Err(message.to_string())));
            self
        }

        pub fn seen(&self) -> Vec<ModelRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, request: ModelRequest) -> Result<String> {
            let route = self
                .routes
                .iter()
                .find(|(needle, _)| request.prompt.contains(needle.as_str()))
                .map(|(_, reply)| reply.clone());
            if let Ok(mut seen) = self.requests.lock() {
                seen.push(request);
            }
            match route {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => Err(anyhow::anyhow!("no scripted reply")),
            }
        }
    }
}
