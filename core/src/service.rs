use lesson_common::{EncodedFile, LessonDetails, Slide};
use std::sync::Arc;

use crate::client::{ModelClient, ModelRequest};
use crate::error::{LessonError, Result};
use crate::prompt;

/// The five model operations the authoring flow needs.
///
/// Every call is a single attempt; failures are logged with their cause and
/// returned as the stage-specific [`LessonError`].
#[derive(Clone)]
pub struct LessonService {
    client: Arc<dyn ModelClient + Send + Sync>,
}

impl LessonService {
    pub fn new(client: Arc<dyn ModelClient + Send + Sync>) -> Self {
        Self { client }
    }

    pub async fn generate_presentation_script(
        &self,
        details: &LessonDetails,
        files: &[EncodedFile],
    ) -> Result<String> {
        let prompt = prompt::build_prompt(details, !files.is_empty());
        let request = if files.is_empty() {
            ModelRequest::text(prompt)
        } else {
            ModelRequest::with_files(prompt, files)
        };

        self.client.generate(request).await.map_err(|source| {
            tracing::error!("Error generating script: {source:#}");
            LessonError::ScriptGeneration { source }
        })
    }

    pub async fn generate_slides_from_script(&self, script: &str) -> Result<Vec<Slide>> {
        let request = ModelRequest::json(prompt::slides_prompt(script), prompt::slides_schema());

        let parsed = match self.client.generate(request).await {
            Ok(text) => serde_json::from_str::<Vec<Slide>>(text.trim()).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        parsed.map_err(|source| {
            tracing::error!("Error generating slides: {source:#}");
            LessonError::SlideGeneration { source }
        })
    }

    pub async fn extract_objectives_from_files(&self, files: &[EncodedFile]) -> Result<String> {
        let request = ModelRequest::with_files(prompt::OBJECTIVES_PROMPT, files);
        self.client
            .generate(request)
            .await
            .map(|text| text.trim().to_string())
            .map_err(|source| {
                tracing::error!("Error extracting objectives: {source:#}");
                LessonError::ObjectivesExtraction { source }
            })
    }

    pub async fn extract_key_concepts_from_files(&self, files: &[EncodedFile]) -> Result<String> {
        let request = ModelRequest::with_files(prompt::KEY_CONCEPTS_PROMPT, files);
        self.client
            .generate(request)
            .await
            .map(|text| text.trim().to_string())
            .map_err(|source| {
                tracing::error!("Error extracting key concepts: {source:#}");
                LessonError::KeyConceptsExtraction { source }
            })
    }

    pub async fn extract_activities_from_files(
        &self,
        files: &[EncodedFile],
        details: &LessonDetails,
    ) -> Result<String> {
        let request = ModelRequest::with_files(prompt::activities_prompt(details), files);
        self.client
            .generate(request)
            .await
            .map(|text| text.trim().to_string())
            .map_err(|source| {
                tracing::error!("Error extracting activities: {source:#}");
                LessonError::ActivitiesExtraction { source }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::ScriptedClient;

    fn pdf() -> Vec<EncodedFile> {
        vec![EncodedFile {
            mime_type: "application/pdf".to_string(),
            data: "JVBERg==".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_script_request_shape_follows_files() {
        let client = Arc::new(ScriptedClient::new().answer("giáo án", "Môn: Toán"));
        let service = LessonService::new(client.clone());
        let details = LessonDetails::default();

        assert_eq!(
            service.generate_presentation_script(&details, &[]).await.unwrap(),
            "Môn: Toán"
        );
        service.generate_presentation_script(&details, &pdf()).await.unwrap();

        let seen = client.seen();
        assert!(seen[0].files.is_empty());
        assert_eq!(seen[1].files.len(), 1);
        assert!(seen[1].prompt.contains("phân tích các tài liệu được cung cấp"));
        assert!(seen.iter().all(|r| r.response_schema.is_none()));
    }

    #[tokio::test]
    async fn test_script_failure_is_user_facing() {
        let client = Arc::new(ScriptedClient::new().fail("giáo án", "gemini http 403"));
        let service = LessonService::new(client);
        let err = service
            .generate_presentation_script(&LessonDetails::default(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, LessonError::ScriptGeneration { .. }));
        assert!(err.to_string().starts_with("Không thể tạo kịch bản thuyết trình"));
    }

    #[tokio::test]
    async fn test_slides_are_parsed_from_json() {
        let reply = r#"[{"title":"I. KHỞI ĐỘNG","content":["Trò chơi"],"speakerNotes":"Hỏi lớp",
            "visualSuggestion":{"suggestion":"Ảnh bánh","rationale":"Gần gũi"}}]"#;
        let client = Arc::new(ScriptedClient::new().answer("Kịch bản cần phân tích", reply));
        let service = LessonService::new(client.clone());

        let slides = service.generate_slides_from_script("**I. KHỞI ĐỘNG**").await.unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].content, vec!["Trò chơi"]);
        assert_eq!(slides[0].speaker_notes.as_deref(), Some("Hỏi lớp"));
        assert!(client.seen()[0].response_schema.is_some());
    }

    #[tokio::test]
    async fn test_slides_reject_malformed_json() {
        let client = Arc::new(ScriptedClient::new().answer("Kịch bản cần phân tích", "{\"title\":1}"));
        let service = LessonService::new(client);
        let err = service.generate_slides_from_script("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Không thể tạo slides. Vui lòng thử lại.");
    }

    #[tokio::test]
    async fn test_extractions_trim_and_attach_files() {
        let client = Arc::new(
            ScriptedClient::new()
                .answer("mục tiêu học tập chính", "\n1. Đọc phân số\n")
                .answer("khái niệm", "  Tử số, Mẫu số  ")
                .answer("đề xuất các hoạt động", "Thảo luận nhóm\n"),
        );
        let service = LessonService::new(client.clone());
        let files = pdf();
        let details = LessonDetails::default();

        assert_eq!(service.extract_objectives_from_files(&files).await.unwrap(), "1. Đọc phân số");
        assert_eq!(service.extract_key_concepts_from_files(&files).await.unwrap(), "Tử số, Mẫu số");
        assert_eq!(
            service.extract_activities_from_files(&files, &details).await.unwrap(),
            "Thảo luận nhóm"
        );
        assert!(client.seen().iter().all(|r| r.files == files));
    }
}
