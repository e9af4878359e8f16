use lesson_common::{LessonDetails, SourceFile};

use crate::encoder;
use crate::service::LessonService;

/// Text pulled out of the uploaded documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub objectives: String,
    pub key_concepts: String,
    pub activities: String,
}

impl ExtractedFields {
    /// Copy each non-empty value over the matching form field; empty values
    /// leave what the teacher already typed.
    pub fn merge_into(&self, details: &mut LessonDetails) {
        if !self.objectives.is_empty() {
            details.objectives = self.objectives.clone();
        }
        if !self.key_concepts.is_empty() {
            details.key_concepts = self.key_concepts.clone();
        }
        if !self.activities.is_empty() {
            details.activities = self.activities.clone();
        }
    }
}

/// In-progress indicator per extracted field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionFlags {
    pub objectives: bool,
    pub key_concepts: bool,
    pub activities: bool,
}

impl ExtractionFlags {
    pub fn set_all(&mut self, value: bool) {
        self.objectives = value;
        self.key_concepts = value;
        self.activities = value;
    }

    pub fn any(&self) -> bool {
        self.objectives || self.key_concepts || self.activities
    }
}

/// Snapshot of the inputs for one extraction run.
///
/// Detached from the session so the run can be spawned; the generation number
/// identifies which file set it was started for.
#[derive(Debug, Clone)]
pub struct ExtractionTicket {
    pub generation: u64,
    pub files: Vec<SourceFile>,
    pub details: LessonDetails,
}

impl ExtractionTicket {
    /// Encode once, then run the three extractions concurrently.
    ///
    /// The group is all-or-nothing: the first failure wins and any results
    /// that already arrived are dropped. The error is the combined message
    /// shown to the teacher.
    pub async fn run(&self, service: &LessonService) -> Result<ExtractedFields, String> {
        let outcome = async {
            let files = encoder::encode_all(&self.files).await?;
            let (objectives, key_concepts, activities) = futures::try_join!(
                service.extract_objectives_from_files(&files),
                service.extract_key_concepts_from_files(&files),
                service.extract_activities_from_files(&files, &self.details),
            )?;
            Ok::<_, crate::error::LessonError>(ExtractedFields {
                objectives,
                key_concepts,
                activities,
            })
        }
        .await;

        outcome.map_err(|err| {
            tracing::error!("Failed to extract data from files: {err}");
            combined_error_message(&err.to_string())
        })
    }
}

pub fn combined_error_message(cause: &str) -> String {
    format!("Không thể phân tích tệp: {cause}. Vui lòng thử lại với tệp khác hoặc điền thủ công.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::ScriptedClient;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_merge_keeps_typed_text_on_empty_result() {
        let mut details = LessonDetails {
            objectives: "Mục tiêu cũ".to_string(),
            key_concepts: "Khái niệm cũ".to_string(),
            ..LessonDetails::default()
        };
        let extracted = ExtractedFields {
            objectives: String::new(),
            key_concepts: "Phân số".to_string(),
            activities: "Đóng vai".to_string(),
        };
        extracted.merge_into(&mut details);

        assert_eq!(details.objectives, "Mục tiêu cũ");
        assert_eq!(details.key_concepts, "Phân số");
        assert_eq!(details.activities, "Đóng vai");
    }

    fn ticket_for(dir: &std::path::Path) -> ExtractionTicket {
        let path = dir.join("bai.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        ExtractionTicket {
            generation: 1,
            files: vec![SourceFile {
                name: "bai.pdf".to_string(),
                path,
                mime_type: "application/pdf".to_string(),
                size: 8,
            }],
            details: LessonDetails::default(),
        }
    }

    #[tokio::test]
    async fn test_run_collects_all_three() {
        let tmp = tempfile::tempdir().unwrap();
        let client = Arc::new(
            ScriptedClient::new()
                .answer("mục tiêu học tập chính", "1. A")
                .answer("khái niệm", "B, C")
                .answer("đề xuất các hoạt động", ""),
        );
        let service = LessonService::new(client.clone());

        let fields = ticket_for(tmp.path()).run(&service).await.unwrap();
        assert_eq!(fields.objectives, "1. A");
        assert_eq!(fields.key_concepts, "B, C");
        assert_eq!(fields.activities, "");
        assert_eq!(client.seen().len(), 3);
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_group() {
        let tmp = tempfile::tempdir().unwrap();
        let client = Arc::new(
            ScriptedClient::new()
                .answer("mục tiêu học tập chính", "1. A")
                .fail("khái niệm", "quota")
                .answer("đề xuất các hoạt động", "X"),
        );
        let service = LessonService::new(client);

        let err = ticket_for(tmp.path()).run(&service).await.unwrap_err();
        assert_eq!(
            err,
            "Không thể phân tích tệp: Không thể trích xuất các khái niệm chính từ tệp.. Vui lòng thử lại với tệp khác hoặc điền thủ công."
        );
    }

    #[tokio::test]
    async fn test_unreadable_file_fails_before_any_call() {
        let client = Arc::new(ScriptedClient::new());
        let service = LessonService::new(client.clone());
        let ticket = ExtractionTicket {
            generation: 1,
            files: vec![SourceFile {
                name: "ghost.pdf".to_string(),
                path: PathBuf::from("/nonexistent/ghost.pdf"),
                mime_type: "application/pdf".to_string(),
                size: 0,
            }],
            details: LessonDetails::default(),
        };

        let err = ticket.run(&service).await.unwrap_err();
        assert!(err.contains("ghost.pdf"));
        assert!(client.seen().is_empty());
    }
}
