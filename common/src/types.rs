use serde::{Deserialize, Serialize};

/// Form state describing the lesson to be scripted.
///
/// Every field is kept as the raw text the teacher entered; numeric and
/// enumerated interpretation happens in the prompt builder so that odd input
/// degrades to the documented defaults instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonDetails {
    pub topic: String,
    pub grade_level: String,
    pub number_of_periods: String,
    pub objectives: String,
    pub key_concepts: String,
    pub tone: String,
    pub activities: String,
    pub creativity: String,
    pub verbosity: String,
}

impl Default for LessonDetails {
    fn default() -> Self {
        Self {
            topic: String::new(),
            grade_level: "Lớp 5".to_string(),
            number_of_periods: "1".to_string(),
            objectives: String::new(),
            key_concepts: String::new(),
            tone: "Hấp dẫn và Tương tác".to_string(),
            activities: String::new(),
            creativity: "Cân bằng".to_string(),
            verbosity: "Chi tiết".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualSuggestion {
    pub suggestion: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_suggestion: Option<VisualSuggestion>,
}

impl Slide {
    pub fn has_speaker_notes(&self) -> bool {
        self.speaker_notes.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn has_visual_suggestion(&self) -> bool {
        self.visual_suggestion.is_some()
    }
}

/// A file payload ready to be attached to a model request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFile {
    pub mime_type: String,
    pub data: String,
}
