use thiserror::Error;

/// Errors surfaced by the lesson pipeline.
///
/// Display strings are the messages shown to the teacher; the underlying
/// cause is kept as the error source and logged where the failure happens.
#[derive(Error, Debug)]
pub enum LessonError {
    #[error("{0}")]
    FileRead(#[from] FileReadError),

    #[error("Không thể tạo kịch bản thuyết trình. Vui lòng kiểm tra API key, kết nối mạng và định dạng tệp của bạn.")]
    ScriptGeneration {
        #[source]
        source: anyhow::Error,
    },

    #[error("Không thể tạo slides. Vui lòng thử lại.")]
    SlideGeneration {
        #[source]
        source: anyhow::Error,
    },

    #[error("Không thể trích xuất mục tiêu từ tệp.")]
    ObjectivesExtraction {
        #[source]
        source: anyhow::Error,
    },

    #[error("Không thể trích xuất các khái niệm chính từ tệp.")]
    KeyConceptsExtraction {
        #[source]
        source: anyhow::Error,
    },

    #[error("Không thể trích xuất các hoạt động được gợi ý từ tệp.")]
    ActivitiesExtraction {
        #[source]
        source: anyhow::Error,
    },
}

/// Failure to turn an attached file into an API payload.
#[derive(Error, Debug)]
pub enum FileReadError {
    #[error("Không thể đọc tệp \"{name}\": {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Không thể trích xuất dữ liệu base64 từ tệp \"{name}\".")]
    EmptyPayload { name: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key not set: export GEMINI_API_KEY (or API_KEY)")]
    MissingApiKey,

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML config: {source}")]
    Toml {
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, LessonError>;
