use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_PATHS: [&str; 4] = [
    ".lesson/config.toml",
    ".lesson/config.json",
    "lesson.config.toml",
    "lesson.config.json",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Where exports land when no `--out-dir` is given.
    pub output_dir: PathBuf,
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: lesson_gemini::DEFAULT_MODEL.to_string(),
            base_url: lesson_gemini::GEMINI_API_BASE.to_string(),
            output_dir: PathBuf::from("."),
            log_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML or JSON file (chosen by extension).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml { source })
        } else {
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json { source })
        }
    }

    /// First readable config file from the well-known locations, else defaults.
    pub fn load_with_fallback() -> Self {
        for path in &CONFIG_PATHS {
            if Path::new(path).exists() {
                match Self::load_from_file(path) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {path}");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {path}: {e}");
                    }
                }
            }
        }

        tracing::debug!("Using default configuration");
        Self::default()
    }

    /// Environment variables override whatever was loaded from disk.
    pub fn apply_env(&mut self) {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(key) = var("GEMINI_API_KEY").or_else(|| var("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = var("LESSON_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = var("LESSON_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(dir) = var("LESSON_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("LESSON_LOG_PATH") {
            self.log_path = Some(PathBuf::from(path));
        }
    }

    /// The credential is mandatory for any call to the model.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}
