use anyhow::{bail, Context, Result};
use clap::Args;
use lesson_common::{LessonDetails, SourceFile};
use lesson_core::Session;
use std::path::{Path, PathBuf};

/// Lesson form fields, loadable from a file and overridable per flag.
#[derive(Debug, Default, Args)]
pub struct DetailsArgs {
    /// TOML or JSON file with the lesson details
    #[arg(long = "details", value_name = "FILE")]
    pub details_file: Option<PathBuf>,

    /// Lesson topic
    #[arg(long)]
    pub topic: Option<String>,

    /// Grade level, e.g. "Lớp 5"
    #[arg(long)]
    pub grade: Option<String>,

    /// Number of periods
    #[arg(long)]
    pub periods: Option<String>,

    #[arg(long)]
    pub objectives: Option<String>,

    #[arg(long)]
    pub key_concepts: Option<String>,

    #[arg(long)]
    pub tone: Option<String>,

    #[arg(long)]
    pub activities: Option<String>,

    /// Thực tế | Cân bằng | Sáng tạo cao
    #[arg(long)]
    pub creativity: Option<String>,

    /// Ngắn gọn | Chi tiết | Toàn diện
    #[arg(long)]
    pub verbosity: Option<String>,

    /// Source document (PDF, PNG, JPEG); repeatable
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub files: Vec<PathBuf>,
}

impl DetailsArgs {
    /// Defaults, then the details file, then individual flags.
    pub fn load(&self) -> Result<LessonDetails> {
        let mut details = match &self.details_file {
            Some(path) => load_details_file(path)?,
            None => LessonDetails::default(),
        };

        let overrides = [
            (&self.topic, &mut details.topic),
            (&self.grade, &mut details.grade_level),
            (&self.periods, &mut details.number_of_periods),
            (&self.objectives, &mut details.objectives),
            (&self.key_concepts, &mut details.key_concepts),
            (&self.tone, &mut details.tone),
            (&self.activities, &mut details.activities),
            (&self.creativity, &mut details.creativity),
            (&self.verbosity, &mut details.verbosity),
        ];
        for (flag, slot) in overrides {
            if let Some(value) = flag {
                *slot = value.clone();
            }
        }
        Ok(details)
    }

    /// Build a session with the details and attached files. Missing or
    /// unsupported files are errors here rather than silently skipped.
    pub fn session(&self) -> Result<Session> {
        let mut session = Session::new(self.load()?);
        for path in &self.files {
            if !path.is_file() {
                bail!("file not found: {}", path.display());
            }
            let outcome = session.add_files([SourceFile::from_path(path)]);
            if let Some(name) = outcome.rejected.first() {
                bail!("unsupported file type: {name} (PDF, PNG or JPEG expected)");
            }
            if let Some(name) = outcome.duplicates.first() {
                tracing::warn!("skipping duplicate file name {name}");
            }
        }
        Ok(session)
    }
}

fn load_details_file(path: &Path) -> Result<LessonDetails> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read details file {}", path.display()))?;
    let details = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        toml::from_str(&contents).with_context(|| format!("invalid TOML in {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON in {}", path.display()))?
    };
    Ok(details)
}
