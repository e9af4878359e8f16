pub mod app;
mod app_event;
mod form;
pub mod preview;
mod script_view;

use anyhow::{Context, Result};
use lesson_common::Slide;
use lesson_core::clipboard::SystemClipboard;
use lesson_core::{LessonService, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use app::*;
pub use app_event::{AppEvent, AppEventSender};
pub use preview::*;

/// View a slide deck saved as JSON.
pub async fn run_preview<P: AsRef<Path>>(file_path: P) -> Result<()> {
    let path = file_path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let slides = parse_slides(&content)
        .with_context(|| format!("{} is not a slide deck", path.display()))?;

    let mut preview = SlidePreview::new(slides);
    preview.run().await
}

/// Run the interactive authoring screen over `session`.
pub async fn run_interactive(
    session: Session,
    service: LessonService,
    output_dir: PathBuf,
) -> Result<()> {
    let app = App::new(session, service, Arc::new(SystemClipboard::default()), output_dir);
    run_app(app).await
}

/// Parse a slide deck in the JSON shape the model returns.
pub fn parse_slides(content: &str) -> Result<Vec<Slide>> {
    Ok(serde_json::from_str(content.trim())?)
}
