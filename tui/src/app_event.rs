use lesson_common::Slide;
use lesson_core::clipboard::CopyOutcome;
use lesson_core::extraction::ExtractedFields;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// Results delivered by background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    ExtractionDone {
        generation: u64,
        result: Result<ExtractedFields, String>,
    },
    ScriptDone(Result<String, String>),
    SlidesDone(Result<Vec<Slide>, String>),
    Copied(CopyOutcome),
    Exported(Result<PathBuf, String>),
}

#[derive(Clone, Default)]
pub struct AppEventSender(Option<UnboundedSender<AppEvent>>);

impl AppEventSender {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self(Some(tx))
    }

    pub fn noop() -> Self {
        Self(None)
    }

    pub fn send(&self, event: AppEvent) {
        if let Some(tx) = &self.0 {
            if tx.send(event).is_err() {
                tracing::debug!("app event dropped: receiver closed");
            }
        }
    }
}
