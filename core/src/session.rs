use lesson_common::{AddOutcome, LessonDetails, Slide, SourceFile, SourceFiles};

use crate::encoder;
use crate::extraction::{ExtractedFields, ExtractionFlags, ExtractionTicket};
use crate::service::LessonService;

/// Inputs for one script generation, detached from the session.
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    pub details: LessonDetails,
    pub files: Vec<SourceFile>,
}

impl ScriptRequest {
    /// Encode the attachments and ask for the script. The error is the
    /// message to show in the output panel.
    pub async fn run(&self, service: &LessonService) -> Result<String, String> {
        let files = encoder::encode_all(&self.files)
            .await
            .map_err(|e| e.to_string())?;
        service
            .generate_presentation_script(&self.details, &files)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Inputs for one slide generation.
#[derive(Debug, Clone)]
pub struct SlidesRequest {
    pub script: String,
}

impl SlidesRequest {
    pub async fn run(&self, service: &LessonService) -> Result<Vec<Slide>, String> {
        service
            .generate_slides_from_script(&self.script)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Authoring state for one lesson.
///
/// Long-running work is split into `begin_*` (raise flags, snapshot inputs),
/// the request's async `run`, and `finish_*` (lower flags, apply the result),
/// so a front end can spawn the middle step and keep drawing.
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub details: LessonDetails,
    files: SourceFiles,
    script: String,
    slides: Vec<Slide>,
    generating_script: bool,
    generating_slides: bool,
    extracting: ExtractionFlags,
    error: Option<String>,
    slide_error: Option<String>,
    extraction_error: Option<String>,
    edit_buffer: Option<String>,
    file_generation: u64,
}

impl Session {
    pub fn new(details: LessonDetails) -> Self {
        Self {
            details,
            ..Self::default()
        }
    }

    pub fn files(&self) -> &SourceFiles {
        &self.files
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn slide_error(&self) -> Option<&str> {
        self.slide_error.as_deref()
    }

    pub fn extraction_error(&self) -> Option<&str> {
        self.extraction_error.as_deref()
    }

    pub fn extracting(&self) -> ExtractionFlags {
        self.extracting
    }

    pub fn is_generating_script(&self) -> bool {
        self.generating_script
    }

    pub fn is_generating_slides(&self) -> bool {
        self.generating_slides
    }

    pub fn is_busy(&self) -> bool {
        self.generating_script || self.generating_slides
    }

    pub fn file_generation(&self) -> u64 {
        self.file_generation
    }

    // ---- files and extraction ----

    /// Attach files. Duplicates by name and unsupported types are skipped.
    pub fn add_files(&mut self, candidates: impl IntoIterator<Item = SourceFile>) -> AddOutcome {
        let outcome = self.files.add(candidates);
        if outcome.changed() {
            self.file_generation += 1;
        }
        outcome
    }

    pub fn remove_file(&mut self, name: &str) -> bool {
        if !self.files.remove(name) {
            return false;
        }
        self.file_generation += 1;
        if self.files.is_empty() {
            self.extraction_error = None;
            self.extracting.set_all(false);
        }
        true
    }

    /// Raise the three flags and snapshot the inputs. `None` when no files
    /// are attached.
    pub fn start_extraction(&mut self) -> Option<ExtractionTicket> {
        if self.files.is_empty() {
            return None;
        }
        self.extracting.set_all(true);
        self.extraction_error = None;
        Some(ExtractionTicket {
            generation: self.file_generation,
            files: self.files.as_slice().to_vec(),
            details: self.details.clone(),
        })
    }

    /// Apply an extraction result. Results for a file set that has since
    /// changed are dropped; returns whether the result was applied.
    pub fn finish_extraction(
        &mut self,
        generation: u64,
        result: Result<ExtractedFields, String>,
    ) -> bool {
        if generation != self.file_generation {
            tracing::debug!(
                generation,
                current = self.file_generation,
                "dropping stale extraction result"
            );
            return false;
        }
        self.extracting.set_all(false);
        match result {
            Ok(fields) => fields.merge_into(&mut self.details),
            Err(message) => self.extraction_error = Some(message),
        }
        true
    }

    // ---- script ----

    /// Clears the previous script, slides and errors. `None` while another
    /// generation or an extraction is running.
    pub fn begin_script_generation(&mut self) -> Option<ScriptRequest> {
        if self.is_busy() || self.extracting.any() {
            return None;
        }
        self.generating_script = true;
        self.error = None;
        self.edit_buffer = None;
        self.set_script(String::new());
        Some(ScriptRequest {
            details: self.details.clone(),
            files: self.files.as_slice().to_vec(),
        })
    }

    pub fn finish_script_generation(&mut self, result: Result<String, String>) {
        self.generating_script = false;
        match result {
            Ok(script) => self.set_script(script),
            Err(message) => self.error = Some(message),
        }
    }

    /// Every script change lands here so slides never outlive their script.
    fn set_script(&mut self, script: String) {
        self.script = script;
        self.slides.clear();
        self.slide_error = None;
    }

    /// Replace the script with text from elsewhere, such as a saved file.
    pub fn load_script(&mut self, script: impl Into<String>) {
        self.edit_buffer = None;
        self.set_script(script.into());
    }

    // ---- editing ----

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.edit_buffer.as_deref()
    }

    pub fn begin_edit(&mut self) -> bool {
        if self.script.is_empty() || self.is_busy() {
            return false;
        }
        self.edit_buffer = Some(self.script.clone());
        true
    }

    pub fn update_edit(&mut self, text: impl Into<String>) {
        if let Some(buffer) = self.edit_buffer.as_mut() {
            *buffer = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer = None;
    }

    /// Commit the buffer as the new script.
    pub fn save_edit(&mut self) -> bool {
        match self.edit_buffer.take() {
            Some(text) => {
                self.set_script(text);
                true
            }
            None => false,
        }
    }

    // ---- slides ----

    pub fn begin_slide_generation(&mut self) -> Option<SlidesRequest> {
        if self.script.is_empty() || self.is_busy() {
            return None;
        }
        self.generating_slides = true;
        self.slide_error = None;
        self.slides.clear();
        Some(SlidesRequest {
            script: self.script.clone(),
        })
    }

    pub fn finish_slide_generation(&mut self, result: Result<Vec<Slide>, String>) {
        self.generating_slides = false;
        match result {
            Ok(slides) => self.slides = slides,
            Err(message) => self.slide_error = Some(message),
        }
    }

    // ---- sequential helpers for non-interactive callers ----

    /// Run extraction to completion. No-op without files.
    pub async fn extract(&mut self, service: &LessonService) {
        if let Some(ticket) = self.start_extraction() {
            let result = ticket.run(service).await;
            self.finish_extraction(ticket.generation, result);
        }
    }

    pub async fn generate_script(&mut self, service: &LessonService) {
        if let Some(request) = self.begin_script_generation() {
            let result = request.run(service).await;
            self.finish_script_generation(result);
        }
    }

    pub async fn generate_slides(&mut self, service: &LessonService) {
        if let Some(request) = self.begin_slide_generation() {
            let result = request.run(service).await;
            self.finish_slide_generation(result);
        }
    }
}
