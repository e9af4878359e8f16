use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ACCEPTED_MIME_TYPES: [&str; 3] = ["application/pdf", "image/png", "image/jpeg"];

/// Handle to a document the teacher attached as source material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    /// Empty when the type could not be guessed.
    pub mime_type: String,
    pub size: u64,
}

impl SourceFile {
    /// Build a handle from a path, guessing the MIME type from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or_default()
            .to_string();
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Self {
            name,
            path: path.to_path_buf(),
            mime_type,
            size,
        }
    }

    /// PDF, PNG and JPEG are accepted; a `.pdf` name with no known type is too.
    pub fn is_accepted(&self) -> bool {
        if ACCEPTED_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return true;
        }
        let is_pdf_name = self
            .name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"));
        is_pdf_name && self.mime_type.is_empty()
    }
}

/// Result of offering new files to a [`SourceFiles`] set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub added: Vec<String>,
    pub duplicates: Vec<String>,
    pub rejected: Vec<String>,
}

impl AddOutcome {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Ordered, name-unique collection of attached files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    files: Vec<SourceFile>,
}

impl SourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, candidates: impl IntoIterator<Item = SourceFile>) -> AddOutcome {
        let mut outcome = AddOutcome::default();
        for file in candidates {
            if !file.is_accepted() {
                outcome.rejected.push(file.name);
                continue;
            }
            if self.contains(&file.name) {
                outcome.duplicates.push(file.name);
                continue;
            }
            outcome.added.push(file.name.clone());
            self.files.push(file);
        }
        outcome
    }

    /// Returns true when a file with that name was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.name != name);
        self.files.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            path: PathBuf::from(name),
            mime_type: mime.to_string(),
            size: 10,
        }
    }

    #[test]
    fn test_add_dedupes_by_name() {
        let mut files = SourceFiles::new();
        let first = files.add(vec![file("a.pdf", "application/pdf"), file("b.png", "image/png")]);
        assert_eq!(first.added, vec!["a.pdf", "b.png"]);

        let second = files.add(vec![file("a.pdf", "application/pdf"), file("c.jpg", "image/jpeg")]);
        assert_eq!(second.added, vec!["c.jpg"]);
        assert_eq!(second.duplicates, vec!["a.pdf"]);
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.png", "c.jpg"]);
    }

    #[test]
    fn test_rejects_unsupported_types() {
        let mut files = SourceFiles::new();
        let outcome = files.add(vec![
            file("notes.txt", "text/plain"),
            file("scan.PDF", ""),
            file("weird.bin", ""),
        ]);
        assert_eq!(outcome.added, vec!["scan.PDF"]);
        assert_eq!(outcome.rejected, vec!["notes.txt", "weird.bin"]);
    }

    #[test]
    fn test_remove() {
        let mut files = SourceFiles::new();
        files.add(vec![file("a.pdf", "application/pdf")]);
        assert!(files.remove("a.pdf"));
        assert!(!files.remove("a.pdf"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_from_path_guesses_mime() {
        let f = SourceFile::from_path("/tmp/does-not-exist/bai-hoc.png");
        assert_eq!(f.name, "bai-hoc.png");
        assert_eq!(f.mime_type, "image/png");
        assert_eq!(f.size, 0);
        assert!(f.is_accepted());
    }
}
