use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::future::try_join_all;
use lesson_common::{EncodedFile, SourceFile};

use crate::error::FileReadError;

/// Read a source file and return the base64 payload of its data URL.
pub async fn encode_file(file: &SourceFile) -> Result<EncodedFile, FileReadError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| FileReadError::Unreadable {
            name: file.name.clone(),
            source,
        })?;

    let data = STANDARD.encode(&bytes);
    if data.is_empty() {
        return Err(FileReadError::EmptyPayload {
            name: file.name.clone(),
        });
    }

    tracing::debug!(file = %file.name, bytes = bytes.len(), "encoded source file");
    Ok(EncodedFile {
        mime_type: file.mime_type.clone(),
        data,
    })
}

/// Encode every file, failing on the first one that cannot be read.
pub async fn encode_all(files: &[SourceFile]) -> Result<Vec<EncodedFile>, FileReadError> {
    try_join_all(files.iter().map(|f| encode_file(f))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(path: PathBuf, mime: &str) -> SourceFile {
        SourceFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path,
            mime_type: mime.to_string(),
            size: 0,
        }
    }

    #[tokio::test]
    async fn test_encode_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.png");
        std::fs::write(&path, b"ABC").unwrap();

        let encoded = encode_file(&source(path, "image/png")).await.unwrap();
        assert_eq!(encoded.data, "QUJD");
        assert_eq!(encoded.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_empty_file_has_no_payload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        let err = encode_file(&source(path, "application/pdf")).await.unwrap_err();
        assert!(matches!(err, FileReadError::EmptyPayload { ref name } if name == "empty.pdf"));
    }

    #[tokio::test]
    async fn test_encode_all_fails_on_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("ok.pdf");
        std::fs::write(&good, b"%PDF").unwrap();
        let missing = tmp.path().join("missing.pdf");

        let err = encode_all(&[source(good, "application/pdf"), source(missing, "application/pdf")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.pdf"));
    }
}
