use anyhow::Result;
use std::path::{Path, PathBuf};

/// Used when the topic slug comes out empty.
pub const DEFAULT_EXPORT_STEM: &str = "bai-giang";

/// Create a file-name friendly slug from a lesson topic.
///
/// Lower-cases, turns every whitespace run into a single `-` and then drops
/// anything outside `[a-z0-9-]`. Accented letters are dropped, not folded.
pub fn create_slug(topic: &str) -> String {
    let mut dashed = String::with_capacity(topic.len());
    let mut in_space = false;
    for c in topic.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                dashed.push('-');
            }
            in_space = true;
        } else {
            dashed.push(c);
            in_space = false;
        }
    }

    dashed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// `{base}-{slug}.txt`, e.g. `kich-ban-phan-so.txt`.
pub fn export_file_name(base: &str, topic: &str) -> String {
    let slug = create_slug(topic);
    let stem = if slug.is_empty() { DEFAULT_EXPORT_STEM } else { slug.as_str() };
    format!("{base}-{stem}.txt")
}

/// Human readable byte size for file listings.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// Ensure the export directory exists
pub async fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let path = dir.as_ref();
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

/// Save an export file and return its full path
pub async fn save_export<P: AsRef<Path>>(dir: P, filename: &str, content: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    ensure_dir(dir).await?;

    let file_path = dir.join(filename);
    tokio::fs::write(&file_path, content).await?;

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_slug() {
        assert_eq!(create_slug("Hello World"), "hello-world");
        assert_eq!(create_slug("Phép   nhân  2"), "php-nhn-2");
        assert_eq!(create_slug("Test!@# Multiple"), "test-multiple");
        assert_eq!(create_slug("Phân số"), "phn-s");
        assert_eq!(create_slug("日本語"), "");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("kich-ban", "Hello World"), "kich-ban-hello-world.txt");
        assert_eq!(export_file_name("slides", ""), "slides-bai-giang.txt");
        assert_eq!(export_file_name("slides", "Số"), "slides-s.txt");
        assert_eq!(export_file_name("slides", "đọc"), "slides-c.txt");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
    }

    #[tokio::test]
    async fn test_save_export_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let path = save_export(&dir, "a.txt", "xin chào").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "xin chào");
    }
}
