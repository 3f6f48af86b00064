//! Image upload persistence.
//!
//! Filenames from the browser are untrusted; everything that could traverse
//! or escape the image directory is stripped before the file is written.

use std::io::Write;
use std::path::Path;

/// Sanitize an uploaded filename for storage under the image directory
pub fn sanitize_filename(raw_name: &str) -> String {
    // Drop any client-side path components
    let base_name = raw_name.rsplit(['/', '\\']).next().unwrap_or(raw_name);

    let mut sanitized: String = base_name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    while sanitized.starts_with('.') {
        sanitized.remove(0);
    }
    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", "_");
    }

    let trimmed = sanitized.trim_matches(|ch| ch == '_' || ch == '.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Write an uploaded image into `dir`, returning the stored filename
pub fn save_image(dir: &str, original_name: &str, data: &[u8]) -> std::io::Result<String> {
    let filename = sanitize_filename(original_name);

    std::fs::create_dir_all(dir)?;
    let path = Path::new(dir).join(&filename);

    let mut file = std::fs::File::create(&path)?;
    file.write_all(data)?;

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("../my report?.png"), "my_report_.png");
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\x\\cat.jpg"), "cat.jpg");
    }

    #[test]
    fn test_sanitize_rejects_hidden_and_empty_names() {
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_save_image_writes_file() {
        let dir = tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let stored = save_image(dir_str, "pic one.png", b"fake-bytes").unwrap();
        assert_eq!(stored, "pic_one.png");

        let written = std::fs::read(dir.path().join(&stored)).unwrap();
        assert_eq!(written, b"fake-bytes");
    }
}
